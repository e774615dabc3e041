// ── App-state store ──
//
// Ordered map of module id -> `AppState`, written through to a
// `StatePersistence` after every mutation. Load and save failures are
// logged, never surfaced.

use indexmap::IndexMap;
use tracing::{debug, error, warn};

use mirrorctl_api::ModuleDescriptor;

use crate::model::AppState;
use crate::store::persistence::StatePersistence;

/// Persistence key for the serialized map.
pub const STORAGE_KEY: &str = "mirror-app-states";

/// Visibility records for every module seen in the latest fetch.
///
/// Iteration follows the order of the last `initialize_app_states` input.
pub struct AppStateStore {
    states: IndexMap<String, AppState>,
    persistence: Box<dyn StatePersistence>,
}

impl std::fmt::Debug for AppStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStateStore")
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

impl AppStateStore {
    /// Load the store from persistence.
    ///
    /// Missing, unreadable, or corrupt data yields an empty store.
    pub fn load(persistence: Box<dyn StatePersistence>) -> Self {
        let states = match persistence.read(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<IndexMap<String, AppState>>(&raw) {
                Ok(states) => {
                    debug!(count = states.len(), "loaded app states");
                    states
                }
                Err(e) => {
                    error!(error = %e, "stored app states are corrupt, starting empty");
                    IndexMap::new()
                }
            },
            Ok(None) => IndexMap::new(),
            Err(e) => {
                error!(error = %e, "failed to read app states, starting empty");
                IndexMap::new()
            }
        };

        Self {
            states,
            persistence,
        }
    }

    // ── Merge ────────────────────────────────────────────────────────

    /// Replace the map with one record per module in `modules`.
    ///
    /// Known ids keep both flags. New ids start visible unless the
    /// module is hidden, and always start on the dashboard. Ids missing
    /// from `modules` are dropped. Calling twice with the same input
    /// leaves the same map.
    pub fn initialize_app_states(&mut self, modules: &[ModuleDescriptor]) {
        let mut next = IndexMap::with_capacity(modules.len());

        for module in modules {
            let fresh = AppState::from_descriptor(module);
            let state = match self.states.get(&fresh.id) {
                Some(existing) => AppState {
                    is_visible_on_mirror: existing.is_visible_on_mirror,
                    is_hidden_from_dashboard: existing.is_hidden_from_dashboard,
                    ..fresh
                },
                None => fresh,
            };
            next.insert(state.id.clone(), state);
        }

        let dropped = self.states.keys().filter(|id| !next.contains_key(*id)).count();
        if dropped > 0 {
            debug!(dropped, "pruned app states no longer reported by the mirror");
        }

        self.states = next;
        self.persist();
    }

    // ── Toggles ──────────────────────────────────────────────────────

    /// Flip `is_visible_on_mirror`. Unknown ids are left alone.
    pub fn toggle_mirror_visibility(&mut self, id: &str) -> Option<&AppState> {
        let Some(state) = self.states.get_mut(id) else {
            warn!(id, "ignoring mirror toggle for unknown module");
            return None;
        };
        state.is_visible_on_mirror = !state.is_visible_on_mirror;
        self.persist();
        self.states.get(id)
    }

    /// Flip `is_hidden_from_dashboard`. Unknown ids are left alone.
    pub fn toggle_dashboard_visibility(&mut self, id: &str) -> Option<&AppState> {
        let Some(state) = self.states.get_mut(id) else {
            warn!(id, "ignoring dashboard toggle for unknown module");
            return None;
        };
        state.is_hidden_from_dashboard = !state.is_hidden_from_dashboard;
        self.persist();
        self.states.get(id)
    }

    /// Set `is_visible_on_mirror` explicitly. Returns `false` for unknown ids.
    pub fn set_mirror_visibility(&mut self, id: &str, visible: bool) -> bool {
        let Some(state) = self.states.get_mut(id) else {
            return false;
        };
        if state.is_visible_on_mirror != visible {
            state.is_visible_on_mirror = visible;
            self.persist();
        }
        true
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, id: &str) -> Option<&AppState> {
        self.states.get(id)
    }

    pub fn all(&self) -> Vec<AppState> {
        self.states.values().cloned().collect()
    }

    /// Records the user has not hidden from the dashboard.
    pub fn dashboard_apps(&self) -> Vec<AppState> {
        self.states
            .values()
            .filter(|s| !s.is_hidden_from_dashboard)
            .cloned()
            .collect()
    }

    /// Records currently shown on the mirror.
    pub fn mirror_apps(&self) -> Vec<AppState> {
        self.states
            .values()
            .filter(|s| s.is_visible_on_mirror)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.states) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "failed to serialize app states");
                return;
            }
        };
        if let Err(e) = self.persistence.write(STORAGE_KEY, &raw) {
            error!(error = %e, "failed to save app states");
        }
    }
}
