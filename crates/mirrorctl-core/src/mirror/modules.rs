// Module operations: fetch + merge, visibility toggles, and suppression.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use mirrorctl_api::ModuleDescriptor;

use super::{Mirror, PendingOp, RefreshStatus, SUPPRESS_ACTIONS};
use crate::error::CoreError;
use crate::model::AppState;

/// What `suppress_module` managed to do.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuppressReport {
    pub module: String,
    /// The module's advertised actions, if the listing succeeded.
    pub actions: Option<Value>,
    /// The first action the mirror accepted.
    pub disabled_with: Option<String>,
    pub hidden: bool,
}

impl Mirror {
    // ── Fetch ────────────────────────────────────────────────────

    /// Fetch active modules and merge them into the app-state store.
    ///
    /// Blacklisted modules are dropped and modules on the force-hidden
    /// list are treated as hidden before the merge. Returns the number
    /// of records in the store.
    pub async fn refresh_modules(&self) -> Result<usize, CoreError> {
        let Some(modules) = self.inner.client.active_modules().await.into_modules() else {
            let err = CoreError::ModulesUnavailable;
            self.inner
                .status
                .send_modify(|s| s.last_error = Some(err.to_string()));
            return Err(err);
        };

        let modules: Vec<ModuleDescriptor> = self
            .inner
            .blacklist
            .filter(modules)
            .into_iter()
            .map(|mut module| {
                if self.inner.config.force_hidden.contains(&module.name) {
                    module.hidden = Some(true);
                }
                module
            })
            .collect();

        let count = {
            let mut store = self.inner.store.lock().await;
            store.initialize_app_states(&modules);
            store.len()
        };
        self.publish_apps().await;
        self.inner.status.send_replace(RefreshStatus {
            last_refresh: Some(Utc::now()),
            last_error: None,
            module_count: count,
        });

        debug!(modules = count, "module refresh complete");
        Ok(count)
    }

    /// Modules installed on disk, blacklist applied. Not merged into the store.
    pub async fn installed_modules(&self) -> Result<Vec<ModuleDescriptor>, CoreError> {
        let resp = self.inner.client.installed_modules().await?.into_result()?;
        Ok(self.inner.blacklist.filter(resp.data.unwrap_or_default()))
    }

    /// Modules available from the third-party registry, blacklist applied.
    pub async fn available_modules(&self) -> Result<Vec<ModuleDescriptor>, CoreError> {
        let resp = self.inner.client.available_modules().await?.into_result()?;
        Ok(self.inner.blacklist.filter(resp.data.unwrap_or_default()))
    }

    // ── Queries ──────────────────────────────────────────────────

    pub async fn app_state(&self, id: &str) -> Option<AppState> {
        self.inner.store.lock().await.get(id).cloned()
    }

    pub async fn dashboard_apps(&self) -> Vec<AppState> {
        self.inner.store.lock().await.dashboard_apps()
    }

    pub async fn mirror_apps(&self) -> Vec<AppState> {
        self.inner.store.lock().await.mirror_apps()
    }

    /// Find a record by id, falling back to module name or long name.
    pub async fn resolve_app(&self, key: &str) -> Result<AppState, CoreError> {
        let store = self.inner.store.lock().await;
        if let Some(state) = store.get(key) {
            return Ok(state.clone());
        }
        store
            .all()
            .into_iter()
            .find(|s| s.name == key || s.longname.as_deref() == Some(key))
            .ok_or_else(|| CoreError::NotFound {
                identifier: key.to_owned(),
            })
    }

    // ── Toggles ──────────────────────────────────────────────────

    /// Show or hide a module on the mirror.
    ///
    /// The local flag flips immediately. If the mirror errors or
    /// answers `success: false`, the flip is reverted and the error is
    /// returned. A second toggle for the same id while one is in
    /// flight fails with `CoreError::Busy`.
    pub async fn toggle_mirror_visibility(&self, id: &str) -> Result<AppState, CoreError> {
        let _guard = self.claim(PendingOp::Module(id.to_owned()))?;

        let previous = {
            let mut store = self.inner.store.lock().await;
            let previous = store
                .get(id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound {
                    identifier: id.to_owned(),
                })?;
            store.toggle_mirror_visibility(id);
            previous
        };
        self.publish_apps().await;

        let name = previous.action_name();
        let result = if previous.is_visible_on_mirror {
            self.inner.client.hide_module(name).await
        } else {
            self.inner.client.show_module(name).await
        };
        let outcome = result
            .map_err(CoreError::from)
            .and_then(|resp| resp.into_result().map_err(CoreError::from));

        match outcome {
            Ok(_) => {
                info!(
                    module = name,
                    visible = !previous.is_visible_on_mirror,
                    "module visibility changed"
                );
                self.app_state(id).await.ok_or_else(|| CoreError::NotFound {
                    identifier: id.to_owned(),
                })
            }
            Err(e) => {
                warn!(module = name, error = %e, "visibility change failed, reverting");
                self.inner
                    .store
                    .lock()
                    .await
                    .set_mirror_visibility(id, previous.is_visible_on_mirror);
                self.publish_apps().await;
                Err(e)
            }
        }
    }

    /// Show or hide a module on the dashboard. Local only.
    pub async fn toggle_dashboard_visibility(&self, id: &str) -> Result<AppState, CoreError> {
        let updated = self
            .inner
            .store
            .lock()
            .await
            .toggle_dashboard_visibility(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                identifier: id.to_owned(),
            })?;
        self.publish_apps().await;
        Ok(updated)
    }

    // ── Suppression ──────────────────────────────────────────────

    /// Disable and hide a module that should never show on the mirror.
    ///
    /// Tries each of `SUPPRESS_ACTIONS` until one is accepted, then
    /// hides the module regardless. Never fails; failures are logged
    /// and reflected in the report.
    pub async fn suppress_module(&self, name: &str) -> SuppressReport {
        let client = &self.inner.client;
        let mut report = SuppressReport {
            module: name.to_owned(),
            ..SuppressReport::default()
        };

        match client.get_module_actions(name).await {
            Ok(resp) => {
                debug!(module = name, actions = ?resp.data, "module actions");
                report.actions = resp.data;
            }
            Err(e) => warn!(module = name, error = %e, "could not list module actions"),
        }

        for action in SUPPRESS_ACTIONS {
            match client.execute_module_action(name, action).await {
                Ok(resp) if resp.success => {
                    debug!(module = name, action, "module disabled");
                    report.disabled_with = Some((*action).to_owned());
                    break;
                }
                Ok(_) => debug!(module = name, action, "action not accepted"),
                Err(e) => debug!(module = name, action, error = %e, "action failed"),
            }
        }

        match client.hide_module(name).await {
            Ok(resp) => report.hidden = resp.success,
            Err(e) => warn!(module = name, error = %e, "could not hide module"),
        }

        report
    }
}
