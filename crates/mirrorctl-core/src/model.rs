// ── App state model ──
//
// One record per module the user has seen. The camelCase field names
// are the persisted wire format and must not change.

use serde::{Deserialize, Serialize};

use mirrorctl_api::ModuleDescriptor;

/// Visibility record for a single mirror module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// `identifier`, else `longname`, else `name`.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Cached copy of the mirror's hidden flag, inverted.
    #[serde(default)]
    pub is_visible_on_mirror: bool,
    /// Local preference only; never sent to the mirror.
    #[serde(default)]
    pub is_hidden_from_dashboard: bool,
}

impl AppState {
    /// A fresh record for a module seen for the first time.
    pub fn from_descriptor(module: &ModuleDescriptor) -> Self {
        Self {
            id: module.module_id().to_owned(),
            name: module.name.clone(),
            longname: module.longname.clone(),
            desc: module.desc.clone(),
            is_visible_on_mirror: !module.hidden.unwrap_or(false),
            is_hidden_from_dashboard: false,
        }
    }

    /// Name used for show/hide calls: `longname`, else `name`.
    pub fn action_name(&self) -> &str {
        self.longname.as_deref().unwrap_or(&self.name)
    }

    /// Human-friendly label for views.
    pub fn display_name(&self) -> String {
        crate::names::normalize_module_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn id_falls_back_to_name() {
        let module = ModuleDescriptor {
            name: "MMM-clock".into(),
            ..ModuleDescriptor::default()
        };
        let state = AppState::from_descriptor(&module);
        assert_eq!(state.id, "MMM-clock");
        assert!(state.is_visible_on_mirror);
        assert!(!state.is_hidden_from_dashboard);
    }

    #[test]
    fn hidden_module_starts_invisible() {
        let module = ModuleDescriptor {
            identifier: Some("module_2_newsfeed".into()),
            name: "newsfeed".into(),
            hidden: Some(true),
            ..ModuleDescriptor::default()
        };
        let state = AppState::from_descriptor(&module);
        assert_eq!(state.id, "module_2_newsfeed");
        assert!(!state.is_visible_on_mirror);
        assert_eq!(state.display_name(), "News");
    }

    #[test]
    fn serializes_with_camel_case_flags() {
        let state = AppState {
            id: "module_0_clock".into(),
            name: "clock".into(),
            longname: None,
            desc: None,
            is_visible_on_mirror: true,
            is_hidden_from_dashboard: false,
        };
        assert_eq!(
            serde_json::to_value(&state).expect("serialize"),
            json!({
                "id": "module_0_clock",
                "name": "clock",
                "isVisibleOnMirror": true,
                "isHiddenFromDashboard": false
            })
        );
    }
}
