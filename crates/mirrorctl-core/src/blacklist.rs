// ── Module blacklist ──
//
// Infrastructure modules that must never appear in a listing or reach
// the app-state store.

use mirrorctl_api::ModuleDescriptor;

/// Built-in blacklist, matched against the module `name`.
pub const MODULE_BLACKLIST: &[&str] = &[
    "MMM-Remote-Control",
    "MMM-API",
    "MMM-SystemNotification",
    "MMM-Screencast",
];

/// Returns `true` if `name` is on the built-in blacklist.
pub fn is_module_blacklisted(name: &str) -> bool {
    MODULE_BLACKLIST.contains(&name)
}

/// The built-in blacklist plus any names added by configuration.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    extra: Vec<String>,
}

impl Blacklist {
    pub fn new(extra: Vec<String>) -> Self {
        Self { extra }
    }

    pub fn contains(&self, name: &str) -> bool {
        is_module_blacklisted(name) || self.extra.iter().any(|n| n == name)
    }

    /// Drop blacklisted modules, keeping the order of the rest.
    pub fn filter(&self, modules: Vec<ModuleDescriptor>) -> Vec<ModuleDescriptor> {
        modules
            .into_iter()
            .filter(|m| !self.contains(&m.name))
            .collect()
    }
}
