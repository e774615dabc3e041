// ── System actions ──
//
// Device-level operations exposed as a closed set so views can render
// them as an action grid and the interaction layer can key loading
// flags by action.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// An operation on the mirror process or the device it runs on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SystemAction {
    Refresh,
    Restart,
    Reboot,
    Shutdown,
    Minimize,
    #[strum(to_string = "fullscreen", serialize = "toggle-fullscreen")]
    ToggleFullscreen,
    #[strum(to_string = "devtools")]
    DevTools,
    MonitorOn,
    MonitorOff,
}

impl SystemAction {
    /// The actions offered on the System screen, in display order.
    pub const GRID: [SystemAction; 3] = [Self::Refresh, Self::Restart, Self::Reboot];

    pub fn title(self) -> &'static str {
        match self {
            Self::Refresh => "Refresh Modules",
            Self::Restart => "Restart Mirror",
            Self::Reboot => "Reboot Device",
            Self::Shutdown => "Shut Down Device",
            Self::Minimize => "Minimize Window",
            Self::ToggleFullscreen => "Toggle Fullscreen",
            Self::DevTools => "Toggle DevTools",
            Self::MonitorOn => "Monitor On",
            Self::MonitorOff => "Monitor Off",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Refresh => "Reload all modules and their configurations.",
            Self::Restart => "Restart the Magic Mirror application.",
            Self::Reboot => "Reboot the entire device (use with caution).",
            Self::Shutdown => "Power off the device. It must be switched on by hand.",
            Self::Minimize => "Minimize the mirror window.",
            Self::ToggleFullscreen => "Switch the mirror window in or out of fullscreen.",
            Self::DevTools => "Open or close the browser developer tools.",
            Self::MonitorOn => "Wake the attached display.",
            Self::MonitorOff => "Put the attached display to sleep.",
        }
    }

    pub fn action_label(self) -> &'static str {
        match self {
            Self::Refresh => "Refresh",
            Self::Restart => "Restart",
            Self::Reboot => "Reboot",
            Self::Shutdown => "Shut down",
            Self::Minimize => "Minimize",
            Self::ToggleFullscreen | Self::DevTools => "Toggle",
            Self::MonitorOn => "On",
            Self::MonitorOff => "Off",
        }
    }

    /// Actions that interrupt the mirror and ask for confirmation first.
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Restart | Self::Reboot | Self::Shutdown)
    }
}

/// Summary shown on the System screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    /// Whether `GET /api/config` reported success.
    pub success: bool,
    pub platform: String,
    pub node_version: String,
    /// Last brightness the mirror accepted (50 until one is set).
    pub brightness: i64,
    /// Number of modules in the running configuration, when reported.
    pub configured_modules: Option<usize>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_cli_spellings() {
        assert_eq!(SystemAction::from_str("refresh"), Ok(SystemAction::Refresh));
        assert_eq!(SystemAction::from_str("fullscreen"), Ok(SystemAction::ToggleFullscreen));
        assert_eq!(SystemAction::from_str("monitor-off"), Ok(SystemAction::MonitorOff));
        assert!(SystemAction::from_str("format-disk").is_err());
    }

    #[test]
    fn every_action_has_labels() {
        for action in SystemAction::iter() {
            assert!(!action.title().is_empty());
            assert!(!action.description().is_empty());
            assert!(!action.action_label().is_empty());
        }
    }

    #[test]
    fn reboot_is_destructive_refresh_is_not() {
        assert!(SystemAction::Reboot.is_destructive());
        assert!(!SystemAction::Refresh.is_destructive());
    }
}
