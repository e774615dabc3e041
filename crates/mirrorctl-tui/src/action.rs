//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use mirrorctl_core::{AppState, BrightnessState, PendingOp, RefreshStatus, SystemAction, SystemInfo};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// An action waiting on a y/n answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    System(SystemAction),
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System(action) => write!(f, "{}? {}", action.title(), action.description()),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Data events (from the mirror's watch channels) ────────────
    AppsUpdated(Arc<Vec<AppState>>),
    StatusUpdated(RefreshStatus),
    PendingUpdated(Arc<Vec<PendingOp>>),
    BrightnessUpdated(BrightnessState),
    SystemInfoUpdated(SystemInfo),

    // ── Mirror commands ───────────────────────────────────────────
    RefreshNow,
    ToggleMirror(String),
    ToggleDashboard(String),
    StepBrightness(i64),
    /// Runs immediately unless the action is destructive, in which
    /// case a confirmation dialog opens first.
    RequestSystem(SystemAction),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_prompt_names_the_action() {
        let prompt = ConfirmAction::System(SystemAction::Reboot).to_string();
        assert_eq!(prompt, "Reboot Device? Reboot the entire device (use with caution).");
    }
}
