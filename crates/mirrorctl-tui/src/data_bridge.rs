//! Data bridge — connects [`Mirror`] watch channels to TUI actions.
//!
//! Runs as a background task: pushes the current snapshots once, then
//! forwards every app-state, refresh-status, loading-flag, and
//! brightness change as an [`Action`] through the TUI's action channel.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use mirrorctl_core::{BrightnessState, Mirror};

use crate::action::Action;

/// Forward mirror state to the TUI until `cancel` fires or the app's
/// receiver goes away.
pub async fn spawn_data_bridge(
    mirror: Mirror,
    mut brightness: watch::Receiver<BrightnessState>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut apps = mirror.subscribe_apps();
    let mut status = mirror.subscribe_status();
    let mut pending = mirror.subscribe_pending();

    // Push initial snapshots so screens render persisted state immediately
    let initial = [
        Action::AppsUpdated(apps.borrow_and_update().clone()),
        Action::StatusUpdated(status.borrow_and_update().clone()),
        Action::PendingUpdated(pending.borrow_and_update().clone()),
        Action::BrightnessUpdated(brightness.borrow_and_update().clone()),
    ];
    for action in initial {
        if action_tx.send(action).is_err() {
            return;
        }
    }

    loop {
        let action = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = apps.changed() => {
                debug!("dispatching AppsUpdated");
                Action::AppsUpdated(apps.borrow_and_update().clone())
            }
            Ok(()) = status.changed() => {
                Action::StatusUpdated(status.borrow_and_update().clone())
            }
            Ok(()) = pending.changed() => {
                Action::PendingUpdated(pending.borrow_and_update().clone())
            }
            Ok(()) = brightness.changed() => {
                Action::BrightnessUpdated(brightness.borrow_and_update().clone())
            }
            else => break,
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("data bridge shut down");
}
