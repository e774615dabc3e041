// System operations: device actions, brightness, and system info.

use std::sync::atomic::Ordering;

use serde_json::Value;
use tracing::{debug, info};

use super::{Mirror, PendingOp};
use crate::error::CoreError;
use crate::system::{SystemAction, SystemInfo};

impl Mirror {
    /// Run a device or process action.
    ///
    /// Only one request per action may be in flight.
    pub async fn run_system_action(&self, action: SystemAction) -> Result<(), CoreError> {
        let _guard = self.claim(PendingOp::System(action))?;
        let client = &self.inner.client;

        let resp = match action {
            SystemAction::Refresh => client.refresh().await,
            SystemAction::Restart => client.restart().await,
            SystemAction::Reboot => client.reboot().await,
            SystemAction::Shutdown => client.shutdown().await,
            SystemAction::Minimize => client.minimize().await,
            SystemAction::ToggleFullscreen => client.toggle_fullscreen().await,
            SystemAction::DevTools => client.toggle_devtools().await,
            SystemAction::MonitorOn => client.monitor_on().await,
            SystemAction::MonitorOff => client.monitor_off().await,
        }?;
        resp.into_result()?;

        info!(%action, "system action completed");
        Ok(())
    }

    // ── Brightness ───────────────────────────────────────────────

    /// Send a brightness value as-is. Out-of-range values are the
    /// mirror's call to reject.
    pub async fn set_brightness(&self, value: i64) -> Result<(), CoreError> {
        let _guard = self.claim(PendingOp::Brightness)?;
        self.inner.client.set_brightness(value).await?.into_result()?;
        self.inner.brightness.store(value, Ordering::Relaxed);
        debug!(brightness = value, "brightness confirmed");
        Ok(())
    }

    /// Last brightness the mirror accepted in this session.
    pub fn confirmed_brightness(&self) -> i64 {
        self.inner.brightness.load(Ordering::Relaxed)
    }

    // ── Info ─────────────────────────────────────────────────────

    /// Summarize the mirror from its running configuration.
    ///
    /// The remote-control API has no version endpoint, so platform and
    /// Node version are fixed labels.
    pub async fn system_info(&self) -> Result<SystemInfo, CoreError> {
        let resp = self.inner.client.get_config().await?;
        let configured_modules = resp
            .data
            .as_ref()
            .and_then(|config| config.get("modules"))
            .and_then(Value::as_array)
            .map(Vec::len);

        Ok(SystemInfo {
            success: resp.success,
            platform: "Magic Mirror".into(),
            node_version: "Unknown".into(),
            brightness: self.confirmed_brightness(),
            configured_modules,
        })
    }
}
