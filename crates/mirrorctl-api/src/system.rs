// System endpoints
//
// Device-level operations: connectivity check, configuration, monitor
// power, brightness, and the process/OS actions (refresh, restart, reboot...).

use serde_json::Value;
use tracing::debug;

use crate::client::MirrorClient;
use crate::error::Error;
use crate::models::ApiResponse;

impl MirrorClient {
    /// Connectivity check.
    ///
    /// `GET /api/test`
    pub async fn test_api(&self) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["test"])?;
        self.get(url).await
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Fetch the running `config.js` as JSON.
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["config"])?;
        debug!("fetching mirror config");
        self.get(url).await
    }

    /// Replace the mirror configuration.
    ///
    /// `POST /api/config/edit`
    pub async fn save_config(&self, config: &Value) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["config", "edit"])?;
        debug!("saving mirror config");
        self.post(url, config).await
    }

    /// List configuration backups kept by the remote-control module.
    ///
    /// `GET /api/saves`
    pub async fn get_config_backups(&self) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["saves"])?;
        self.get(url).await
    }

    /// Persist the current module visibility as the mirror's defaults.
    ///
    /// `GET /api/save`
    pub async fn save_defaults(&self) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["save"])?;
        self.get(url).await
    }

    // ── Display ──────────────────────────────────────────────────────

    /// `GET /api/monitor/on`
    pub async fn monitor_on(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["monitor", "on"]).await
    }

    /// `GET /api/monitor/off`
    pub async fn monitor_off(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["monitor", "off"]).await
    }

    /// Set display brightness.
    ///
    /// `GET /api/brightness/{value}`
    ///
    /// The value is sent verbatim; range checking is the mirror's job.
    pub async fn set_brightness(&self, value: i64) -> Result<ApiResponse<Value>, Error> {
        let value = value.to_string();
        let url = self.api_url(&["brightness", &value])?;
        debug!(brightness = %value, "setting brightness");
        self.get(url).await
    }

    // ── Process / OS ─────────────────────────────────────────────────

    /// `GET /api/shutdown`
    pub async fn shutdown(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["shutdown"]).await
    }

    /// `GET /api/reboot`
    pub async fn reboot(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["reboot"]).await
    }

    /// Restart the MagicMirror process.
    ///
    /// `GET /api/restart`
    pub async fn restart(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["restart"]).await
    }

    /// `GET /api/minimize`
    pub async fn minimize(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["minimize"]).await
    }

    /// `GET /api/togglefullscreen`
    pub async fn toggle_fullscreen(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["togglefullscreen"]).await
    }

    /// `GET /api/devtools`
    pub async fn toggle_devtools(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["devtools"]).await
    }

    /// Reload the browser page on the mirror.
    ///
    /// `GET /api/refresh`
    pub async fn refresh(&self) -> Result<ApiResponse<Value>, Error> {
        self.simple(&["refresh"]).await
    }

    async fn simple(&self, segments: &[&str]) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(segments)?;
        self.get(url).await
    }
}
