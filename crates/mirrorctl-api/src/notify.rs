// Notification and miscellaneous endpoints
//
// Broadcasting notifications to modules, custom shell commands, CSS
// class toggles, user presence, and translations.

use serde_json::Value;
use tracing::debug;

use crate::client::MirrorClient;
use crate::error::Error;
use crate::models::ApiResponse;

impl MirrorClient {
    /// Broadcast a notification to every module.
    ///
    /// `GET /api/notification/{name}[/{payload}]`. An empty payload is
    /// left out of the path.
    pub async fn send_notification(
        &self,
        name: &str,
        payload: Option<&str>,
    ) -> Result<ApiResponse<Value>, Error> {
        let url = match payload.filter(|p| !p.is_empty()) {
            Some(payload) => self.api_url(&["notification", name, payload])?,
            None => self.api_url(&["notification", name])?,
        };
        debug!(notification = name, "sending notification");
        self.get(url).await
    }

    /// Run a command configured under `customCommand` on the mirror.
    ///
    /// `GET /api/command/{value}`
    pub async fn execute_command(&self, value: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["command", value])?;
        self.get(url).await
    }

    /// Apply a configured class toggle.
    ///
    /// `GET /api/classes/{value}`
    pub async fn use_class(&self, value: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["classes", value])?;
        self.get(url).await
    }

    /// `GET /api/userpresence/{value}`
    pub async fn set_user_presence(&self, value: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["userpresence", value])?;
        self.get(url).await
    }

    /// `GET /api/translations`
    pub async fn get_translations(&self) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["translations"])?;
        self.get(url).await
    }
}
