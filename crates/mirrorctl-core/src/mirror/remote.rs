// Pass-through calls that need no local state: configuration, module
// management, notifications, and custom commands.

use serde_json::{Map, Value};

use mirrorctl_api::ApiResponse;

use super::Mirror;
use crate::error::CoreError;

/// Unwrap an envelope into its payload.
///
/// Endpoints without `data` yield the remaining envelope fields so
/// callers still see things like `message` or `query`.
fn payload(resp: ApiResponse<Value>) -> Result<Value, CoreError> {
    let resp = resp.into_result()?;
    if let Some(data) = resp.data {
        return Ok(data);
    }
    let mut rest: Map<String, Value> = resp.extra;
    if let Some(message) = resp.message {
        rest.insert("message".into(), Value::String(message));
    }
    Ok(Value::Object(rest))
}

impl Mirror {
    /// Check that the remote-control API answers.
    pub async fn ping(&self) -> Result<(), CoreError> {
        self.inner.client.test_api().await?.into_result()?;
        Ok(())
    }

    // ── Configuration ────────────────────────────────────────────

    pub async fn remote_config(&self) -> Result<Value, CoreError> {
        payload(self.inner.client.get_config().await?)
    }

    pub async fn save_remote_config(&self, config: &Value) -> Result<Value, CoreError> {
        payload(self.inner.client.save_config(config).await?)
    }

    pub async fn config_backups(&self) -> Result<Value, CoreError> {
        payload(self.inner.client.get_config_backups().await?)
    }

    pub async fn save_defaults(&self) -> Result<Value, CoreError> {
        payload(self.inner.client.save_defaults().await?)
    }

    // ── Module management ────────────────────────────────────────

    pub async fn module_actions(&self, name: &str) -> Result<Value, CoreError> {
        payload(self.inner.client.get_module_actions(name).await?)
    }

    pub async fn execute_module_action(&self, name: &str, action: &str) -> Result<Value, CoreError> {
        payload(self.inner.client.execute_module_action(name, action).await?)
    }

    pub async fn update_module(&self, name: &str) -> Result<Value, CoreError> {
        payload(self.inner.client.update_module(name).await?)
    }

    pub async fn install_module(&self, module: &Value) -> Result<Value, CoreError> {
        payload(self.inner.client.install_module(module).await?)
    }

    // ── Notifications and commands ───────────────────────────────

    pub async fn send_notification(
        &self,
        name: &str,
        body: Option<&str>,
    ) -> Result<Value, CoreError> {
        payload(self.inner.client.send_notification(name, body).await?)
    }

    pub async fn execute_command(&self, value: &str) -> Result<Value, CoreError> {
        payload(self.inner.client.execute_command(value).await?)
    }

    pub async fn use_class(&self, value: &str) -> Result<Value, CoreError> {
        payload(self.inner.client.use_class(value).await?)
    }

    pub async fn set_user_presence(&self, value: &str) -> Result<Value, CoreError> {
        payload(self.inner.client.set_user_presence(value).await?)
    }

    pub async fn translations(&self) -> Result<Value, CoreError> {
        payload(self.inner.client.get_translations().await?)
    }
}
