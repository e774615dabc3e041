// Module endpoints
//
// Listing, visibility, per-module actions, and installation management.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::MirrorClient;
use crate::error::Error;
use crate::models::{ApiResponse, ModuleDescriptor, ModuleListing};

impl MirrorClient {
    /// Modules currently loaded on the mirror.
    ///
    /// `GET /api/module`
    ///
    /// Never raises. Transport errors, non-2xx answers, undecodable bodies
    /// and `success: false` all collapse to `ModuleListing::Unavailable`.
    pub async fn active_modules(&self) -> ModuleListing {
        let url = match self.api_url(&["module"]) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "cannot build active module URL");
                return ModuleListing::Unavailable;
            }
        };

        match self.get::<Vec<ModuleDescriptor>>(url).await {
            Ok(resp) if resp.success => {
                let modules = resp.data.unwrap_or_default();
                debug!(count = modules.len(), "fetched active modules");
                ModuleListing::Loaded(modules)
            }
            Ok(resp) => {
                warn!(message = ?resp.message, "active module listing reported failure");
                ModuleListing::Unavailable
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch active modules");
                ModuleListing::Unavailable
            }
        }
    }

    /// Modules installed on disk.
    ///
    /// `GET /api/module/installed`
    pub async fn installed_modules(&self) -> Result<ApiResponse<Vec<ModuleDescriptor>>, Error> {
        let url = self.api_url(&["module", "installed"])?;
        self.get(url).await
    }

    /// Modules available in the third-party registry.
    ///
    /// `GET /api/module/available`
    pub async fn available_modules(&self) -> Result<ApiResponse<Vec<ModuleDescriptor>>, Error> {
        let url = self.api_url(&["module", "available"])?;
        self.get(url).await
    }

    // ── Visibility ───────────────────────────────────────────────────

    /// `GET /api/module/{name}/hide`
    pub async fn hide_module(&self, name: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["module", name, "hide"])?;
        debug!(module = name, "hiding module");
        self.get(url).await
    }

    /// `GET /api/module/{name}/show`
    pub async fn show_module(&self, name: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["module", name, "show"])?;
        debug!(module = name, "showing module");
        self.get(url).await
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Actions a module exposes to the remote-control API.
    ///
    /// `GET /api/module/{name}`
    pub async fn get_module_actions(&self, name: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["module", name])?;
        self.get(url).await
    }

    /// `GET /api/module/{name}/{action}`
    pub async fn execute_module_action(
        &self,
        name: &str,
        action: &str,
    ) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["module", name, action])?;
        debug!(module = name, action, "executing module action");
        self.get(url).await
    }

    // ── Installation ─────────────────────────────────────────────────

    /// Pull the latest version of a module.
    ///
    /// `GET /api/update/{name}`
    pub async fn update_module(&self, name: &str) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["update", name])?;
        self.get(url).await
    }

    /// Install a module from a repository descriptor (`{"url": ...}`).
    ///
    /// `POST /api/install`
    pub async fn install_module(&self, module: &Value) -> Result<ApiResponse<Value>, Error> {
        let url = self.api_url(&["install"])?;
        self.post(url, module).await
    }
}
