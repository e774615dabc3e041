// MMM-Remote-Control response types
//
// Every endpoint except the active-module listing wraps its payload in
// the `{ success, message?, data? }` envelope. Fields use
// `#[serde(default)]` liberally because third-party modules register
// descriptors with whatever subset of keys they like.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard remote-control response envelope.
///
/// ```json
/// { "success": true, "message": "optional", "data": ... }
/// ```
///
/// Any other top-level keys (`query`, `result`, ...) land in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    /// Turn `success: false` into `Error::Rejected`, keeping the envelope otherwise.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "mirror reported success: false".into()),
            })
        }
    }
}

// ── Module ───────────────────────────────────────────────────────────

/// A module registered on the mirror, as reported by the module listings.
///
/// Only `name` is guaranteed. The active listing usually carries
/// `identifier` and `hidden`; the installed/available listings carry
/// `longname` and `desc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ModuleDescriptor {
    /// Stable key for this module: `identifier`, then `longname`, then `name`.
    pub fn module_id(&self) -> &str {
        self.identifier
            .as_deref()
            .or(self.longname.as_deref())
            .unwrap_or(&self.name)
    }

    /// Name used in `/api/module/{name}/...` paths: `longname`, then `name`.
    pub fn action_name(&self) -> &str {
        self.longname.as_deref().unwrap_or(&self.name)
    }
}

/// Result of `GET /api/module`.
///
/// The active listing never raises: any failure collapses to
/// `Unavailable` and is logged by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleListing {
    Loaded(Vec<ModuleDescriptor>),
    Unavailable,
}

impl ModuleListing {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn into_modules(self) -> Option<Vec<ModuleDescriptor>> {
        match self {
            Self::Loaded(modules) => Some(modules),
            Self::Unavailable => None,
        }
    }
}
