// ── Runtime mirror configuration ──
//
// These types describe *how* to talk to a mirror. They carry the API key
// and timing knobs, but never touch disk. The CLI/TUI build a
// `MirrorConfig` from a profile and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default poll interval for the active-module listing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default quiet window for brightness changes.
pub const DEFAULT_BRIGHTNESS_DEBOUNCE: Duration = Duration::from_millis(300);

/// Modules that start out hidden from the mirror when first seen.
pub const DEFAULT_FORCE_HIDDEN: &[&str] = &["MMM-QRAccess"];

/// Modules a configured session disables and hides on start-up.
pub const DEFAULT_SUPPRESS_ON_START: &[&str] = &["MMM-QRAccess"];

/// Configuration for one mirror.
///
/// Built by CLI/TUI, passed to `Mirror` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Mirror base URL (e.g., `http://192.168.1.80:8080`).
    pub url: Url,
    /// MMM-Remote-Control `apiKey`, if the mirror requires one.
    pub api_key: Option<SecretString>,
    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Accept self-signed TLS certificates.
    pub danger_accept_invalid_certs: bool,
    /// How often the poller re-fetches active modules.
    pub poll_interval: Duration,
    /// Quiet window before a brightness change is sent.
    pub brightness_debounce: Duration,
    /// Module names hidden from every listing, on top of the built-in list.
    pub extra_blacklist: Vec<String>,
    /// Module names forced to `hidden = true` before merging.
    pub force_hidden: Vec<String>,
    /// Modules to suppress (disable + hide) once on start-up.
    pub suppress_on_start: Vec<String>,
    /// Directory holding persisted app state. `None` keeps state in memory.
    pub state_dir: Option<PathBuf>,
}

impl MirrorConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_key: None,
            timeout: None,
            danger_accept_invalid_certs: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            brightness_debounce: DEFAULT_BRIGHTNESS_DEBOUNCE,
            extra_blacklist: Vec::new(),
            force_hidden: DEFAULT_FORCE_HIDDEN.iter().map(|s| (*s).to_owned()).collect(),
            suppress_on_start: Vec::new(),
            state_dir: None,
        }
    }

    pub(crate) fn transport(&self) -> mirrorctl_api::TransportConfig {
        mirrorctl_api::TransportConfig {
            timeout: self.timeout,
            danger_accept_invalid_certs: self.danger_accept_invalid_certs,
            api_key: self.api_key.clone(),
        }
    }
}
