//! Shared configuration for the mirrorctl CLI and TUI.
//!
//! TOML profiles, API-key resolution (env + keyring + plaintext), and
//! translation to `mirrorctl_core::MirrorConfig`. Both binaries depend on
//! this crate; the CLI layers its `GlobalOpts` overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use mirrorctl_core::MirrorConfig;
use mirrorctl_core::config::{
    DEFAULT_BRIGHTNESS_DEBOUNCE, DEFAULT_FORCE_HIDDEN, DEFAULT_POLL_INTERVAL,
    DEFAULT_SUPPRESS_ON_START,
};

/// Keyring service name for stored API keys.
pub const KEYRING_SERVICE: &str = "mirrorctl";

/// URL used when no profile is configured.
pub const DEFAULT_URL: &str = "http://localhost:8080";

/// Environment variables owned by the CLI flags, not the config file.
const CLI_ENV_KEYS: &[&str] = &["profile", "output", "timeout", "api_key", "yes", "color"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named mirror profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: None,
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_url() -> String {
    DEFAULT_URL.into()
}

/// A named mirror profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Mirror base URL (e.g., "http://192.168.1.80:8080").
    #[serde(default = "default_url")]
    pub url: String,

    /// API key (plaintext -- prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Override request timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Module poll interval in seconds. `0` disables polling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,

    /// Brightness debounce window in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness_debounce_ms: Option<u64>,

    /// Additional module names to hide from every listing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_blacklist: Vec<String>,

    /// Module names that start hidden. Defaults to `["MMM-QRAccess"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_hidden: Option<Vec<String>>,

    /// Modules to disable and hide when the TUI starts. Defaults to
    /// `["MMM-QRAccess"]`; an empty list turns suppression off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppress_on_start: Option<Vec<String>>,

    /// Where app state is persisted. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            api_key_env: None,
            timeout: None,
            insecure: None,
            poll_interval: None,
            brightness_debounce_ms: None,
            extra_blacklist: Vec::new(),
            force_hidden: None,
            suppress_on_start: None,
            state_dir: None,
        }
    }
}

impl Config {
    /// Pick the profile to use: `requested`, else `default_profile`,
    /// else `"default"`.
    ///
    /// A missing implicit profile falls back to `Profile::default()`;
    /// a missing explicitly requested one is an error.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<(String, Profile), ConfigError> {
        if let Some(name) = requested {
            return self
                .profiles
                .get(name)
                .cloned()
                .map(|p| (name.to_owned(), p))
                .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() });
        }

        let name = self
            .default_profile
            .clone()
            .unwrap_or_else(|| "default".into());
        let profile = self.profiles.get(&name).cloned().unwrap_or_default();
        Ok((name, profile))
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "mirrorctl", "mirrorctl")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory where a profile's app state lives unless overridden.
pub fn default_state_dir(profile_name: &str) -> PathBuf {
    project_dirs()
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
        .join("state")
        .join(profile_name)
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mirrorctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// `MIRRORCTL_*` variables override file values; nested keys use a
/// double underscore (`MIRRORCTL_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MIRRORCTL_").ignore(CLI_ENV_KEYS).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── API key resolution ──────────────────────────────────────────────

/// Resolve the profile's API key, if it has one.
///
/// Order: the env var named by `api_key_env`, the system keyring, then
/// the plaintext `api_key`. Mirrors without `apiKey` set need none.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's api_key_env -> env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile.api_key.clone().map(SecretString::from)
}

/// Store an API key in the system keyring for `profile_name`.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .map_err(|e| ConfigError::Keyring(e.to_string()))?;
    entry
        .set_password(key)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/api-key")
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and check a mirror URL.
pub fn parse_mirror_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected http or https, got '{other}'"),
        }),
    }
}

/// Build a `MirrorConfig` from a profile -- no CLI flag overrides.
///
/// Profile values win over `defaults`; anything unset falls back to the
/// core defaults (30 s polling, 300 ms debounce, no timeout).
pub fn profile_to_mirror_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MirrorConfig, ConfigError> {
    let url = parse_mirror_url(&profile.url)?;

    let mut cfg = MirrorConfig::new(url);
    cfg.api_key = resolve_api_key(profile, profile_name);
    cfg.timeout = profile
        .timeout
        .or(defaults.timeout)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);
    cfg.danger_accept_invalid_certs = profile.insecure.unwrap_or(defaults.insecure);
    cfg.poll_interval = profile
        .poll_interval
        .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs);
    cfg.brightness_debounce = profile
        .brightness_debounce_ms
        .map_or(DEFAULT_BRIGHTNESS_DEBOUNCE, Duration::from_millis);
    cfg.extra_blacklist.clone_from(&profile.extra_blacklist);
    cfg.force_hidden = profile.force_hidden.clone().unwrap_or_else(|| {
        DEFAULT_FORCE_HIDDEN.iter().map(|s| (*s).to_owned()).collect()
    });
    cfg.suppress_on_start = profile.suppress_on_start.clone().unwrap_or_else(|| {
        DEFAULT_SUPPRESS_ON_START.iter().map(|s| (*s).to_owned()).collect()
    });
    cfg.state_dir = Some(
        profile
            .state_dir
            .clone()
            .unwrap_or_else(|| default_state_dir(profile_name)),
    );

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_and_env_layers_merge() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    default_profile = "hallway"

                    [defaults]
                    output = "json"

                    [profiles.hallway]
                    url = "http://192.168.1.80:8080"
                    poll_interval = 10
                    extra_blacklist = ["MMM-Private"]
                "#,
            )?;
            jail.set_env("MIRRORCTL_DEFAULTS__OUTPUT", "yaml");
            jail.set_env("MIRRORCTL_API_KEY", "ignored-by-config");

            let cfg = load_config_from(&jail.directory().join("config.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.default_profile.as_deref(), Some("hallway"));
            assert_eq!(cfg.defaults.output, "yaml");

            let (name, profile) = cfg.select_profile(None).map_err(|e| e.to_string())?;
            assert_eq!(name, "hallway");
            assert_eq!(profile.poll_interval, Some(10));
            assert_eq!(profile.extra_blacklist, vec!["MMM-Private".to_owned()]);
            Ok(())
        });
    }

    #[test]
    fn explicit_unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.select_profile(Some("bedroom")),
            Err(ConfigError::ProfileNotFound { .. })
        ));
        let (name, profile) = cfg.select_profile(None).expect("implicit default");
        assert_eq!(name, "default");
        assert_eq!(profile.url, DEFAULT_URL);
    }

    #[test]
    fn profile_translates_to_mirror_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = Profile {
            url: "http://mirror.local:8080/".into(),
            timeout: Some(5),
            poll_interval: Some(0),
            brightness_debounce_ms: Some(150),
            suppress_on_start: Some(Vec::new()),
            state_dir: Some(dir.path().to_path_buf()),
            ..Profile::default()
        };

        let cfg = profile_to_mirror_config(&profile, "test-profile-translation", &Defaults::default())
            .expect("config");
        assert_eq!(cfg.url.as_str(), "http://mirror.local:8080/");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.poll_interval, Duration::ZERO);
        assert_eq!(cfg.brightness_debounce, Duration::from_millis(150));
        assert_eq!(cfg.force_hidden, vec!["MMM-QRAccess".to_owned()]);
        assert!(cfg.suppress_on_start.is_empty());
        assert_eq!(cfg.state_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn defaults_apply_when_profile_is_silent() {
        let defaults = Defaults {
            timeout: Some(12),
            insecure: true,
            ..Defaults::default()
        };
        let cfg = profile_to_mirror_config(&Profile::default(), "test-defaults", &defaults)
            .expect("config");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(12)));
        assert!(cfg.danger_accept_invalid_certs);
        assert_eq!(cfg.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(cfg.suppress_on_start, vec!["MMM-QRAccess".to_owned()]);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            parse_mirror_url("ftp://mirror.local"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            parse_mirror_url("not a url"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_round_trips_through_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "http://192.168.1.80:8080".into(),
                force_hidden: Some(vec![]),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).expect("save");
        let raw = std::fs::read_to_string(&path).expect("read");
        let loaded: Config = toml::from_str(&raw).expect("parse");
        assert_eq!(loaded, cfg);
    }
}
