//! CLI configuration -- thin wrapper around `mirrorctl_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --api-key, etc.).

use std::time::Duration;

use secrecy::SecretString;

use mirrorctl_core::MirrorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use mirrorctl_config::{
    Config, config_path, load_config_or_default, profile_to_mirror_config, save_config, store_api_key,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Build a `MirrorConfig` from the config file, profile, and CLI overrides.
///
/// An explicit `--profile` must exist. Without one, a missing profile
/// falls back to defaults so `--url` alone is enough.
pub fn build_mirror_config(global: &GlobalOpts, cfg: &Config) -> Result<MirrorConfig, CliError> {
    let (profile_name, mut profile) = cfg.select_profile(global.profile.as_deref())?;

    // 1. URL (flag > env > profile)
    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }

    // 2. TLS
    if global.insecure {
        profile.insecure = Some(true);
    }

    let mut mirror = profile_to_mirror_config(&profile, &profile_name, &cfg.defaults)?;

    // 3. API key (flag > profile chain)
    if let Some(ref key) = global.api_key {
        mirror.api_key = Some(SecretString::from(key.clone()));
    }

    // 4. Timeout (flag > profile > defaults); 0 disables it
    if let Some(secs) = global.timeout {
        mirror.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    // 5. State storage
    if global.ephemeral {
        mirror.state_dir = None;
    }

    // One-shot commands never poll.
    mirror.poll_interval = Duration::ZERO;

    Ok(mirror)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use clap::Parser;
    use mirrorctl_config::Profile;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["mirrorctl"];
        argv.extend_from_slice(args);
        argv.push("ping");
        Cli::try_parse_from(argv).expect("parse").global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut profiles = BTreeMap::new();
        profiles.insert(name.to_owned(), profile);
        Config {
            default_profile: Some(name.to_owned()),
            profiles,
            ..Config::default()
        }
    }

    #[test]
    fn url_flag_overrides_profile() {
        let cfg = config_with(
            "home",
            Profile {
                url: "http://10.0.0.5:8080".into(),
                ..Profile::default()
            },
        );
        let mirror = build_mirror_config(&global(&["--url", "http://mirror.local:8080"]), &cfg).expect("config");
        assert_eq!(mirror.url.as_str(), "http://mirror.local:8080/");
        assert!(mirror.poll_interval.is_zero());
    }

    #[test]
    fn api_key_and_timeout_flags_apply() {
        let cfg = config_with("home", Profile::default());
        let mirror =
            build_mirror_config(&global(&["--api-key", "s3cret", "--timeout", "5"]), &cfg).expect("config");
        assert_eq!(
            mirror.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
            Some("s3cret".to_owned())
        );
        assert_eq!(mirror.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn zero_timeout_waits_indefinitely() {
        let cfg = config_with(
            "home",
            Profile {
                timeout: Some(10),
                ..Profile::default()
            },
        );
        let mirror = build_mirror_config(&global(&["--timeout", "0"]), &cfg).expect("config");
        assert_eq!(mirror.timeout, None);
    }

    #[test]
    fn ephemeral_flag_drops_state_dir() {
        let cfg = config_with("home", Profile::default());
        let persisted = build_mirror_config(&global(&[]), &cfg).expect("config");
        assert!(persisted.state_dir.is_some());

        let ephemeral = build_mirror_config(&global(&["--ephemeral"]), &cfg).expect("config");
        assert_eq!(ephemeral.state_dir, None);
    }

    #[test]
    fn unknown_explicit_profile_is_an_error() {
        let cfg = config_with("home", Profile::default());
        let err = build_mirror_config(&global(&["--profile", "office"]), &cfg).expect_err("missing profile");
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "office"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let cfg = Config::default();
        let err = build_mirror_config(&global(&["--url", "ftp://mirror"]), &cfg).expect_err("bad scheme");
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
