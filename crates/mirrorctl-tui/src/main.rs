//! `mirrorctl-tui` — Terminal control panel for a MagicMirror².
//!
//! Built on [ratatui](https://ratatui.rs) with reactive state from
//! `mirrorctl-core`'s [`Mirror`](mirrorctl_core::Mirror) watch channels.
//! Screens are navigable via number keys (1-3): Dashboard, Modules, and
//! System.
//!
//! Logs are written to a file (default `$TMPDIR/mirrorctl-tui.log`) to
//! avoid corrupting the terminal UI. A background data bridge task
//! forwards app-state, refresh, and brightness changes into the TUI
//! action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mirrorctl_core::{Mirror, MirrorConfig};

use crate::app::App;

/// Terminal control panel for a MagicMirror².
#[derive(Parser, Debug)]
#[command(name = "mirrorctl-tui", version, about)]
struct Cli {
    /// Profile from the mirrorctl config file
    #[arg(short = 'p', long, env = "MIRRORCTL_PROFILE")]
    profile: Option<String>,

    /// Mirror URL (e.g., http://192.168.1.80:8080), overrides the profile
    #[arg(short = 'u', long, env = "MIRROR_API_URL")]
    url: Option<String>,

    /// MMM-Remote-Control API key, overrides the profile
    #[arg(long, env = "MIRRORCTL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// How often to re-fetch modules (e.g., 30s, 2m)
    #[arg(long, value_parser = humantime::parse_duration)]
    poll_interval: Option<Duration>,

    /// Log file path (defaults to mirrorctl-tui.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// TUI owns the terminal. The returned guard must live until exit so
/// buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "mirrorctl_tui={log_level},mirrorctl_core={log_level},mirrorctl_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("mirrorctl-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "mirrorctl-tui.log".into(), std::ffi::OsStr::to_os_string);

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Build the runtime config: profile first, then flag overrides.
fn build_mirror_config(cli: &Cli) -> Result<MirrorConfig> {
    let cfg = mirrorctl_config::load_config_or_default();
    let (profile_name, mut profile) = cfg.select_profile(cli.profile.as_deref())?;

    if let Some(ref url) = cli.url {
        profile.url.clone_from(url);
    }

    let mut config =
        mirrorctl_config::profile_to_mirror_config(&profile, &profile_name, &cfg.defaults)
            .wrap_err_with(|| format!("invalid settings in profile '{profile_name}'"))?;

    if let Some(ref key) = cli.api_key {
        config.api_key = Some(SecretString::from(key.clone()));
    }
    if let Some(interval) = cli.poll_interval {
        config.poll_interval = interval;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched so early panics print cleanly.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_mirror_config(&cli)?;
    info!(url = %config.url, poll = ?config.poll_interval, "starting mirrorctl-tui");

    let mirror = Mirror::new(config)?;
    mirror.start().await;

    let mut app = App::new(mirror.clone());
    let result = app.run().await;

    app.shutdown().await;
    mirror.shutdown().await;
    result
}
