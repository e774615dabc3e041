//! Dashboard command handlers. Dashboard visibility is a local preference;
//! nothing here changes what the mirror shows.

use std::time::Duration;

use chrono::Local;

use mirrorctl_core::{AppState, Mirror};

use crate::cli::{DashboardArgs, DashboardCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::modules::{app_detail, app_row};
use super::util;

pub async fn handle(mirror: &Mirror, args: DashboardArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DashboardCommand::List { all } => {
            util::load_apps(mirror, global.quiet).await?;
            print_apps(&listed_apps(mirror, all).await, global);
            Ok(())
        }

        DashboardCommand::Hide { module } => set_dashboard(mirror, &module, false, global).await,
        DashboardCommand::Unhide { module } => set_dashboard(mirror, &module, true, global).await,

        DashboardCommand::Watch { interval } => watch(mirror, interval, global).await,
    }
}

async fn listed_apps(mirror: &Mirror, all: bool) -> Vec<AppState> {
    if all {
        mirror.apps_snapshot().to_vec()
    } else {
        mirror.dashboard_apps().await
    }
}

fn print_apps(apps: &[AppState], global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_list(&global.output, apps, |a| app_row(a, color), |a| a.id.clone());
    output::print_output(&out, global.quiet);
}

async fn set_dashboard(mirror: &Mirror, key: &str, visible: bool, global: &GlobalOpts) -> Result<(), CliError> {
    util::load_apps(mirror, global.quiet).await?;
    let app = mirror.resolve_app(key).await?;

    let app = if app.is_hidden_from_dashboard == visible {
        mirror.toggle_dashboard_visibility(&app.id).await?
    } else {
        app
    };

    if !global.quiet {
        let state = if app.is_hidden_from_dashboard { "hidden from" } else { "shown on" };
        eprintln!("✓ {} is {state} the dashboard", app.display_name());
    }
    let out = output::render_single(&global.output, &app, app_detail, |a| a.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Re-fetch and print dashboard modules every `interval` until Ctrl+C.
///
/// A failed refresh is reported and the loop keeps going with the last
/// known state.
async fn watch(mirror: &Mirror, interval: Duration, global: &GlobalOpts) -> Result<(), CliError> {
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                if let Err(e) = mirror.refresh_modules().await {
                    eprintln!("Refresh failed: {e}");
                }
                if !global.quiet {
                    eprintln!("── {} ──", Local::now().format("%H:%M:%S"));
                }
                print_apps(&mirror.dashboard_apps().await, global);
            }
        }
    }

    Ok(())
}
