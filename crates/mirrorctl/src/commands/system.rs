//! System, monitor, and brightness command handlers.

use mirrorctl_core::{Mirror, SystemAction, SystemInfo};

use crate::cli::{BrightnessArgs, GlobalOpts, MonitorArgs, MonitorCommand, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn ping(mirror: &Mirror, global: &GlobalOpts) -> Result<(), CliError> {
    mirror.ping().await?;
    if !global.quiet {
        eprintln!("✓ Mirror at {} is answering", mirror.config().url);
    }
    Ok(())
}

pub async fn handle(mirror: &Mirror, args: SystemArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let action = match args.command {
        SystemCommand::Info => return info(mirror, global).await,
        SystemCommand::Refresh => SystemAction::Refresh,
        SystemCommand::Restart => SystemAction::Restart,
        SystemCommand::Reboot => SystemAction::Reboot,
        SystemCommand::Shutdown => SystemAction::Shutdown,
        SystemCommand::Minimize => SystemAction::Minimize,
        SystemCommand::Fullscreen => SystemAction::ToggleFullscreen,
        SystemCommand::Devtools => SystemAction::DevTools,
    };
    run_action(mirror, action, global).await
}

pub async fn handle_monitor(mirror: &Mirror, args: MonitorArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let action = match args.command {
        MonitorCommand::On => SystemAction::MonitorOn,
        MonitorCommand::Off => SystemAction::MonitorOff,
    };
    run_action(mirror, action, global).await
}

pub async fn handle_brightness(
    mirror: &Mirror,
    args: BrightnessArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    mirror.set_brightness(args.value).await?;
    if !global.quiet {
        eprintln!("✓ Brightness set to {}", args.value);
    }
    Ok(())
}

async fn run_action(mirror: &Mirror, action: SystemAction, global: &GlobalOpts) -> Result<(), CliError> {
    if action.is_destructive() {
        let prompt = format!("{}? {}", action.title(), action.description());
        if !util::confirm(&prompt, global.yes)? {
            return Ok(());
        }
    }

    mirror.run_system_action(action).await?;
    if !global.quiet {
        eprintln!("✓ {} requested", action.title());
    }
    Ok(())
}

async fn info(mirror: &Mirror, global: &GlobalOpts) -> Result<(), CliError> {
    let info = mirror.system_info().await?;
    let out = output::render_single(&global.output, &info, info_detail, |i| i.platform.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn info_detail(info: &SystemInfo) -> String {
    let modules = info
        .configured_modules
        .map_or_else(|| "unknown".to_owned(), |n| n.to_string());
    [
        format!("Status:     {}", if info.success { "Connected" } else { "Unavailable" }),
        format!("Platform:   {}", info.platform),
        format!("Node:       {}", info.node_version),
        format!("Brightness: {}", info.brightness),
        format!("Modules:    {modules}"),
    ]
    .join("\n")
}
