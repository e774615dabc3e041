//! Command dispatch: bridges CLI args -> `Mirror` calls -> output formatting.

pub mod config_cmd;
pub mod dashboard;
pub mod modules;
pub mod notify;
pub mod remote_config;
pub mod system;
pub mod util;

use mirrorctl_core::Mirror;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a mirror-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, mirror: &Mirror, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Ping => system::ping(mirror, global).await,
        Command::Modules(args) => modules::handle(mirror, args, global).await,
        Command::Dashboard(args) => dashboard::handle(mirror, args, global).await,
        Command::System(args) => system::handle(mirror, args, global).await,
        Command::Monitor(args) => system::handle_monitor(mirror, args, global).await,
        Command::Brightness(args) => system::handle_brightness(mirror, args, global).await,
        Command::RemoteConfig(args) => remote_config::handle(mirror, args, global).await,
        Command::Notify(args) => notify::handle_notify(mirror, args, global).await,
        Command::CustomCommand(args) => notify::handle_command(mirror, args, global).await,
        Command::Class(args) => notify::handle_class(mirror, args, global).await,
        Command::Presence(args) => notify::handle_presence(mirror, args, global).await,
        Command::Translations => notify::handle_translations(mirror, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not need a mirror".into(),
        )),
    }
}
