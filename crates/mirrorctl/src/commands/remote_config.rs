//! Remote configuration command handlers.

use mirrorctl_core::Mirror;

use crate::cli::{GlobalOpts, RemoteConfigArgs, RemoteConfigCommand};
use crate::error::CliError;
use crate::output;

use super::modules::print_if_meaningful;
use super::util;

pub async fn handle(mirror: &Mirror, args: RemoteConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RemoteConfigCommand::Show => {
            let config = mirror.remote_config().await?;
            output::print_output(&output::render_value(&global.output, &config), global.quiet);
            Ok(())
        }

        RemoteConfigCommand::Backups => {
            let backups = mirror.config_backups().await?;
            output::print_output(&output::render_value(&global.output, &backups), global.quiet);
            Ok(())
        }

        RemoteConfigCommand::SaveDefaults => {
            let result = mirror.save_defaults().await?;
            if !global.quiet {
                eprintln!("✓ Current configuration saved as default");
            }
            print_if_meaningful(&result, global);
            Ok(())
        }

        RemoteConfigCommand::Edit { from_file } => {
            let config = util::read_json_file(&from_file)?;
            if !config.is_object() {
                return Err(CliError::Validation {
                    field: "from-file".into(),
                    reason: "the configuration must be a JSON object".into(),
                });
            }
            if !util::confirm(
                "Replace the mirror configuration? The mirror restarts with it.",
                global.yes,
            )? {
                return Ok(());
            }

            let result = mirror.save_remote_config(&config).await?;
            if !global.quiet {
                eprintln!("✓ Configuration saved from {}", from_file.display());
            }
            print_if_meaningful(&result, global);
            Ok(())
        }
    }
}
