//! Notification, custom command, class, presence, and translation handlers.

use mirrorctl_core::Mirror;

use crate::cli::{GlobalOpts, NotifyArgs, ValueArgs};
use crate::error::CliError;
use crate::output;

use super::modules::print_if_meaningful;

pub async fn handle_notify(mirror: &Mirror, args: NotifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let result = mirror
        .send_notification(&args.name, args.payload.as_deref())
        .await?;
    if !global.quiet {
        eprintln!("✓ Sent {}", args.name);
    }
    print_if_meaningful(&result, global);
    Ok(())
}

pub async fn handle_command(mirror: &Mirror, args: ValueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let result = mirror.execute_command(&args.value).await?;
    if !global.quiet {
        eprintln!("✓ Ran command '{}'", args.value);
    }
    print_if_meaningful(&result, global);
    Ok(())
}

pub async fn handle_class(mirror: &Mirror, args: ValueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let result = mirror.use_class(&args.value).await?;
    if !global.quiet {
        eprintln!("✓ Applied class '{}'", args.value);
    }
    print_if_meaningful(&result, global);
    Ok(())
}

pub async fn handle_presence(mirror: &Mirror, args: ValueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let result = mirror.set_user_presence(&args.value).await?;
    if !global.quiet {
        eprintln!("✓ User presence set to '{}'", args.value);
    }
    print_if_meaningful(&result, global);
    Ok(())
}

pub async fn handle_translations(mirror: &Mirror, global: &GlobalOpts) -> Result<(), CliError> {
    let translations = mirror.translations().await?;
    output::print_output(&output::render_value(&global.output, &translations), global.quiet);
    Ok(())
}
