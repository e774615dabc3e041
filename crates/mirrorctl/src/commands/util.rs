//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use tracing::warn;

use mirrorctl_core::{AppState, CoreError, Mirror};

use crate::error::CliError;

/// Fetch active modules into the store.
///
/// When the mirror is unreachable but state from an earlier session is
/// on disk, carry on with that and say so.
pub async fn load_apps(mirror: &Mirror, quiet: bool) -> Result<(), CliError> {
    match mirror.refresh_modules().await {
        Ok(_) => Ok(()),
        Err(e @ (CoreError::ModulesUnavailable | CoreError::ConnectionFailed { .. })) => {
            if mirror.apps_snapshot().is_empty() {
                return Err(e.into());
            }
            warn!(error = %e, "using saved module state");
            if !quiet {
                eprintln!("Mirror unreachable, showing saved state");
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Refresh, then look a module up by id, name, or long name.
pub async fn resolve_app(mirror: &Mirror, key: &str) -> Result<AppState, CliError> {
    mirror.refresh_modules().await?;
    Ok(mirror.resolve_app(key).await?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, the operation is refused.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Reboot the device?", true).expect("confirm"));
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"modules": []}}"#).expect("write");
        let value = read_json_file(file.path()).expect("json");
        assert!(value["modules"].is_array());
    }

    #[test]
    fn rejects_invalid_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "not json").expect("write");
        let err = read_json_file(file.path()).expect_err("invalid");
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "from-file"));
    }
}
