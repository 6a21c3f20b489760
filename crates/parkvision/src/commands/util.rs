//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of hanging.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
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
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Parse an inline `--meta` JSON argument.
pub fn parse_meta(raw: Option<&str>) -> Result<Option<serde_json::Value>, CliError> {
    raw.map(|s| {
        serde_json::from_str(s).map_err(|e| CliError::Validation {
            field: "meta".into(),
            reason: format!("invalid JSON: {e}"),
        })
    })
    .transpose()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a password twice and require both entries to match.
pub fn prompt_new_password() -> Result<String, CliError> {
    let first = rpassword::prompt_password("New password: ").map_err(prompt_err)?;
    if first.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    let second = rpassword::prompt_password("Repeat password: ").map_err(prompt_err)?;
    if first != second {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }
    Ok(first)
}

/// Render an optional timestamp in UTC, or `-`.
pub fn format_time(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}
