//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use crate::config::Context;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractive {
            action: message.to_owned(),
            hint: "Use --yes (-y) to skip confirmation in non-interactive contexts.".into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON object file for `--from-file` flags.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::Validation {
            field: "from-file".into(),
            reason: "expected a JSON object".into(),
        }),
    }
}

/// Parse `FIELD=VALUE` pairs. Values stay strings; numeric columns are
/// converted by the schema.
pub fn parse_assignments(pairs: &[String]) -> Result<Vec<(String, String)>, CliError> {
    pairs
        .iter()
        .map(|pair| {
            let (field, value) = pair.split_once('=').ok_or_else(|| CliError::Validation {
                field: "set".into(),
                reason: format!("expected FIELD=VALUE, got '{pair}'"),
            })?;
            let field = field.trim();
            if field.is_empty() {
                return Err(CliError::Validation {
                    field: "set".into(),
                    reason: format!("missing field name in '{pair}'"),
                });
            }
            Ok((field.to_owned(), value.to_owned()))
        })
        .collect()
}

/// Await `work` behind a spinner on an interactive stderr.
pub async fn with_spinner<F: Future>(ctx: &Context, message: &str, work: F) -> F::Output {
    if ctx.quiet || !std::io::stderr().is_terminal() {
        return work.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = work.await;
    spinner.finish_and_clear();
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        let pairs = vec!["title=Desk".to_owned(), "description=a=b".to_owned()];
        let parsed = parse_assignments(&pairs).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("title".to_owned(), "Desk".to_owned()),
                ("description".to_owned(), "a=b".to_owned()),
            ]
        );
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        let err = parse_assignments(&["price".to_owned()]).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
        assert!(parse_assignments(&["=5".to_owned()]).is_err());
    }

    #[test]
    fn json_file_must_hold_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");

        std::fs::write(&path, r#"{"title": "Desk", "price": 12}"#).unwrap();
        let map = read_json_object(&path).unwrap();
        assert_eq!(map["price"], 12);

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(read_json_object(&path).is_err());
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }
}
