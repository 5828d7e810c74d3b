//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use backoffice_config::ConfigError;
use backoffice_core::{CoreError, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(backoffice::connection_failed),
        help(
            "Check that the backend is running and the profile URL is right.\n\
             Try: backoffice config show"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(backoffice::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(backoffice::not_signed_in),
        help("Sign in first with: backoffice login --profile {profile}")
    )]
    NotSignedIn { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(backoffice::not_found))]
    NotFound {
        message: String,
        #[help]
        hint: Option<String>,
    },

    #[error("Backend rejected the request: {message}")]
    #[diagnostic(code(backoffice::server_error))]
    Server { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(backoffice::validation))]
    Validation { field: String, reason: String },

    #[error("{summary}")]
    #[diagnostic(
        code(backoffice::form_invalid),
        help("Supply the missing fields with --set FIELD=VALUE")
    )]
    Form { summary: String },

    #[error("{0}")]
    #[diagnostic(code(backoffice::state))]
    State(String),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(backoffice::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: backoffice config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(backoffice::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' needs a terminal to prompt")]
    #[diagnostic(
        code(backoffice::confirmation_required),
        help("{hint}")
    )]
    NonInteractive { action: String, hint: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(backoffice::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotSignedIn { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::Form { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractive { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the command that lists the collection to a not-found error.
    pub fn with_list_command(self, command: &str) -> Self {
        match self {
            Self::NotFound { message, .. } => Self::NotFound {
                message,
                hint: Some(format!("Run: backoffice {command} to see what is loaded")),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Remote(info) if info.is_timeout() => CliError::Timeout {
                message: info.message,
            },
            CoreError::Remote(info) => match info.kind {
                ErrorKind::Network => CliError::ConnectionFailed {
                    message: info.message,
                },
                ErrorKind::NotFound => CliError::NotFound {
                    message: info.message,
                    hint: None,
                },
                ErrorKind::Server => CliError::Server {
                    message: info.message,
                },
                ErrorKind::Validation => CliError::Validation {
                    field: "input".into(),
                    reason: info.message,
                },
            },

            err @ CoreError::Validation { .. } => CliError::Form {
                summary: err.to_string(),
            },

            err @ CoreError::InvalidTransition { .. } => CliError::State(err.to_string()),

            CoreError::Unauthenticated { .. } => CliError::NotSignedIn {
                profile: backoffice_config::DEFAULT_PROFILE.into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => {
                let available = backoffice_config::load_config_or_default()
                    .profiles
                    .into_keys()
                    .collect::<Vec<_>>();
                CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}
