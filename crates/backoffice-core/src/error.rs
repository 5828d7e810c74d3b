// ── Core error types ──
//
// `ErrorInfo` is the structured failure value returned by every remote
// operation. Consumers never see HTTP status codes or JSON parse failures
// directly: the `From<backoffice_api::Error>` impl folds transport-layer
// errors into the four error kinds. `CoreError` adds the failures that
// belong to the core itself (state-machine misuse, auth, validation).

use std::collections::BTreeMap;

use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Field name -> human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

/// Classification of an [`ErrorInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Transport or connection failure; no HTTP response was received.
    Network,
    /// Non-2xx response, or a response the client could not decode.
    Server,
    /// The mutation target does not exist (server- or client-side).
    NotFound,
    /// Local field check failed. Never produced by a network call.
    Validation,
}

/// Structured failure value with a kind and a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// A network failure caused by the request timeout elapsing.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Network && self.message.starts_with(TIMED_OUT)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

const TIMED_OUT: &str = "request timed out";

impl From<backoffice_api::Error> for ErrorInfo {
    fn from(err: backoffice_api::Error) -> Self {
        use backoffice_api::Error as Api;

        tracing::debug!(status = ?err.status(), transport = err.is_transport(), "backend call failed");
        let status_not_found = err.is_not_found();
        match err {
            Api::NotFound { url } => Self::not_found(format!("no such record: {url}")),
            Api::Transport(e) if status_not_found => Self::not_found(e.to_string()),
            Api::Transport(e) if e.is_timeout() => Self::network(format!("{TIMED_OUT}: {e}")),
            Api::Transport(e) => Self::network(e.to_string()),
            Api::InvalidUrl(e) => Self::network(format!("invalid URL: {e}")),
            Api::InvalidBaseUrl(url) => Self::network(format!("unusable base URL: {url}")),
            Api::Tls(msg) => Self::network(format!("TLS error: {msg}")),
            Api::Status { status, message } => Self::server(format!("HTTP {status}: {message}")),
            Api::Deserialization { message, body: _ } => {
                Self::server(format!("malformed response: {message}"))
            }
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote ───────────────────────────────────────────────────────
    /// A remote operation failed. State was left unchanged.
    #[error(transparent)]
    Remote(#[from] ErrorInfo),

    // ── Local ────────────────────────────────────────────────────────
    #[error("Validation failed: {}", summarize(.errors))]
    Validation { errors: FieldErrors },

    #[error("Cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: String,
    },

    #[error("Not signed in; redirecting to {redirect}")]
    Unauthenticated { redirect: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The structured `ErrorInfo` for this error, if it has one.
    ///
    /// Validation failures report as `ErrorKind::Validation`.
    pub fn info(&self) -> Option<ErrorInfo> {
        match self {
            Self::Remote(info) => Some(info.clone()),
            Self::Validation { errors } => Some(ErrorInfo::validation(summarize(errors))),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Remote(info) => Some(info.kind),
            Self::Validation { .. } => Some(ErrorKind::Validation),
            _ => None,
        }
    }

    pub(crate) fn transition(operation: &'static str, state: impl ToString) -> Self {
        Self::InvalidTransition {
            operation,
            state: state.to_string(),
        }
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("; ")
}
