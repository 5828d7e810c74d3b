// ── Runtime connection configuration ──
//
// These types describe *how* to reach the REST backend and how big a
// page is. They never touch disk: front ends build a `ConsoleConfig`
// and hand it in.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use backoffice_api::{TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed dev backends).
    DangerAcceptInvalid,
}

/// Configuration for one console session against one backend.
///
/// Built by the CLI, passed to `Console::connect`.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend root (e.g., `http://localhost:3000`).
    pub backend_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout, enforced by the HTTP client.
    pub timeout: Duration,
    /// Initial page size for every collection screen.
    pub page_size: NonZeroUsize,
}

impl ConsoleConfig {
    pub const DEFAULT_BACKEND: &'static str = "http://localhost:3000";
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            page_size: NonZeroUsize::new(Self::DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let url = Url::parse(Self::DEFAULT_BACKEND)
            .unwrap_or_else(|_| unreachable!("default backend URL is valid"));
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ConsoleConfig::default();
        assert_eq!(config.backend_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.page_size.get(), 10);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn transport_carries_tls_and_timeout() {
        let config = ConsoleConfig {
            tls: TlsVerification::DangerAcceptInvalid,
            timeout: Duration::from_secs(5),
            ..ConsoleConfig::default()
        };
        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }
}
