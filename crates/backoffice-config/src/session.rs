// ── Session marker stores ──
//
// A signed-in session is nothing more than a stored marker. The auth
// gate only asks whether one is present; `login`/`logout` write and
// clear it. Markers live either in a TOML file in the data dir or in
// the system keyring.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;
use uuid::Uuid;

use backoffice_core::SessionContext;

use crate::{ConfigError, data_dir};

const KEYRING_SERVICE: &str = "backoffice";

/// Contents of a session marker. Never interpreted by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub user: String,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl SessionMarker {
    /// A fresh marker with a random token.
    pub fn issue(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: Uuid::new_v4().to_string(),
            issued_at: Utc::now(),
        }
    }
}

/// Where a profile keeps its session marker.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStoreKind {
    #[default]
    File,
    Keyring,
}

/// Read/write access to a session marker.
pub trait MarkerStore: SessionContext {
    fn read(&self) -> Result<Option<SessionMarker>, ConfigError>;

    fn write(&self, marker: &SessionMarker) -> Result<(), ConfigError>;

    /// Remove the marker. Returns whether one was present.
    fn clear(&self) -> Result<bool, ConfigError>;
}

// ── File ────────────────────────────────────────────────────────────

/// Marker stored as a TOML file, one per profile.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/sessions/<profile>.toml`
    pub fn for_profile(profile: &str) -> Self {
        Self::new(data_dir().join("sessions").join(format!("{profile}.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionContext for FileSession {
    fn is_authenticated(&self) -> bool {
        self.path.is_file()
    }
}

impl MarkerStore for FileSession {
    fn read(&self) -> Result<Option<SessionMarker>, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write(&self, marker: &SessionMarker) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(marker)?)?;
        debug!(path = %self.path.display(), "session marker written");
        Ok(())
    }

    fn clear(&self) -> Result<bool, ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Marker stored in the system keyring under `backoffice / <profile>/session`.
#[derive(Debug, Clone)]
pub struct KeyringSession {
    account: String,
}

impl KeyringSession {
    pub fn for_profile(profile: &str) -> Self {
        Self {
            account: format!("{profile}/session"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, ConfigError> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, &self.account)?)
    }
}

impl SessionContext for KeyringSession {
    fn is_authenticated(&self) -> bool {
        self.entry()
            .and_then(|entry| entry.get_password().map_err(ConfigError::from))
            .is_ok()
    }
}

impl MarkerStore for KeyringSession {
    fn read(&self) -> Result<Option<SessionMarker>, ConfigError> {
        let raw = match self.entry()?.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: PathBuf::from(format!("keyring:{}", self.account)),
                source,
            })
    }

    fn write(&self, marker: &SessionMarker) -> Result<(), ConfigError> {
        self.entry()?.set_password(&toml::to_string(marker)?)?;
        debug!(account = %self.account, "session marker stored in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<bool, ConfigError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Either ──────────────────────────────────────────────────────────

/// The marker store a profile is configured for.
#[derive(Debug, Clone)]
pub enum SessionStore {
    File(FileSession),
    Keyring(KeyringSession),
}

impl SessionStore {
    pub fn for_profile(kind: SessionStoreKind, profile: &str) -> Self {
        match kind {
            SessionStoreKind::File => Self::File(FileSession::for_profile(profile)),
            SessionStoreKind::Keyring => Self::Keyring(KeyringSession::for_profile(profile)),
        }
    }

    fn inner(&self) -> &dyn MarkerStore {
        match self {
            Self::File(s) => s,
            Self::Keyring(s) => s,
        }
    }
}

impl SessionContext for SessionStore {
    fn is_authenticated(&self) -> bool {
        self.inner().is_authenticated()
    }
}

impl MarkerStore for SessionStore {
    fn read(&self) -> Result<Option<SessionMarker>, ConfigError> {
        self.inner().read()
    }

    fn write(&self, marker: &SessionMarker) -> Result<(), ConfigError> {
        self.inner().write(marker)
    }

    fn clear(&self) -> Result<bool, ConfigError> {
        self.inner().clear()
    }
}
