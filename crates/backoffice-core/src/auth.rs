// ── Auth gate ──
//
// Presence check in front of every protected screen. The session marker
// is an explicit `SessionContext` value handed to the gate; the gate
// never caches its answer.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::CoreError;

/// Anything that can answer "is a session currently signed in?".
pub trait SessionContext: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

impl<S: SessionContext + ?Sized> SessionContext for Arc<S> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

impl<S: SessionContext + ?Sized> SessionContext for &S {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

/// In-process session marker. Lock-free reads via `arc-swap`.
pub struct MemorySession {
    marker: ArcSwapOption<SecretString>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self {
            marker: ArcSwapOption::empty(),
        }
    }

    pub fn signed_in(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        self.marker
            .store(Some(Arc::new(SecretString::from(token.into()))));
    }

    pub fn sign_out(&self) {
        self.marker.store(None);
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySession")
            .field("signed_in", &self.is_authenticated())
            .finish()
    }
}

impl SessionContext for MemorySession {
    fn is_authenticated(&self) -> bool {
        self.marker.load().is_some()
    }
}

/// Console screens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Screen {
    Login,
    Dashboard,
    Users,
    Products,
    Profile,
}

impl Screen {
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Login)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Users => "/users",
            Self::Products => "/products",
            Self::Profile => "/profile",
        }
    }
}

/// What to do when navigating to a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render(Screen),
    Redirect { to: Screen },
}

/// Guard evaluated at the boundary of every protected screen.
#[derive(Debug, Clone)]
pub struct AuthGate<S> {
    session: S,
}

impl<S: SessionContext> AuthGate<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Evaluated afresh on every call.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn enter(&self, screen: Screen) -> GateDecision {
        if !screen.is_protected() || self.is_authenticated() {
            GateDecision::Render(screen)
        } else {
            GateDecision::Redirect { to: Screen::Login }
        }
    }

    /// Like [`enter`](Self::enter), but as a `Result` for `?` chains.
    pub fn require(&self, screen: Screen) -> Result<(), CoreError> {
        match self.enter(screen) {
            GateDecision::Render(_) => Ok(()),
            GateDecision::Redirect { to } => Err(CoreError::Unauthenticated {
                redirect: to.path().to_owned(),
            }),
        }
    }
}
