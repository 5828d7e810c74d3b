// ── Console ──
//
// Top-level facade: the auth gate plus one resource manager per
// collection screen. Protected screens pass the gate before anything
// is loaded.

use std::num::NonZeroUsize;

use backoffice_api::CollectionClient;
use serde::Serialize;
use tracing::debug;

use crate::auth::{AuthGate, GateDecision, Screen, SessionContext};
use crate::backend::CollectionBackend;
use crate::config::ConsoleConfig;
use crate::error::{CoreError, ErrorInfo};
use crate::manager::ResourceManager;
use crate::model::EntitySchema;
use crate::model::schema::numeric_value;

/// Headline numbers for the dashboard screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub users: usize,
    pub products: usize,
    /// Sum of product prices; unpriced products count as zero.
    pub catalog_value: f64,
}

pub struct Console<S, B> {
    gate: AuthGate<S>,
    users: ResourceManager<B>,
    products: ResourceManager<B>,
}

impl<S: SessionContext> Console<S, CollectionClient> {
    /// Build REST-backed managers sharing one HTTP client.
    pub fn connect(config: &ConsoleConfig, session: S) -> Result<Self, CoreError> {
        let http = config.transport().build_client().map_err(ErrorInfo::from)?;
        let client = |resource: &str| {
            CollectionClient::with_client(http.clone(), config.backend_url.clone(), resource)
        };
        debug!(backend = %config.backend_url, "console connected");
        Ok(Self::new(
            session,
            client("users"),
            client("products"),
            config.page_size,
        ))
    }
}

impl<S: SessionContext, B: CollectionBackend> Console<S, B> {
    pub fn new(session: S, users: B, products: B, page_size: NonZeroUsize) -> Self {
        Self {
            gate: AuthGate::new(session),
            users: ResourceManager::new(EntitySchema::users(), users, page_size),
            products: ResourceManager::new(EntitySchema::products(), products, page_size),
        }
    }

    pub fn gate(&self) -> &AuthGate<S> {
        &self.gate
    }

    pub fn enter(&self, screen: Screen) -> GateDecision {
        self.gate.enter(screen)
    }

    pub fn users(&self) -> &ResourceManager<B> {
        &self.users
    }

    pub fn products(&self) -> &ResourceManager<B> {
        &self.products
    }

    /// The manager behind a collection screen, if it has one.
    pub fn manager(&self, screen: Screen) -> Option<&ResourceManager<B>> {
        match screen {
            Screen::Users => Some(&self.users),
            Screen::Products => Some(&self.products),
            Screen::Login | Screen::Dashboard | Screen::Profile => None,
        }
    }

    /// Gate, then load the collection if it isn't loaded yet.
    pub async fn open_collection(&self, screen: Screen) -> Result<&ResourceManager<B>, CoreError> {
        self.gate.require(screen)?;
        let manager = self.manager(screen).ok_or_else(|| CoreError::Config {
            message: format!("the {screen} screen has no collection"),
        })?;
        if manager.store().status().can_load() {
            manager.load().await?;
        }
        Ok(manager)
    }

    /// Gate, load both collections concurrently, and summarize.
    pub async fn dashboard(&self) -> Result<DashboardSummary, CoreError> {
        self.gate.require(Screen::Dashboard)?;

        let (users, products) = tokio::join!(
            Self::ensure_loaded(&self.users),
            Self::ensure_loaded(&self.products)
        );
        users?;
        products?;

        let users = self.users.store().snapshot();
        let products = self.products.store().snapshot();
        let catalog_value = products
            .items
            .iter()
            .filter_map(|p| p.get("price").and_then(numeric_value))
            .sum::<f64>();

        Ok(DashboardSummary {
            users: users.len(),
            products: products.len(),
            catalog_value,
        })
    }

    async fn ensure_loaded(manager: &ResourceManager<B>) -> Result<(), CoreError> {
        if manager.store().status().can_load() {
            manager.load().await?;
        }
        Ok(())
    }
}
