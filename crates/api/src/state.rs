//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{ApiConfig, StorageConfig};
use crate::db::{
    self, AddressStore, AnalyticsStore, MemoryAddressStore, MemoryAnalyticsStore,
    PgAddressStore, PgAnalyticsStore,
};
use crate::services::auth::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    tokens: TokenService,
    addresses: Arc<dyn AddressStore>,
    analytics: Arc<dyn AnalyticsStore>,
}

impl AppState {
    /// Create application state with explicit stores.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `addresses` - Address persistence
    /// * `analytics` - Tracker payload persistence
    #[must_use]
    pub fn new(
        config: ApiConfig,
        addresses: Arc<dyn AddressStore>,
        analytics: Arc<dyn AnalyticsStore>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                tokens,
                addresses,
                analytics,
            }),
        }
    }

    /// Create application state with the stores selected by configuration.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the `PostgreSQL` pool cannot be created.
    pub async fn from_config(config: ApiConfig) -> Result<Self, sqlx::Error> {
        let (addresses, analytics): (Arc<dyn AddressStore>, Arc<dyn AnalyticsStore>) =
            match &config.storage {
                StorageConfig::Postgres { database_url } => {
                    let pool = db::create_pool(database_url).await?;
                    tracing::info!("Database pool created");
                    (
                        Arc::new(PgAddressStore::new(pool.clone())),
                        Arc::new(PgAnalyticsStore::new(pool)),
                    )
                }
                StorageConfig::Memory => {
                    tracing::warn!("Using in-memory storage; data is lost on restart");
                    (
                        Arc::new(MemoryAddressStore::new()),
                        Arc::new(MemoryAnalyticsStore::new()),
                    )
                }
            };

        Ok(Self::new(config, addresses, analytics))
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the token verifier.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get the address store.
    #[must_use]
    pub fn addresses(&self) -> &dyn AddressStore {
        self.inner.addresses.as_ref()
    }

    /// Get the analytics store.
    #[must_use]
    pub fn analytics(&self) -> &dyn AnalyticsStore {
        self.inner.analytics.as_ref()
    }
}
