//! Storage for addresses and analytics records.
//!
//! # Database: `sweet_home`
//!
//! ## Tables
//!
//! - `address` - User shipping addresses
//! - `interaction_event` - Individually forwarded tracker interactions
//! - `page_session` - Session aggregates flushed on page hide
//!
//! Handlers only see the [`AddressStore`] and [`AnalyticsStore`] traits. The
//! `PostgreSQL` implementations live in [`addresses`] and [`analytics`]; the
//! in-memory ones in [`memory`] back tests and `SWEET_HOME_STORAGE=memory`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p sweet-home-cli -- migrate
//! ```

pub mod addresses;
pub mod analytics;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use sweet_home_core::{
    Address, AddressId, AddressPatch, InteractionRecord, NewAddress, SessionRecord, UserId,
};

pub use addresses::PgAddressStore;
pub use analytics::PgAnalyticsStore;
pub use memory::{MemoryAddressStore, MemoryAnalyticsStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Caller-scoped address persistence.
///
/// Every method takes the owning user's ID; an address that exists for a
/// different user behaves exactly like one that does not exist.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// All addresses of `user_id`, default ones first, then newest first.
    async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError>;

    /// Persist a new address for `user_id`.
    ///
    /// Other addresses keep their `is_default` flag even when `input.is_default` is set.
    async fn create(&self, user_id: UserId, input: NewAddress) -> Result<Address, RepositoryError>;

    /// Apply `patch` to the address `id` owned by `user_id`.
    ///
    /// Returns `RepositoryError::NotFound` if no such address exists for the user.
    async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        patch: AddressPatch,
    ) -> Result<Address, RepositoryError>;

    /// Delete the address `id` owned by `user_id`.
    ///
    /// Returns `true` if the address was deleted, `false` if it didn't exist.
    async fn delete(&self, user_id: UserId, id: AddressId) -> Result<bool, RepositoryError>;

    /// Mark the address `id` owned by `user_id` as a default.
    ///
    /// Returns `RepositoryError::NotFound` if no such address exists for the user.
    async fn set_default(&self, user_id: UserId, id: AddressId)
    -> Result<Address, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Persistence for tracker payloads received by the collector.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Store one forwarded interaction.
    async fn record_interaction(
        &self,
        user_id: Option<UserId>,
        record: &InteractionRecord,
    ) -> Result<(), RepositoryError>;

    /// Store one flushed session aggregate.
    async fn record_session(
        &self,
        user_id: Option<UserId>,
        record: &SessionRecord,
    ) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
