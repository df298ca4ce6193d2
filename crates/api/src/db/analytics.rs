//! `PostgreSQL` storage for tracker payloads.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use sweet_home_core::{InteractionRecord, SessionRecord, UserId};

use super::{AnalyticsStore, RepositoryError};

/// Analytics repository backed by `sweet_home.interaction_event` and
/// `sweet_home.page_session`.
#[derive(Clone)]
pub struct PgAnalyticsStore {
    pool: PgPool,
}

impl PgAnalyticsStore {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn record_interaction(
        &self,
        user_id: Option<UserId>,
        record: &InteractionRecord,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO sweet_home.interaction_event (user_id, interaction_type, occurred_at, payload)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user_id)
        .bind(record.interaction_type().as_str())
        .bind(record.timestamp())
        .bind(Json(record))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_session(
        &self,
        user_id: Option<UserId>,
        record: &SessionRecord,
    ) -> Result<(), RepositoryError> {
        let time_on_page = i64::try_from(record.time_on_page).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "time on page out of range: {}",
                record.time_on_page
            ))
        })?;

        sqlx::query(
            r"
            INSERT INTO sweet_home.page_session (user_id, scroll_depth, time_on_page, interactions)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user_id)
        .bind(i16::from(record.scroll_depth))
        .bind(time_on_page)
        .bind(Json(&record.interactions))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
