//! Analytics collector handlers.
//!
//! Receives what the client behavior tracker forwards. Authentication is
//! optional; when present the caller's ID is stored with the record.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use sweet_home_core::{InteractionRecord, SessionRecord};

use super::addresses::Ack;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Store one interaction forwarded at capture time.
#[instrument(skip(state, payload))]
pub async fn track_interaction(
    State(state): State<AppState>,
    OptionalAuth(user_id): OptionalAuth,
    payload: std::result::Result<Json<InteractionRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Ack>)> {
    let Json(record) = payload?;

    state
        .analytics()
        .record_interaction(user_id, &record)
        .await?;

    tracing::debug!(
        interaction_type = %record.interaction_type(),
        tag = %record.element().tag,
        "Interaction recorded"
    );
    Ok((StatusCode::CREATED, Json(Ack { success: true })))
}

/// Store one session aggregate flushed on page hide.
#[instrument(skip(state, payload))]
pub async fn track_session(
    State(state): State<AppState>,
    OptionalAuth(user_id): OptionalAuth,
    payload: std::result::Result<Json<SessionRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Ack>)> {
    let Json(record) = payload?;

    if record.scroll_depth > SessionRecord::MAX_SCROLL_DEPTH {
        return Err(AppError::BadRequest(format!(
            "scrollDepth must be between 0 and {}",
            SessionRecord::MAX_SCROLL_DEPTH
        )));
    }
    if record.time_on_page > SessionRecord::MAX_TIME_ON_PAGE {
        return Err(AppError::BadRequest(format!(
            "timeOnPage must be between 0 and {}",
            SessionRecord::MAX_TIME_ON_PAGE
        )));
    }

    state.analytics().record_session(user_id, &record).await?;

    tracing::debug!(
        scroll_depth = record.scroll_depth,
        time_on_page = record.time_on_page,
        interactions = record.interactions.len(),
        "Session recorded"
    );
    Ok((StatusCode::CREATED, Json(Ack { success: true })))
}
