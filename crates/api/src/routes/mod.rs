//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (store reachable)
//!
//! # Addresses (requires auth)
//! GET    /api/addresses                   - List caller's addresses
//! POST   /api/addresses                   - Add an address
//! PUT    /api/addresses/{id}              - Update an address
//! DELETE /api/addresses/{id}              - Delete an address
//! PATCH  /api/addresses/{id}/default      - Mark an address as default
//!
//! # Analytics collector (auth optional)
//! POST   /api/analytics/track-interaction - Store one interaction
//! POST   /api/analytics/track-session     - Store one session aggregate
//! ```

pub mod addresses;
pub mod analytics;
pub mod health;

use std::time::Duration;

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::list).post(addresses::create))
        .route("/{id}", put(addresses::update).delete(addresses::delete))
        .route("/{id}/default", patch(addresses::set_default))
}

/// Create the analytics collector routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/track-interaction", post(analytics::track_interaction))
        .route("/track-session", post(analytics::track_session))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/addresses", address_routes())
        .nest("/api/analytics", analytics_routes())
}

/// Build the complete application with middleware and state applied.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    routes()
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}
