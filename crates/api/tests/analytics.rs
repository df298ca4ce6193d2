//! Router-level tests for the analytics collector.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use sweet_home_api::config::{ApiConfig, StorageConfig};
use sweet_home_api::db::{MemoryAddressStore, MemoryAnalyticsStore};
use sweet_home_api::routes;
use sweet_home_api::state::AppState;
use sweet_home_core::{InteractionType, UserId};

fn setup() -> (Router, AppState, Arc<MemoryAnalyticsStore>) {
    let config = ApiConfig {
        storage: StorageConfig::Memory,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        jwt_secret: SecretString::from("Zt8#qLw2!Pc5@Hn9$Vr3^Bx7&Md1*Ks4"),
        cors_origins: Vec::new(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_traces_sample_rate: 0.0,
    };
    let analytics = Arc::new(MemoryAnalyticsStore::new());
    let state = AppState::new(config, Arc::new(MemoryAddressStore::new()), analytics.clone());
    (routes::app(state.clone()), state, analytics)
}

async fn post(app: &Router, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn click_payload() -> Value {
    json!({
        "type": "click",
        "element": {"tag": "BUTTON", "id": "buy", "class": "btn primary"},
        "timestamp": "2026-03-01T10:15:00Z",
        "details": {"text": "Buy Now", "href": null, "class": "btn primary"},
    })
}

#[tokio::test]
async fn test_track_interaction_anonymous() {
    let (app, _, analytics) = setup();

    let (status, body) = post(
        &app,
        "/api/analytics/track-interaction",
        None,
        &click_payload(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true}));

    let stored = analytics.interactions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].0, None);
    assert_eq!(stored[0].1.interaction_type(), InteractionType::Click);
}

#[tokio::test]
async fn test_track_interaction_attributes_authenticated_caller() {
    let (app, state, analytics) = setup();
    let user = UserId::generate();
    let token = state.tokens().issue(user, Duration::hours(1)).unwrap();

    let (status, _) = post(
        &app,
        "/api/analytics/track-interaction",
        Some(&token),
        &click_payload(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(analytics.interactions().await[0].0, Some(user));
}

#[tokio::test]
async fn test_track_interaction_rejects_unknown_type() {
    let (app, _, analytics) = setup();
    let mut payload = click_payload();
    payload["type"] = json!("hover");

    let (status, body) = post(&app, "/api/analytics/track-interaction", None, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(analytics.interactions().await.is_empty());
}

#[tokio::test]
async fn test_track_session_accepts_batch() {
    let (app, _, analytics) = setup();
    let payload = json!({
        "scrollDepth": 40,
        "timeOnPage": 12,
        "interactions": [click_payload(), {
            "type": "search",
            "element": {"tag": "INPUT", "id": "q", "name": "q"},
            "timestamp": "2026-03-01T10:15:04Z",
            "details": {"query": "sofa"},
        }],
    });

    let (status, _) = post(&app, "/api/analytics/track-session", None, &payload).await;

    assert_eq!(status, StatusCode::CREATED);
    let sessions = analytics.sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].1.scroll_depth, 40);
    assert_eq!(sessions[0].1.time_on_page, 12);
    assert_eq!(sessions[0].1.interactions.len(), 2);
}

#[tokio::test]
async fn test_track_session_rejects_scroll_depth_over_100() {
    let (app, _, analytics) = setup();
    let payload = json!({"scrollDepth": 101, "timeOnPage": 3, "interactions": []});

    let (status, body) = post(&app, "/api/analytics/track-session", None, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(analytics.sessions().await.is_empty());
}

#[tokio::test]
async fn test_track_session_rejects_time_on_page_beyond_storage() {
    let (app, _, analytics) = setup();
    let payload = json!({
        "scrollDepth": 10,
        "timeOnPage": 9_223_372_036_854_775_808_u64,
        "interactions": []
    });

    let (status, body) = post(&app, "/api/analytics/track-session", None, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(analytics.sessions().await.is_empty());
}

#[tokio::test]
async fn test_invalid_token_on_optional_route_is_anonymous() {
    let (app, _, analytics) = setup();

    let (status, _) = post(
        &app,
        "/api/analytics/track-interaction",
        Some("not-a-jwt"),
        &click_payload(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(analytics.interactions().await[0].0, None);
}
