//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (browser storefront and admin origins)
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Request ID (propagate or generate `x-request-id`)
//!
//! Authentication is not a layer: handlers opt in with the [`RequireAuth`]
//! or [`OptionalAuth`] extractors.

pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::{OptionalAuth, RequireAuth};
pub use cors::cors_layer;
pub use request_id::{RequestId, request_id_middleware};
