//! Live integration tests for Sweet Home.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API (in-memory storage is enough)
//! SWEET_HOME_STORAGE=memory cargo run -p sweet-home-api
//!
//! # Run the ignored live tests against it
//! cargo test -p sweet-home-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - Server under test (default: `http://localhost:5000`)
//! - `SWEET_HOME_JWT_SECRET` - Same secret the server verifies with

use chrono::Duration;
use secrecy::SecretString;
use sweet_home_api::services::auth::TokenService;
use sweet_home_core::UserId;

/// Base URL of the server under test.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A fresh caller with a bearer token the server will accept.
#[derive(Debug)]
pub struct TestCaller {
    pub user_id: UserId,
    pub token: String,
}

impl TestCaller {
    /// Create a caller with a random user ID.
    ///
    /// # Panics
    ///
    /// Panics if `SWEET_HOME_JWT_SECRET` is not set.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let secret = std::env::var("SWEET_HOME_JWT_SECRET")
            .map(SecretString::from)
            .expect("SWEET_HOME_JWT_SECRET must be set for live tests");
        let user_id = UserId::generate();
        let token = TokenService::new(&secret)
            .issue(user_id, Duration::hours(1))
            .expect("Failed to issue test token");

        Self { user_id, token }
    }
}

impl Default for TestCaller {
    fn default() -> Self {
        Self::new()
    }
}
