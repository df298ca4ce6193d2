//! Developer bearer tokens.
//!
//! # Usage
//!
//! ```bash
//! sh-cli token --user 0b0e5a3c-6f0e-4b8e-9a43-2f1d8c6f7d21 --ttl-hours 8
//! ```
//!
//! Signs with `SWEET_HOME_JWT_SECRET`, the same secret the API verifies with.

use chrono::Duration;
use secrecy::SecretString;
use sweet_home_api::services::auth::{AuthError, TokenService};
use sweet_home_core::UserId;
use thiserror::Error;

/// Errors that can occur while issuing a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid user ID '{0}': expected a UUID")]
    InvalidUser(String),

    #[error("TTL must be a positive number of hours within range")]
    InvalidTtl,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Issue a token for `user` and print it to stdout.
///
/// # Errors
///
/// Returns `TokenError` if the TTL is out of range, the secret is missing,
/// the user ID is not a UUID, or signing fails.
pub fn issue(user: &str, ttl_hours: i64) -> Result<(), TokenError> {
    dotenvy::dotenv().ok();

    if ttl_hours < 1 {
        return Err(TokenError::InvalidTtl);
    }
    let ttl = Duration::try_hours(ttl_hours).ok_or(TokenError::InvalidTtl)?;
    let user_id = UserId::parse(user).map_err(|_| TokenError::InvalidUser(user.to_owned()))?;
    let secret = std::env::var("SWEET_HOME_JWT_SECRET")
        .map(SecretString::from)
        .map_err(|_| TokenError::MissingEnvVar("SWEET_HOME_JWT_SECRET"))?;

    let token = TokenService::new(&secret).issue(user_id, ttl)?;
    tracing::info!(%user_id, ttl_hours, "Issued developer token");

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const USER: &str = "0b0e5a3c-6f0e-4b8e-9a43-2f1d8c6f7d21";

    #[test]
    fn test_ttl_too_large_for_duration_is_rejected() {
        let result = issue(USER, 9_999_999_999_999_999);
        assert!(matches!(result, Err(TokenError::InvalidTtl)));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        assert!(matches!(issue(USER, 0), Err(TokenError::InvalidTtl)));
    }

    #[test]
    fn test_non_uuid_user_is_rejected() {
        let result = issue("not-a-uuid", 8);
        assert!(matches!(result, Err(TokenError::InvalidUser(user)) if user == "not-a-uuid"));
    }
}
