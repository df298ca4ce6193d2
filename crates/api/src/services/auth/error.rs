//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was presented.
    #[error("missing bearer token")]
    MissingToken,

    /// Token signature, expiry or structure is invalid.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// Token subject is not a user ID.
    #[error("invalid token subject: {0}")]
    InvalidSubject(String),

    /// Requested token lifetime is not representable.
    #[error("invalid token lifetime")]
    InvalidLifetime,
}
