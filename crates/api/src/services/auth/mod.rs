//! Bearer token authentication.
//!
//! Callers authenticate with an HS256 JWT whose `sub` claim is their user ID.
//! The API only verifies tokens; issuing exists for the CLI and tests.

mod error;

pub use error::AuthError;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use sweet_home_core::UserId;

/// JWT claims carried by caller tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expires at (unix seconds).
    pub exp: i64,
}

/// Issues and verifies caller tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidLifetime` if the expiry overflows, or
    /// `AuthError::InvalidToken` if encoding fails.
    pub fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires = now.checked_add_signed(ttl).ok_or(AuthError::InvalidLifetime)?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify a token and return the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for bad signatures or expired tokens,
    /// and `AuthError::InvalidSubject` if `sub` is not a user ID.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        UserId::parse(&data.claims.sub).map_err(|_| AuthError::InvalidSubject(data.claims.sub))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service("k7$Qm2!vR9@zL4#pW8^tY1&nB6*xC3%d");
        let user = UserId::generate();

        let token = tokens.issue(user, Duration::hours(1)).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service("k7$Qm2!vR9@zL4#pW8^tY1&nB6*xC3%d");
        let token = tokens
            .issue(UserId::generate(), Duration::hours(-2))
            .unwrap();

        assert!(matches!(
            tokens.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = service("k7$Qm2!vR9@zL4#pW8^tY1&nB6*xC3%d");
        let verifier = service("Zp4!Lm8@Qr2#Tx6$Wv0%Yb3^Nc7&Hd1*");
        let token = issuer.issue(UserId::generate(), Duration::hours(1)).unwrap();

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let tokens = service("k7$Qm2!vR9@zL4#pW8^tY1&nB6*xC3%d");
        let claims = Claims {
            sub: "user-42".to_owned(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding_key)
                .unwrap();

        assert!(matches!(
            tokens.verify(&token),
            Err(AuthError::InvalidSubject(_))
        ));
    }
}
