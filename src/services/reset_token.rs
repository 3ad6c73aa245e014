//! Signed, time-limited password-reset tokens.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i32, // user id
    exp: i64, // expiration timestamp
    iat: i64, // issued at
}

pub struct ResetTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    max_age_seconds: i64,
}

impl ResetTokenService {
    #[must_use]
    pub fn new(secret: &str, max_age_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            max_age_seconds,
        }
    }

    /// Issue a token for the given user, expiring `max_age_seconds` from now.
    pub fn generate(&self, user_id: i32) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + TimeDelta::seconds(self.max_age_seconds);

        let claims = Claims {
            sub: user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded user id.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        // Zero leeway so the configured lifetime is exact.
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> ResetTokenService {
        ResetTokenService::new("test-secret-key", 1800)
    }

    #[test]
    fn test_generate_token_success() {
        let service = test_service();

        let token = service.generate(42).unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_roundtrip() {
        let service = test_service();

        let token = service.generate(42).unwrap();
        let user_id = service.verify(&token).unwrap();

        assert_eq!(user_id, 42);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = test_service();

        let result = service.verify("not-a-token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let service = test_service();

        let mut token = service.generate(42).unwrap();
        token.push('x');

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let service = test_service();
        let other = ResetTokenService::new("another-secret", 1800);

        let token = service.generate(42).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let expired = ResetTokenService::new("test-secret-key", -10);

        let token = expired.generate(42).unwrap();
        let result = expired.verify(&token);

        assert!(matches!(result, Err(TokenError::Expired)));
    }
}
