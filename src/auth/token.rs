use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::AccessClaims;
use crate::shared::AppError;

/// Configuration for JWT access-token operations.
/// Tokens are self-contained: once issued they stay valid until expiry,
/// with no server-side state and no revocation.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub ttl_minutes: i64,
}

impl TokenConfig {
    /// Secret and TTL come from AppConfig at startup; nothing here reads
    /// the environment
    pub fn new(secret: String, ttl_minutes: i64) -> Self {
        Self {
            secret,
            ttl_minutes,
        }
    }

    /// Creates a signed access token for the given student identifier,
    /// expiring ttl_minutes from now
    #[instrument(skip(self, student_id_str))]
    pub fn create_token(&self, student_id_str: String) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.ttl_minutes)).timestamp() as usize;

        debug!(
            ttl_minutes = self.ttl_minutes,
            exp_timestamp = exp,
            "Creating access token"
        );

        let claims = AccessClaims {
            sub: student_id_str,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode access token");
            AppError::InvalidToken(e.to_string())
        })
    }

    /// Validates an access token and returns the claims if the signature
    /// matches and the token has not expired. Zero leeway: a token is
    /// rejected at exactly its expiry timestamp.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        debug!("Decoding and validating access token");

        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to validate access token");
            AppError::InvalidToken(e.to_string())
        })?;

        // The library's expiry check still passes a token at exactly
        // `exp`; the contract rejects at or after expiry
        if data.claims.exp as i64 <= Utc::now().timestamp() {
            debug!(exp = data.claims.exp, "Access token expired");
            return Err(AppError::InvalidToken("Token has expired".to_string()));
        }

        debug!(
            subject = %data.claims.sub,
            exp = data.claims.exp,
            "Access token validated"
        );
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig::new("test-secret".to_string(), 30)
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = test_config();

        let token = config.create_token("S1".to_string()).unwrap();
        assert!(!token.is_empty());

        let claims = config.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "S1");
        assert!(claims.exp > claims.iat);
        // TTL is 30 minutes
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_malformed_token() {
        let config = test_config();
        let result = config.validate_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_token_with_different_secret() {
        let config = test_config();
        let other = TokenConfig::new("other-secret".to_string(), 30);

        let token = config.create_token("S1".to_string()).unwrap();

        assert!(config.validate_token(&token).is_ok());
        assert!(matches!(
            other.validate_token(&token),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts exp in the past
        let config = TokenConfig::new("test-secret".to_string(), -1);

        let token = config.create_token("S1".to_string()).unwrap();
        let result = config.validate_token(&token);

        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_token_rejected_at_exact_expiry_instant() {
        let config = test_config();

        // Hand-roll a token whose exp is the current second, the
        // boundary of the validity window
        let now = Utc::now().timestamp() as usize;
        let claims = AccessClaims {
            sub: "S1".to_string(),
            exp: now,
            iat: now - 30 * 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_ref()),
        )
        .unwrap();

        let result = config.validate_token(&token);
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }
}
