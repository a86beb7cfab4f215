//! Signed-token issuance and verification.

use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::claims::Claims;
use crate::errors::{DomainError, TokenError};

use super::config::SessionServiceConfig;

/// Mints and verifies the signed tokens backing a session.
///
/// Access and refresh tokens come out of the same signing primitive and
/// differ only in lifetime. Tracking refresh tokens server-side by digest
/// is the rotation engine's concern, not this type's.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    issuer: String,
    audience: String,
}

impl TokenIssuer {
    /// Creates an issuer keyed by the configured secret.
    pub fn new(config: &SessionServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key,
            decoding_key,
            header: Header::new(config.algorithm),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Signs a token for `owner_id`, valid for `ttl`.
    ///
    /// Failures propagate as [`TokenError::SigningFailed`]; the primitive
    /// is never retried.
    pub fn issue(&self, owner_id: Uuid, ttl: Duration) -> Result<String, DomainError> {
        let claims = Claims::new(owner_id, ttl, &self.issuer, &self.audience);

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::SigningFailed))
    }

    /// Verifies a signed token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        DomainError::Token(TokenError::TokenExpired)
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        DomainError::Token(TokenError::InvalidSignature)
                    }
                    _ => DomainError::Token(TokenError::InvalidTokenFormat),
                }
            })?;

        Ok(token_data.claims)
    }
}
