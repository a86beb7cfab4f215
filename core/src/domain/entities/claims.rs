//! Claim set embedded in every signed token.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for the JWT payload.
///
/// Access and refresh tokens share this shape; they differ only in the
/// lifetime the issuer stamps into `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Unique token ID. Two tokens minted for the same owner in the same
    /// second still serialize differently, so their digests differ.
    pub jti: String,
}

impl Claims {
    /// Creates claims for a token owned by `owner_id`, valid for `ttl`.
    pub fn new(owner_id: Uuid, ttl: Duration, issuer: &str, audience: &str) -> Self {
        let now = Utc::now();
        let expiry = now + ttl;

        Self {
            sub: owner_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Gets the owner ID from the subject claim.
    pub fn owner_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
