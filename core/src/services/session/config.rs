//! Configuration for the session service

use chrono::Duration;
use jsonwebtoken::Algorithm;

/// Configuration for the session service and its token issuer.
///
/// The signing secret is an explicitly constructed value, never a
/// package-level constant, so each environment and each test carries its
/// own key.
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// `iss` claim stamped into and required from every token
    pub issuer: String,
    /// `aud` claim stamped into and required from every token
    pub audience: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            issuer: "rotor".to_string(),
            audience: "rotor-api".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }
}

impl SessionServiceConfig {
    /// Access token lifetime as a duration.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_minutes)
    }

    /// Refresh token lifetime as a duration.
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}
