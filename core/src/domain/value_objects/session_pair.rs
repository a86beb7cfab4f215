//! Token pair handed back to callers.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Access/refresh token pair returned by first issuance and by every
/// successful rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPair {
    /// Short-lived signed access token
    pub access_token: String,

    /// Long-lived signed refresh token, single-use under rotation
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl SessionPair {
    /// Creates a new pair with lifetimes derived from the given TTLs.
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: access_ttl.num_seconds(),
            refresh_expires_in: refresh_ttl.num_seconds(),
        }
    }
}
