//! Refresh session records and their lifecycle states.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted record per issued refresh token.
///
/// The raw token never touches storage; `token_hash` is the lookup key.
/// `is_revoked` is monotonic: once true it never resets, and the rotation
/// path never deletes records (retention is a separate housekeeping job).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    /// Unique identifier for the session
    pub id: Uuid,

    /// Principal this session belongs to
    pub owner_id: Uuid,

    /// One-way digest of the raw refresh token
    pub token_hash: String,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the session is no longer honorable
    pub expires_at: DateTime<Utc>,

    /// Whether the session has been consumed or revoked
    pub is_revoked: bool,
}

/// Lifecycle state of a stored session as the rotation engine sees it.
///
/// The fourth state, "unknown", is the absence of a record. Only `Active`
/// permits a transition; the others are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Revoked,
    Expired,
}

impl RefreshSession {
    /// Creates a new session for `owner_id` valid for `ttl`.
    pub fn new(owner_id: Uuid, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            owner_id,
            token_hash,
            created_at: now,
            expires_at: now + ttl,
            is_revoked: false,
        }
    }

    /// Checks if the session is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Current lifecycle state.
    ///
    /// Revocation wins over expiry: a consumed record stays a reuse signal
    /// even after it would have lapsed naturally.
    pub fn state(&self) -> SessionState {
        if self.is_revoked {
            SessionState::Revoked
        } else if self.is_expired() {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    /// Marks the session revoked.
    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }
}
