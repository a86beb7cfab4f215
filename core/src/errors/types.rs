//! Error types for token issuance and session rotation.
//!
//! The rejection kinds stay distinct inside the domain so the engine and
//! its tests can tell them apart. The external mapping in [`ErrorResponse`]
//! deliberately collapses the authentication rejections into one code and
//! one message: a caller probing the refresh endpoint must not learn
//! whether a token was unknown, expired, or already consumed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token-related errors
///
/// Failures of the signing primitive and of access-token verification.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token expired")]
    TokenExpired,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("token signature verification failed")]
    InvalidSignature,

    #[error("token signing failed")]
    SigningFailed,
}

/// Session rotation rejections
#[derive(Error, Debug)]
pub enum SessionError {
    /// No record matches the presented token's digest.
    #[error("unknown or invalid session")]
    InvalidSession,

    /// The record exists and is not revoked, but is past its expiry.
    #[error("session expired")]
    ExpiredSession,

    /// The record was already consumed. Every session of the owner has
    /// been revoked before this error surfaces.
    #[error("refresh token reuse detected")]
    ReuseDetected,

    /// Infrastructure failure while rotating; no partial state committed.
    #[error("session rotation failed")]
    RotationFailed,
}

/// Unified error payload handed to transport layers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn unauthenticated() -> Self {
        Self::new("UNAUTHENTICATED", "authentication required")
    }
}

impl From<SessionError> for ErrorResponse {
    fn from(err: SessionError) -> Self {
        match err {
            // One external shape for all three rejection kinds.
            SessionError::InvalidSession
            | SessionError::ExpiredSession
            | SessionError::ReuseDetected => ErrorResponse::unauthenticated(),
            SessionError::RotationFailed => ErrorResponse::new("INTERNAL_ERROR", err.to_string()),
        }
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenExpired
            | TokenError::InvalidTokenFormat
            | TokenError::InvalidSignature => ErrorResponse::unauthenticated(),
            TokenError::SigningFailed => ErrorResponse::new("INTERNAL_ERROR", err.to_string()),
        }
    }
}

impl From<super::DomainError> for ErrorResponse {
    fn from(err: super::DomainError) -> Self {
        use super::DomainError;

        match err {
            DomainError::Token(e) => e.into(),
            DomainError::Session(e) => e.into(),
            other => ErrorResponse::new("INTERNAL_ERROR", other.to_string()),
        }
    }
}
