//! Session lifecycle service
//!
//! This module handles the life of a refresh session:
//! - first issuance of an access/refresh pair after primary authentication
//! - single-use rotation of refresh tokens with reuse (theft) detection
//! - explicit revocation on logout
//! - access token verification for the authentication check

mod config;
mod hasher;
mod issuer;
mod service;

#[cfg(test)]
mod tests;

pub use config::SessionServiceConfig;
pub use hasher::hash_token;
pub use issuer::TokenIssuer;
pub use service::SessionService;
