//! # Rotor Infrastructure
//!
//! Concrete implementations of the core persistence contracts: a
//! MySQL-backed session store using SQLx, connection-pool management, and
//! environment-driven database configuration.

pub mod database;

pub use database::{DatabaseConfig, DatabasePool, MySqlSessionStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
