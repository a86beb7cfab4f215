//! MySQL implementation of the SessionStore trait.
//!
//! Expects a `refresh_sessions` table shaped like:
//!
//! ```sql
//! CREATE TABLE refresh_sessions (
//!     id         CHAR(36)     PRIMARY KEY,
//!     owner_id   CHAR(36)     NOT NULL,
//!     token_hash CHAR(64)     NOT NULL,
//!     created_at TIMESTAMP(6) NOT NULL,
//!     expires_at TIMESTAMP(6) NOT NULL,
//!     is_revoked BOOLEAN      NOT NULL DEFAULT FALSE,
//!     UNIQUE KEY uq_refresh_sessions_token_hash (token_hash),
//!     KEY ix_refresh_sessions_owner_id (owner_id)
//! );
//! ```
//!
//! Rows are never deleted here; retention is a separate housekeeping job.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rotor_core::domain::entities::session::RefreshSession;
use rotor_core::errors::DomainError;
use rotor_core::repositories::SessionStore;

/// MySQL-backed session store
pub struct MySqlSessionStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionStore {
    /// Create a new MySQL session store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshSession entity
    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<RefreshSession, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| storage_error("failed to get id", e))?;
        let owner_id: String = row
            .try_get("owner_id")
            .map_err(|e| storage_error("failed to get owner_id", e))?;

        Ok(RefreshSession {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("invalid session UUID: {}", e),
            })?,
            owner_id: Uuid::parse_str(&owner_id).map_err(|e| DomainError::Internal {
                message: format!("invalid owner UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| storage_error("failed to get token_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_error("failed to get created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| storage_error("failed to get expires_at", e))?,
            is_revoked: row
                .try_get("is_revoked")
                .map_err(|e| storage_error("failed to get is_revoked", e))?,
        })
    }
}

fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

const INSERT_SESSION: &str = r#"
    INSERT INTO refresh_sessions (
        id, owner_id, token_hash, created_at, expires_at, is_revoked
    ) VALUES (?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError> {
        sqlx::query(INSERT_SESSION)
            .bind(session.id.to_string())
            .bind(session.owner_id.to_string())
            .bind(&session.token_hash)
            .bind(session.created_at)
            .bind(session.expires_at)
            .bind(session.is_revoked)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Validation {
                    message: "session already exists".to_string(),
                },
                _ => storage_error("failed to create session", e),
            })?;

        Ok(session)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshSession>, DomainError> {
        let query = r#"
            SELECT id, owner_id, token_hash, created_at, expires_at, is_revoked
            FROM refresh_sessions
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("failed to find session", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke(&self, id: Uuid) -> Result<(), DomainError> {
        // Guarded update keeps the flag monotonic; touching zero rows is
        // the idempotent no-op case.
        let query = r#"
            UPDATE refresh_sessions
            SET is_revoked = TRUE
            WHERE id = ? AND is_revoked = FALSE
        "#;

        sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("failed to revoke session", e))?;

        Ok(())
    }

    async fn revoke_all_for_owner(&self, owner_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_sessions
            SET is_revoked = TRUE
            WHERE owner_id = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(owner_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("failed to revoke owner sessions", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn replace(
        &self,
        predecessor_id: Uuid,
        successor: RefreshSession,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("failed to open transaction", e))?;

        // The guarded UPDATE is the optimistic-concurrency check: of any
        // number of concurrent swaps naming this predecessor, the row lock
        // lets exactly one flip the flag.
        let consumed = sqlx::query(
            r#"
            UPDATE refresh_sessions
            SET is_revoked = TRUE
            WHERE id = ? AND is_revoked = FALSE
        "#,
        )
        .bind(predecessor_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("failed to consume session", e))?;

        if consumed.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| storage_error("failed to roll back swap", e))?;
            return Err(DomainError::Conflict {
                message: "session already consumed".to_string(),
            });
        }

        // Insert failure drops the transaction and rolls the flip back.
        sqlx::query(INSERT_SESSION)
            .bind(successor.id.to_string())
            .bind(successor.owner_id.to_string())
            .bind(&successor.token_hash)
            .bind(successor.created_at)
            .bind(successor.expires_at)
            .bind(successor.is_revoked)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("failed to insert successor session", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("failed to commit swap", e))?;

        Ok(())
    }
}
