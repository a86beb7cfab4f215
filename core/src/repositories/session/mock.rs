//! Mock implementation of SessionStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::RefreshSession;
use crate::errors::DomainError;

use super::store::SessionStore;

/// Mock session store backed by a hash-keyed map.
///
/// A single write lock spans every mutating operation, so `replace` gets
/// the same all-or-nothing semantics a database transaction provides.
pub struct MockSessionStore {
    sessions: Arc<RwLock<HashMap<String, RefreshSession>>>,
}

impl MockSessionStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records currently held, revoked ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for MockSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.token_hash) {
            return Err(DomainError::Validation {
                message: "session already exists".to_string(),
            });
        }

        sessions.insert(session.token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token_hash).cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.values_mut().find(|s| s.id == id) {
            session.revoke();
        }

        Ok(())
    }

    async fn revoke_all_for_owner(&self, owner_id: Uuid) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let mut count = 0;

        for session in sessions.values_mut() {
            if session.owner_id == owner_id && !session.is_revoked {
                session.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn replace(
        &self,
        predecessor_id: Uuid,
        successor: RefreshSession,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&successor.token_hash) {
            return Err(DomainError::Validation {
                message: "successor session already exists".to_string(),
            });
        }

        let predecessor = sessions
            .values_mut()
            .find(|s| s.id == predecessor_id)
            .filter(|s| !s.is_revoked)
            .ok_or_else(|| DomainError::Conflict {
                message: "session already consumed".to_string(),
            })?;

        predecessor.revoke();
        sessions.insert(successor.token_hash.clone(), successor);
        Ok(())
    }
}
