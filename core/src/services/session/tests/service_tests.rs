//! Unit tests for the rotation engine

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::session::RefreshSession;
use crate::errors::{DomainError, SessionError};
use crate::repositories::session::mock::MockSessionStore;
use crate::repositories::SessionStore;
use crate::services::session::{hash_token, SessionService, SessionServiceConfig};

fn test_config() -> SessionServiceConfig {
    SessionServiceConfig {
        jwt_secret: "service-test-secret".to_string(),
        ..Default::default()
    }
}

fn create_service() -> SessionService<MockSessionStore> {
    SessionService::new(MockSessionStore::new(), test_config())
}

async fn session_is_revoked<S: SessionStore>(store: &S, raw_token: &str) -> bool {
    store
        .find_by_hash(&hash_token(raw_token))
        .await
        .unwrap()
        .expect("session should exist")
        .is_revoked
}

/// Store wrapper that can be told to fail specific operations, for
/// exercising the abort paths.
struct FlakyStore {
    inner: MockSessionStore,
    fail_replace: AtomicBool,
    fail_revoke_all: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MockSessionStore::new(),
            fail_replace: AtomicBool::new(false),
            fail_revoke_all: AtomicBool::new(false),
        }
    }

    fn storage_error() -> DomainError {
        DomainError::Internal {
            message: "storage unavailable".to_string(),
        }
    }
}

#[async_trait]
impl SessionStore for FlakyStore {
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError> {
        self.inner.create(session).await
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshSession>, DomainError> {
        self.inner.find_by_hash(token_hash).await
    }

    async fn revoke(&self, id: Uuid) -> Result<(), DomainError> {
        self.inner.revoke(id).await
    }

    async fn revoke_all_for_owner(&self, owner_id: Uuid) -> Result<usize, DomainError> {
        if self.fail_revoke_all.load(Ordering::SeqCst) {
            return Err(Self::storage_error());
        }
        self.inner.revoke_all_for_owner(owner_id).await
    }

    async fn replace(
        &self,
        predecessor_id: Uuid,
        successor: RefreshSession,
    ) -> Result<(), DomainError> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(Self::storage_error());
        }
        self.inner.replace(predecessor_id, successor).await
    }
}

#[tokio::test]
async fn test_issue_session_pair_persists_digest() {
    let service = create_service();
    let owner_id = Uuid::new_v4();

    let pair = service.issue_session_pair(owner_id).await.unwrap();

    assert!(!pair.access_token.is_empty());
    assert_eq!(pair.access_expires_in, 15 * 60);
    assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);

    let session = service
        .store
        .find_by_hash(&hash_token(&pair.refresh_token))
        .await
        .unwrap()
        .expect("refresh session should be persisted");
    assert_eq!(session.owner_id, owner_id);
    assert!(!session.is_revoked);
    // Only the digest is stored, never the raw token.
    assert_ne!(session.token_hash, pair.refresh_token);

    let claims = service.verify_access_token(&pair.access_token).unwrap();
    assert_eq!(claims.owner_id().unwrap(), owner_id);
}

#[tokio::test]
async fn test_rotate_active_session_succeeds_and_consumes() {
    let service = create_service();
    let owner_id = Uuid::new_v4();

    let pair = service.issue_session_pair(owner_id).await.unwrap();
    let next = service.rotate(&pair.refresh_token).await.unwrap();

    assert_ne!(
        hash_token(&pair.refresh_token),
        hash_token(&next.refresh_token)
    );
    assert!(session_is_revoked(&service.store, &pair.refresh_token).await);
    assert!(!session_is_revoked(&service.store, &next.refresh_token).await);

    let claims = service.verify_access_token(&next.access_token).unwrap();
    assert_eq!(claims.owner_id().unwrap(), owner_id);
}

#[tokio::test]
async fn test_rotate_unknown_token_has_no_side_effects() {
    let service = create_service();
    let owner_id = Uuid::new_v4();

    let pair = service.issue_session_pair(owner_id).await.unwrap();
    let result = service.rotate("completely-unknown-token").await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::InvalidSession)
    ));
    assert!(!session_is_revoked(&service.store, &pair.refresh_token).await);
    assert_eq!(service.store.len().await, 1);
}

#[tokio::test]
async fn test_rotate_with_access_token_is_invalid_session() {
    let service = create_service();
    let pair = service.issue_session_pair(Uuid::new_v4()).await.unwrap();

    // A valid signed token whose digest was never stored is still unknown.
    let result = service.rotate(&pair.access_token).await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::InvalidSession)
    ));
}

#[tokio::test]
async fn test_reuse_revokes_every_owner_session() {
    let service = create_service();
    let owner_id = Uuid::new_v4();
    let bystander = Uuid::new_v4();

    let first = service.issue_session_pair(owner_id).await.unwrap();
    let second = service.issue_session_pair(owner_id).await.unwrap();
    let other = service.issue_session_pair(bystander).await.unwrap();

    let rotated = service.rotate(&first.refresh_token).await.unwrap();

    // The consumed token comes back: theft signal.
    let result = service.rotate(&first.refresh_token).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::ReuseDetected)
    ));

    // Everything the owner held is gone, including the rotation's successor
    // and the untouched parallel session.
    assert!(session_is_revoked(&service.store, &rotated.refresh_token).await);
    assert!(session_is_revoked(&service.store, &second.refresh_token).await);
    // Other principals are unaffected.
    assert!(!session_is_revoked(&service.store, &other.refresh_token).await);
}

#[tokio::test]
async fn test_expired_session_rejected_without_revocation() {
    let service = create_service();
    let owner_id = Uuid::new_v4();

    let live = service.issue_session_pair(owner_id).await.unwrap();

    let raw = "raw-token-past-expiry";
    let mut expired = RefreshSession::new(owner_id, hash_token(raw), Duration::days(7));
    expired.expires_at = Utc::now() - Duration::hours(1);
    service.store.create(expired).await.unwrap();

    let result = service.rotate(raw).await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::ExpiredSession)
    ));
    // Natural expiry is not an attack signal: nothing else gets revoked,
    // the expired record itself stays un-revoked, no successor appears.
    assert!(!session_is_revoked(&service.store, &live.refresh_token).await);
    assert!(!session_is_revoked(&service.store, raw).await);
    assert_eq!(service.store.len().await, 2);
}

#[tokio::test]
async fn test_revoke_session_is_idempotent() {
    let service = create_service();
    let pair = service.issue_session_pair(Uuid::new_v4()).await.unwrap();

    service.revoke_session(&pair.refresh_token).await.unwrap();
    service.revoke_session(&pair.refresh_token).await.unwrap();

    assert!(session_is_revoked(&service.store, &pair.refresh_token).await);
    assert_eq!(service.store.len().await, 1);
}

#[tokio::test]
async fn test_revoke_session_unknown_token() {
    let service = create_service();

    let result = service.revoke_session("unknown-token").await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::InvalidSession)
    ));
}

#[tokio::test]
async fn test_rotate_after_logout_is_reuse() {
    let service = create_service();
    let pair = service.issue_session_pair(Uuid::new_v4()).await.unwrap();

    service.revoke_session(&pair.refresh_token).await.unwrap();
    let result = service.rotate(&pair.refresh_token).await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::ReuseDetected)
    ));
}

#[tokio::test]
async fn test_concurrent_rotations_exactly_one_winner() {
    let service = Arc::new(create_service());
    let owner_id = Uuid::new_v4();

    let pair = service.issue_session_pair(owner_id).await.unwrap();

    let a = {
        let service = Arc::clone(&service);
        let token = pair.refresh_token.clone();
        tokio::spawn(async move { service.rotate(&token).await })
    };
    let b = {
        let service = Arc::clone(&service);
        let token = pair.refresh_token.clone();
        tokio::spawn(async move { service.rotate(&token).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one rotation may win");

    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser.as_ref().unwrap_err(),
        DomainError::Session(SessionError::ReuseDetected)
    ));

    // The race is treated as theft: afterwards nothing the owner holds is
    // usable, the winner's successor included.
    let winner_pair = winners[0].as_ref().unwrap();
    assert!(session_is_revoked(&service.store, &pair.refresh_token).await);
    assert!(session_is_revoked(&service.store, &winner_pair.refresh_token).await);
}

#[tokio::test]
async fn test_swap_failure_aborts_without_partial_state() {
    let service = SessionService::new(FlakyStore::new(), test_config());
    let pair = service.issue_session_pair(Uuid::new_v4()).await.unwrap();

    service.store.fail_replace.store(true, Ordering::SeqCst);
    let result = service.rotate(&pair.refresh_token).await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::RotationFailed)
    ));
    // The presented session survives untouched and no successor landed.
    assert!(!session_is_revoked(&service.store, &pair.refresh_token).await);
    assert_eq!(service.store.inner.len().await, 1);

    // Once storage recovers the same token rotates normally.
    service.store.fail_replace.store(false, Ordering::SeqCst);
    service.rotate(&pair.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_failed_mass_revocation_is_rotation_failure() {
    let service = SessionService::new(FlakyStore::new(), test_config());
    let owner_id = Uuid::new_v4();

    let pair = service.issue_session_pair(owner_id).await.unwrap();
    let next = service.rotate(&pair.refresh_token).await.unwrap();

    service.store.fail_revoke_all.store(true, Ordering::SeqCst);
    let result = service.rotate(&pair.refresh_token).await;

    // The security action could not complete, so the reuse verdict is
    // never surfaced in its place.
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Session(SessionError::RotationFailed)
    ));
    assert!(!session_is_revoked(&service.store, &next.refresh_token).await);
}

#[tokio::test]
async fn test_end_to_end_lifecycle() {
    let service = create_service();
    let owner_id = Uuid::new_v4();

    let initial = service.issue_session_pair(owner_id).await.unwrap();
    let second = service.rotate(&initial.refresh_token).await.unwrap();
    let third = service.rotate(&second.refresh_token).await.unwrap();

    // Each consumed token is rejected on re-presentation, and the theft
    // response takes the latest pair down with it.
    let replayed = service.rotate(&second.refresh_token).await;
    assert!(matches!(
        replayed.unwrap_err(),
        DomainError::Session(SessionError::ReuseDetected)
    ));

    let after_quarantine = service.rotate(&third.refresh_token).await;
    assert!(matches!(
        after_quarantine.unwrap_err(),
        DomainError::Session(SessionError::ReuseDetected)
    ));
}
