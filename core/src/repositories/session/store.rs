//! Session store trait defining the interface for refresh session persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::session::RefreshSession;
use crate::errors::DomainError;

/// Persistence contract for [`RefreshSession`] records.
///
/// Implementations must not cache session state in-process: every call goes
/// to the backing store, otherwise a stale revocation flag opens a window
/// for replayed tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session record.
    ///
    /// A duplicate `token_hash` fails with a validation error. The raw
    /// token carries enough entropy that digest collisions are a defect,
    /// not a case to model.
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError>;

    /// Look up a session by its token digest.
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshSession>, DomainError>;

    /// Mark a single session revoked.
    ///
    /// Idempotent: revoking an already-revoked or absent record is a no-op
    /// success. The flag is monotonic and never cleared.
    async fn revoke(&self, id: Uuid) -> Result<(), DomainError>;

    /// Mark every session belonging to `owner_id` revoked.
    ///
    /// Only the theft-response path calls this. Returns the number of
    /// records that changed state.
    async fn revoke_all_for_owner(&self, owner_id: Uuid) -> Result<usize, DomainError>;

    /// Atomically consume the predecessor and insert its successor.
    ///
    /// The revocation flip is a compare-and-swap: if the predecessor is
    /// already revoked, or no longer present, the call fails with
    /// [`DomainError::Conflict`] and the successor is not inserted. Of any
    /// number of concurrent `replace` calls naming the same predecessor,
    /// exactly one can succeed. On any failure neither half is committed.
    async fn replace(
        &self,
        predecessor_id: Uuid,
        successor: RefreshSession,
    ) -> Result<(), DomainError>;
}
