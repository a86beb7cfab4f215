//! Rotation engine implementation

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::entities::claims::Claims;
use crate::domain::entities::session::{RefreshSession, SessionState};
use crate::domain::value_objects::session_pair::SessionPair;
use crate::errors::{DomainError, SessionError};
use crate::repositories::SessionStore;

use super::config::SessionServiceConfig;
use super::hasher::hash_token;
use super::issuer::TokenIssuer;

/// Rotation engine for refresh sessions.
///
/// A refresh token is single-use: [`rotate`](SessionService::rotate)
/// exchanges a valid token for a fresh access/refresh pair and consumes the
/// presented one. Presenting a consumed token again is treated as theft and
/// revokes every session the owner holds.
pub struct SessionService<S: SessionStore> {
    pub(crate) store: S,
    issuer: TokenIssuer,
    config: SessionServiceConfig,
}

impl<S: SessionStore> SessionService<S> {
    /// Creates a new session service instance.
    pub fn new(store: S, config: SessionServiceConfig) -> Self {
        let issuer = TokenIssuer::new(&config);

        Self {
            store,
            issuer,
            config,
        }
    }

    /// First-time issuance after successful primary authentication.
    ///
    /// Mints an access/refresh pair and persists the refresh token's digest
    /// with a fresh expiry.
    pub async fn issue_session_pair(&self, owner_id: Uuid) -> Result<SessionPair, DomainError> {
        let pair = self.mint_pair(owner_id)?;

        let session = RefreshSession::new(
            owner_id,
            hash_token(&pair.refresh_token),
            self.config.refresh_token_ttl(),
        );
        self.store.create(session).await?;

        debug!(%owner_id, "issued new session pair");
        Ok(pair)
    }

    /// Exchanges a valid refresh token for a successor pair, consuming it.
    ///
    /// Of any number of concurrent calls presenting the same token, exactly
    /// one can succeed; the rest take the reuse path. Failures leave no
    /// partial state: the presented session is either fully rotated or
    /// untouched.
    pub async fn rotate(&self, presented: &str) -> Result<SessionPair, DomainError> {
        let token_hash = hash_token(presented);

        let session = self
            .store
            .find_by_hash(&token_hash)
            .await
            .map_err(|err| rotation_failure("session lookup failed", err))?
            .ok_or(DomainError::Session(SessionError::InvalidSession))?;

        match session.state() {
            SessionState::Revoked => {
                // A consumed token came back: either theft or a client bug.
                // Fail closed and force the owner to re-authenticate.
                self.quarantine_owner(session.owner_id).await?;
                Err(SessionError::ReuseDetected.into())
            }
            SessionState::Expired => Err(SessionError::ExpiredSession.into()),
            SessionState::Active => {
                // Mint before any write: a signing failure must leave the
                // presented session untouched.
                let pair = self
                    .mint_pair(session.owner_id)
                    .map_err(|err| rotation_failure("token minting failed", err))?;
                let successor = RefreshSession::new(
                    session.owner_id,
                    hash_token(&pair.refresh_token),
                    self.config.refresh_token_ttl(),
                );

                match self.store.replace(session.id, successor).await {
                    Ok(()) => {
                        debug!(owner_id = %session.owner_id, "rotated refresh session");
                        Ok(pair)
                    }
                    Err(DomainError::Conflict { .. }) => {
                        // Lost the race: a competing rotation consumed this
                        // record between our lookup and the swap. From here
                        // it is indistinguishable from reuse.
                        self.quarantine_owner(session.owner_id).await?;
                        Err(SessionError::ReuseDetected.into())
                    }
                    Err(err) => Err(rotation_failure("session swap failed", err)),
                }
            }
        }
    }

    /// Explicit logout: revokes the presented token without a successor.
    ///
    /// Idempotent on repeat presentation of the same token.
    pub async fn revoke_session(&self, presented: &str) -> Result<(), DomainError> {
        let token_hash = hash_token(presented);

        let session = self
            .store
            .find_by_hash(&token_hash)
            .await
            .map_err(|err| rotation_failure("session lookup failed", err))?
            .ok_or(DomainError::Session(SessionError::InvalidSession))?;

        self.store
            .revoke(session.id)
            .await
            .map_err(|err| rotation_failure("session revocation failed", err))?;

        debug!(owner_id = %session.owner_id, "session revoked");
        Ok(())
    }

    /// Verifies an access token and returns its claims.
    ///
    /// This is the authentication check; rotation never consults it.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.issuer.verify(token)
    }

    fn mint_pair(&self, owner_id: Uuid) -> Result<SessionPair, DomainError> {
        let access_ttl = self.config.access_token_ttl();
        let refresh_ttl = self.config.refresh_token_ttl();

        let access_token = self.issuer.issue(owner_id, access_ttl)?;
        let refresh_token = self.issuer.issue(owner_id, refresh_ttl)?;

        Ok(SessionPair::new(
            access_token,
            refresh_token,
            access_ttl,
            refresh_ttl,
        ))
    }

    /// Theft response: revoke every session the owner holds.
    ///
    /// If the bulk revocation itself fails the whole operation aborts with
    /// a rotation failure; the security action is never silently skipped.
    async fn quarantine_owner(&self, owner_id: Uuid) -> Result<(), DomainError> {
        warn!(%owner_id, "refresh token reuse detected, revoking all sessions for owner");

        let revoked = self
            .store
            .revoke_all_for_owner(owner_id)
            .await
            .map_err(|err| rotation_failure("mass revocation failed", err))?;

        warn!(%owner_id, revoked, "owner sessions revoked");
        Ok(())
    }
}

fn rotation_failure(context: &str, err: DomainError) -> DomainError {
    error!(error = %err, "{}", context);
    DomainError::Session(SessionError::RotationFailed)
}
