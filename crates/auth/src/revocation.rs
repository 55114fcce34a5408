//! Revocation Registry contract (logout blacklist).
//!
//! The registry is the only shared mutable state of the session core. The
//! raw bearer string is the token identifier. Membership is monotone: an
//! entry may only disappear through `purge_expired` once the token itself
//! can no longer pass verification.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("revocation registry unavailable: {0}")]
    Unavailable(String),
}

/// Confirmation returned by `revoke`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RevocationReceipt {
    /// False when the token was already revoked.
    pub newly_revoked: bool,
}

#[async_trait]
pub trait RevocationRegistry: Send + Sync {
    /// Idempotently add `token_id`; `expires_at` is the token's own expiry.
    ///
    /// The first recorded expiry is kept. Revoking an already revoked token
    /// changes nothing and reports `newly_revoked: false`.
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RevocationReceipt, RegistryError>;

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RegistryError>;

    /// Drop entries whose token expired strictly before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RegistryError>;
}
