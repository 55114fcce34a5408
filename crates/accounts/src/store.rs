//! Directory store contract: OTP bookkeeping and organization writes.
//!
//! Lookups shared with the session core live on `CredentialStore`.

use async_trait::async_trait;

use teamforge_auth::{Membership, Organization, OrganizationPermission, StoreError};
use teamforge_core::{AccountId, OtpId, Page};

use crate::OtpCode;

/// Everything written when an organization is founded.
///
/// Stores persist the three rows together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationCharter {
    pub organization: Organization,
    pub founder: Membership,
    pub permission: OrganizationPermission,
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn insert_otp(&self, otp: OtpCode) -> Result<(), StoreError>;

    /// Most recent unconsumed code for the account matching `code`.
    async fn find_otp(&self, account_id: AccountId, code: &str) -> Result<Option<OtpCode>, StoreError>;

    /// Mark a code consumed. Returns false if it was already consumed.
    async fn consume_otp(&self, id: OtpId) -> Result<bool, StoreError>;

    /// Consume every outstanding code of the account; returns how many.
    async fn expire_otps(&self, account_id: AccountId) -> Result<usize, StoreError>;

    async fn create_organization(&self, charter: OrganizationCharter) -> Result<Organization, StoreError>;

    /// Organizations owned by `owner_id`, oldest first.
    async fn list_owned_organizations(
        &self,
        owner_id: AccountId,
        page: Page,
    ) -> Result<Vec<Organization>, StoreError>;
}
