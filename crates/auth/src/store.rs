//! Credential Store contract: the narrow lookups the session and
//! authorization core needs from persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use teamforge_core::{AccountId, Entity, MemberId, OrganizationId};

use crate::{AccountPrincipal, AccountType, Level, PermissionFlags, Position, ResourceId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Account-scoped identity snapshot (no organization context).
    pub fn principal(&self) -> AccountPrincipal {
        AccountPrincipal {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            verified: self.verified,
            account_type: self.account_type,
        }
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub owner_id: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Entity for Organization {
    type Id = OrganizationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// An account's membership in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MemberId,
    pub account_id: AccountId,
    pub organization_id: OrganizationId,
    pub position: Position,
    pub level: Level,
}

impl Entity for Membership {
    type Id = MemberId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Organization-scope grants for one (organization, account) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPermission {
    pub organization_id: OrganizationId,
    pub account_id: AccountId,
    pub flags: PermissionFlags,
}

/// Grants over one concrete resource for one account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermission {
    pub resource: ResourceId,
    pub account_id: AccountId,
    pub flags: PermissionFlags,
}

/// Ownership facts of a resource, enough to authorize against it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceOwnership {
    pub resource: ResourceId,
    pub organization_id: OrganizationId,
    pub created_by: AccountId,
}

/// Lookups and inserts consumed by the session and authorization core.
///
/// Every failure of the backing store surfaces as `StoreError::Unavailable`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_account_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Fails with `StoreError::Conflict` if the username or email is taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Returns false when no such account exists.
    async fn update_account_verified(&self, id: AccountId, verified: bool) -> Result<bool, StoreError>;

    async fn find_organization(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError>;

    async fn find_organization_membership(
        &self,
        account_id: AccountId,
        organization_id: OrganizationId,
    ) -> Result<Option<Membership>, StoreError>;

    async fn find_organization_permission(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
    ) -> Result<Option<OrganizationPermission>, StoreError>;

    async fn find_resource(&self, resource: ResourceId) -> Result<Option<ResourceOwnership>, StoreError>;

    async fn find_resource_permission(
        &self,
        resource: ResourceId,
        account_id: AccountId,
    ) -> Result<Option<ResourcePermission>, StoreError>;

    /// Upserts the row for (resource, account).
    async fn create_resource_permission(&self, permission: ResourcePermission) -> Result<(), StoreError>;
}
