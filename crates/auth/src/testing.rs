//! In-crate fakes for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use teamforge_core::{AccountId, MemberId, OrganizationId};

use crate::{
    Account, AccountType, CredentialStore, Level, MemberPrincipal, Membership, NewAccount,
    Organization, OrganizationPermission, RegistryError, ResourceId, ResourceOwnership,
    ResourcePermission, RevocationReceipt, RevocationRegistry, StoreError,
};

pub fn account(username: &str) -> Account {
    Account {
        id: AccountId::new(),
        username: username.to_string(),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        verified: true,
        account_type: AccountType::User,
        created_at: Utc::now(),
    }
}

pub fn member_of(account: &Account, organization_id: OrganizationId, level: Level) -> MemberPrincipal {
    MemberPrincipal {
        id: account.id,
        member_id: MemberId::new(),
        username: account.username.clone(),
        first_name: account.first_name.clone(),
        last_name: account.last_name.clone(),
        email: account.email.clone(),
        verified: account.verified,
        position: crate::Position::creator(),
        level,
        organization_id,
    }
}

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    organizations: HashMap<OrganizationId, Organization>,
    memberships: Vec<Membership>,
    org_permissions: Vec<OrganizationPermission>,
    resources: HashMap<ResourceId, ResourceOwnership>,
    resource_permissions: HashMap<(ResourceId, AccountId), ResourcePermission>,
}

#[derive(Default)]
pub struct FakeCredentialStore {
    state: Mutex<State>,
    failing: bool,
}

impl FakeCredentialStore {
    /// Every call fails with `StoreError::Unavailable`.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn put_account(&self, account: Account) {
        self.state.lock().unwrap().accounts.insert(account.id, account);
    }

    pub fn put_organization(&self, organization: Organization) {
        self.state.lock().unwrap().organizations.insert(organization.id, organization);
    }

    pub fn remove_organization(&self, id: OrganizationId) {
        self.state.lock().unwrap().organizations.remove(&id);
    }

    pub fn put_membership(&self, membership: Membership) {
        self.state.lock().unwrap().memberships.push(membership);
    }

    pub fn put_organization_permission(&self, row: OrganizationPermission) {
        self.state.lock().unwrap().org_permissions.push(row);
    }

    pub fn put_resource(&self, ownership: ResourceOwnership) {
        self.state.lock().unwrap().resources.insert(ownership.resource, ownership);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Unavailable("fake store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    async fn find_account_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Account>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .values()
            .find(|a| a.email == email || a.username == username)
            .cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().accounts.get(&id).cloned())
    }

    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        self.check()?;
        let account = Account {
            id: AccountId::new(),
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            verified: false,
            account_type: new.account_type,
            created_at: Utc::now(),
        };
        self.put_account(account.clone());
        Ok(account)
    }

    async fn update_account_verified(&self, id: AccountId, verified: bool) -> Result<bool, StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .get_mut(&id)
            .map(|a| a.verified = verified)
            .is_some())
    }

    async fn find_organization(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().organizations.get(&id).cloned())
    }

    async fn find_organization_membership(
        &self,
        account_id: AccountId,
        organization_id: OrganizationId,
    ) -> Result<Option<Membership>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .memberships
            .iter()
            .find(|m| m.account_id == account_id && m.organization_id == organization_id)
            .cloned())
    }

    async fn find_organization_permission(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
    ) -> Result<Option<OrganizationPermission>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .org_permissions
            .iter()
            .find(|p| p.organization_id == organization_id && p.account_id == account_id)
            .copied())
    }

    async fn find_resource(&self, resource: ResourceId) -> Result<Option<ResourceOwnership>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().resources.get(&resource).copied())
    }

    async fn find_resource_permission(
        &self,
        resource: ResourceId,
        account_id: AccountId,
    ) -> Result<Option<ResourcePermission>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state.resource_permissions.get(&(resource, account_id)).copied())
    }

    async fn create_resource_permission(&self, permission: ResourcePermission) -> Result<(), StoreError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .resource_permissions
            .insert((permission.resource, permission.account_id), permission);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRevocationRegistry {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
    failing: bool,
}

impl FakeRevocationRegistry {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), RegistryError> {
        if self.failing {
            Err(RegistryError::Unavailable("fake registry offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RevocationRegistry for FakeRevocationRegistry {
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RevocationReceipt, RegistryError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let newly_revoked = !entries.contains_key(token_id);
        if newly_revoked {
            entries.insert(token_id.to_string(), expires_at);
        }
        Ok(RevocationReceipt { newly_revoked })
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RegistryError> {
        self.check()?;
        Ok(self.entries.lock().unwrap().contains_key(token_id))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RegistryError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, exp| *exp >= now);
        Ok(before - entries.len())
    }
}
