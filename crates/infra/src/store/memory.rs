use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use teamforge_accounts::{DirectoryStore, OrganizationCharter, OtpCode};
use teamforge_auth::{
    Account, CredentialStore, Membership, NewAccount, Organization, OrganizationPermission,
    ResourceId, ResourceOwnership, ResourcePermission, StoreError,
};
use teamforge_core::{AccountId, Entity, MemberId, OrganizationId, OtpId, Page, ProjectId, TeamId};
use teamforge_workspace::{Project, Team, WorkspaceStore};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    // Ordered maps: v7 ids sort by creation time.
    organizations: BTreeMap<OrganizationId, Organization>,
    memberships: HashMap<MemberId, Membership>,
    organization_permissions: HashMap<(OrganizationId, AccountId), OrganizationPermission>,
    resource_permissions: HashMap<(ResourceId, AccountId), ResourcePermission>,
    otps: BTreeMap<OtpId, OtpCode>,
    projects: BTreeMap<ProjectId, Project>,
    teams: BTreeMap<TeamId, Team>,
}

impl State {
    fn drop_resource_permissions(&mut self, resource: ResourceId) {
        self.resource_permissions.retain(|(r, _), _| *r != resource);
    }
}

/// In-memory store for tests/dev, implementing every store contract over one
/// shared state so cross-contract writes stay consistent.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    /// Insert a fully-formed account, bypassing sign-up (seeding, admin
    /// provisioning).
    pub fn seed_account(&self, account: Account) -> Result<(), StoreError> {
        self.write()?.accounts.insert(*account.id(), account);
        Ok(())
    }

    /// Insert a membership without any permission row.
    pub fn seed_membership(&self, membership: Membership) -> Result<(), StoreError> {
        self.write()?.memberships.insert(*membership.id(), membership);
        Ok(())
    }

    pub fn seed_organization_permission(&self, permission: OrganizationPermission) -> Result<(), StoreError> {
        self.write()?
            .organization_permissions
            .insert((permission.organization_id, permission.account_id), permission);
        Ok(())
    }

    pub fn remove_organization(&self, id: OrganizationId) -> Result<bool, StoreError> {
        Ok(self.write()?.organizations.remove(&id).is_some())
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_account_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Account>, StoreError> {
        let state = self.read()?;
        Ok(state
            .accounts
            .values()
            .find(|a| a.email == email || a.username == username)
            .cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let state = self.read()?;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.write()?;
        // Uniqueness is re-checked under the write lock.
        if state
            .accounts
            .values()
            .any(|a| a.email == new.email || a.username == new.username)
        {
            return Err(StoreError::Conflict("username or email already registered".to_string()));
        }

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
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account_verified(&self, id: AccountId, verified: bool) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.accounts.get_mut(&id) {
            Some(account) => {
                account.verified = verified;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_organization(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError> {
        Ok(self.read()?.organizations.get(&id).cloned())
    }

    async fn find_organization_membership(
        &self,
        account_id: AccountId,
        organization_id: OrganizationId,
    ) -> Result<Option<Membership>, StoreError> {
        let state = self.read()?;
        Ok(state
            .memberships
            .values()
            .find(|m| m.account_id == account_id && m.organization_id == organization_id)
            .cloned())
    }

    async fn find_organization_permission(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
    ) -> Result<Option<OrganizationPermission>, StoreError> {
        Ok(self
            .read()?
            .organization_permissions
            .get(&(organization_id, account_id))
            .copied())
    }

    async fn find_resource(&self, resource: ResourceId) -> Result<Option<ResourceOwnership>, StoreError> {
        let state = self.read()?;
        Ok(match resource {
            ResourceId::Project(id) => state.projects.get(&id).map(Project::ownership),
            ResourceId::Team(id) => state.teams.get(&id).map(Team::ownership),
        })
    }

    async fn find_resource_permission(
        &self,
        resource: ResourceId,
        account_id: AccountId,
    ) -> Result<Option<ResourcePermission>, StoreError> {
        Ok(self
            .read()?
            .resource_permissions
            .get(&(resource, account_id))
            .copied())
    }

    async fn create_resource_permission(&self, permission: ResourcePermission) -> Result<(), StoreError> {
        self.write()?
            .resource_permissions
            .insert((permission.resource, permission.account_id), permission);
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn insert_otp(&self, otp: OtpCode) -> Result<(), StoreError> {
        self.write()?.otps.insert(otp.id, otp);
        Ok(())
    }

    async fn find_otp(&self, account_id: AccountId, code: &str) -> Result<Option<OtpCode>, StoreError> {
        let state = self.read()?;
        Ok(state
            .otps
            .values()
            .rev()
            .find(|o| o.account_id == account_id && !o.consumed && o.code == code)
            .cloned())
    }

    async fn consume_otp(&self, id: OtpId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.otps.get_mut(&id) {
            Some(otp) if !otp.consumed => {
                otp.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn expire_otps(&self, account_id: AccountId) -> Result<usize, StoreError> {
        let mut state = self.write()?;
        let mut expired = 0;
        for otp in state.otps.values_mut() {
            if otp.account_id == account_id && !otp.consumed {
                otp.consumed = true;
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn create_organization(&self, charter: OrganizationCharter) -> Result<Organization, StoreError> {
        let OrganizationCharter {
            organization,
            founder,
            permission,
        } = charter;

        let mut state = self.write()?;
        if state.organizations.contains_key(&organization.id) {
            return Err(StoreError::Conflict("organization already exists".to_string()));
        }
        state.memberships.insert(founder.id, founder);
        state
            .organization_permissions
            .insert((permission.organization_id, permission.account_id), permission);
        state.organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn list_owned_organizations(
        &self,
        owner_id: AccountId,
        page: Page,
    ) -> Result<Vec<Organization>, StoreError> {
        let state = self.read()?;
        let owned = state
            .organizations
            .values()
            .filter(|o| o.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(page.apply(owned))
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryStore {
    async fn insert_project(&self, project: Project) -> Result<(), StoreError> {
        self.write()?.projects.insert(project.id, project);
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn list_projects(&self, organization_id: OrganizationId, page: Page) -> Result<Vec<Project>, StoreError> {
        let state = self.read()?;
        let projects = state
            .projects
            .values()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(page.apply(projects))
    }

    async fn update_project(&self, project: Project) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.projects.get_mut(&project.id) {
            Some(slot) => {
                *slot = project;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        state.drop_resource_permissions(ResourceId::Project(id));
        Ok(true)
    }

    async fn insert_team(&self, team: Team) -> Result<(), StoreError> {
        self.write()?.teams.insert(team.id, team);
        Ok(())
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self.read()?.teams.get(&id).cloned())
    }

    async fn find_teams(&self, ids: &[TeamId]) -> Result<Vec<Team>, StoreError> {
        let state = self.read()?;
        Ok(ids.iter().filter_map(|id| state.teams.get(id).cloned()).collect())
    }

    async fn list_teams(&self, organization_id: OrganizationId, page: Page) -> Result<Vec<Team>, StoreError> {
        let state = self.read()?;
        let teams = state
            .teams
            .values()
            .filter(|t| t.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(page.apply(teams))
    }

    async fn update_team(&self, team: Team) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.teams.get_mut(&team.id) {
            Some(slot) => {
                *slot = team;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_team(&self, id: TeamId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if state.teams.remove(&id).is_none() {
            return Ok(false);
        }
        state.drop_resource_permissions(ResourceId::Team(id));
        for project in state.projects.values_mut() {
            project.team_ids.retain(|t| *t != id);
        }
        Ok(true)
    }
}
