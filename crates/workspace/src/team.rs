//! Team operations, gated like projects.

use std::sync::Arc;

use chrono::Utc;

use teamforge_auth::{
    AccessError, Action, CredentialStore, PermissionFlags, PermissionResolver, Principal, ResourceId,
    ResourcePermission, Scope,
};
use teamforge_core::{OrganizationId, Page, TeamId};

use crate::scope::target_organization;
use crate::{CreateTeam, Team, UpdateTeam, WorkspaceStore};

#[derive(Clone)]
pub struct TeamService {
    resolver: PermissionResolver,
    credentials: Arc<dyn CredentialStore>,
    store: Arc<dyn WorkspaceStore>,
    default_page: Page,
}

impl TeamService {
    pub fn new(
        resolver: PermissionResolver,
        credentials: Arc<dyn CredentialStore>,
        store: Arc<dyn WorkspaceStore>,
    ) -> Self {
        Self {
            resolver,
            credentials,
            store,
            default_page: Page::default(),
        }
    }

    pub fn with_default_page(mut self, page: Page) -> Self {
        self.default_page = page;
        self
    }

    pub async fn create(&self, principal: &Principal, req: CreateTeam) -> Result<Team, AccessError> {
        let organization_id = target_organization(principal, req.organization_id)?;
        self.resolver
            .authorize(principal, Action::Create, Scope::Organization(organization_id))
            .await?;
        req.validate()?;

        self.credentials
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| AccessError::not_found("organization"))?;

        let team = Team {
            id: TeamId::new(),
            name: req.name.trim().to_string(),
            lead_id: req.lead_id,
            organization_id,
            created_by: principal.account_id(),
            created_at: Utc::now(),
        };
        self.store.insert_team(team.clone()).await?;
        self.credentials
            .create_resource_permission(ResourcePermission {
                resource: ResourceId::Team(team.id),
                account_id: team.created_by,
                flags: PermissionFlags::full(),
            })
            .await?;

        tracing::info!(team_id = %team.id, %organization_id, "team created");
        Ok(team)
    }

    pub async fn list(
        &self,
        principal: &Principal,
        organization_id: Option<OrganizationId>,
        page: Option<Page>,
    ) -> Result<Vec<Team>, AccessError> {
        let organization_id = target_organization(principal, organization_id)?;
        self.resolver
            .authorize(principal, Action::Read, Scope::Organization(organization_id))
            .await?;

        let teams = self
            .store
            .list_teams(organization_id, page.unwrap_or(self.default_page))
            .await?;
        if teams.is_empty() {
            return Err(AccessError::not_found("team"));
        }
        Ok(teams)
    }

    pub async fn get(&self, principal: &Principal, id: TeamId) -> Result<Team, AccessError> {
        self.authorize(principal, Action::Read, id).await?;
        self.load(id).await
    }

    pub async fn update(&self, principal: &Principal, id: TeamId, update: UpdateTeam) -> Result<Team, AccessError> {
        self.authorize(principal, Action::Update, id).await?;

        let mut team = self.load(id).await?;
        update.apply(&mut team)?;
        if !self.store.update_team(team.clone()).await? {
            return Err(AccessError::not_found("team"));
        }
        Ok(team)
    }

    pub async fn delete(&self, principal: &Principal, id: TeamId) -> Result<(), AccessError> {
        self.authorize(principal, Action::Delete, id).await?;

        if !self.store.delete_team(id).await? {
            return Err(AccessError::not_found("team"));
        }
        tracing::info!(team_id = %id, "team deleted");
        Ok(())
    }

    async fn authorize(&self, principal: &Principal, action: Action, id: TeamId) -> Result<(), AccessError> {
        self.resolver
            .authorize(principal, action, Scope::Resource(ResourceId::Team(id)))
            .await
            .map(|_| ())
    }

    async fn load(&self, id: TeamId) -> Result<Team, AccessError> {
        self.store
            .find_team(id)
            .await?
            .ok_or_else(|| AccessError::not_found("team"))
    }
}
