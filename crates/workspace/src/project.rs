//! Project operations. Every call is authorized before the store is touched.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use teamforge_auth::{
    AccessError, Action, CredentialStore, PermissionFlags, PermissionResolver, Principal, ResourceId,
    ResourcePermission, Scope,
};
use teamforge_core::{OrganizationId, Page, ProjectId, TeamId};

use crate::scope::target_organization;
use crate::{CreateProject, Project, UpdateProject, WorkspaceStore};

#[derive(Clone)]
pub struct ProjectService {
    resolver: PermissionResolver,
    credentials: Arc<dyn CredentialStore>,
    store: Arc<dyn WorkspaceStore>,
    default_page: Page,
}

impl ProjectService {
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

    /// Create a project in the caller's organization and grant the creator a
    /// full resource permission row on it.
    pub async fn create(&self, principal: &Principal, req: CreateProject) -> Result<Project, AccessError> {
        let organization_id = target_organization(principal, req.organization_id)?;
        self.resolver
            .authorize(principal, Action::Create, Scope::Organization(organization_id))
            .await?;
        req.validate()?;

        self.credentials
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| AccessError::not_found("organization"))?;

        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(),
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            start_date: req.start_date,
            end_date: req.end_date,
            organization_id,
            created_by: principal.account_id(),
            team_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_project(project.clone()).await?;
        self.credentials
            .create_resource_permission(ResourcePermission {
                resource: ResourceId::Project(project.id),
                account_id: project.created_by,
                flags: PermissionFlags::full(),
            })
            .await?;

        tracing::info!(project_id = %project.id, %organization_id, "project created");
        Ok(project)
    }

    /// Projects of an organization. An empty page is `NotFound`.
    pub async fn list(
        &self,
        principal: &Principal,
        organization_id: Option<OrganizationId>,
        page: Option<Page>,
    ) -> Result<Vec<Project>, AccessError> {
        let organization_id = target_organization(principal, organization_id)?;
        self.resolver
            .authorize(principal, Action::Read, Scope::Organization(organization_id))
            .await?;

        let projects = self
            .store
            .list_projects(organization_id, page.unwrap_or(self.default_page))
            .await?;
        if projects.is_empty() {
            return Err(AccessError::not_found("project"));
        }
        Ok(projects)
    }

    pub async fn get(&self, principal: &Principal, id: ProjectId) -> Result<Project, AccessError> {
        self.authorize(principal, Action::Read, id).await?;
        self.load(id).await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: ProjectId,
        update: UpdateProject,
    ) -> Result<Project, AccessError> {
        self.authorize(principal, Action::Update, id).await?;

        let mut project = self.load(id).await?;
        update.apply(&mut project)?;
        project.updated_at = Utc::now();
        self.save(project).await
    }

    pub async fn delete(&self, principal: &Principal, id: ProjectId) -> Result<(), AccessError> {
        self.authorize(principal, Action::Delete, id).await?;

        if !self.store.delete_project(id).await? {
            return Err(AccessError::not_found("project"));
        }
        tracing::info!(project_id = %id, "project deleted");
        Ok(())
    }

    /// Attach teams to a project. Every team must belong to the project's
    /// organization; otherwise nothing changes.
    pub async fn assign_teams(
        &self,
        principal: &Principal,
        id: ProjectId,
        team_ids: Vec<TeamId>,
    ) -> Result<Project, AccessError> {
        self.authorize(principal, Action::Update, id).await?;

        let mut project = self.load(id).await?;
        let mut seen = HashSet::new();
        let wanted: Vec<TeamId> = team_ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if wanted.is_empty() {
            return Err(AccessError::Validation("teamIds cannot be empty".to_string()));
        }

        let found = self.store.find_teams(&wanted).await?;
        let valid = found.len() == wanted.len()
            && found.iter().all(|t| t.organization_id == project.organization_id);
        if !valid {
            return Err(AccessError::Validation("invalid teamId(s) provided".to_string()));
        }

        for team_id in wanted {
            if !project.team_ids.contains(&team_id) {
                project.team_ids.push(team_id);
            }
        }
        project.updated_at = Utc::now();
        let project = self.save(project).await?;
        tracing::info!(project_id = %project.id, teams = project.team_ids.len(), "teams assigned");
        Ok(project)
    }

    async fn authorize(&self, principal: &Principal, action: Action, id: ProjectId) -> Result<(), AccessError> {
        self.resolver
            .authorize(principal, action, Scope::Resource(ResourceId::Project(id)))
            .await
            .map(|_| ())
    }

    async fn load(&self, id: ProjectId) -> Result<Project, AccessError> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| AccessError::not_found("project"))
    }

    async fn save(&self, project: Project) -> Result<Project, AccessError> {
        if !self.store.update_project(project.clone()).await? {
            return Err(AccessError::not_found("project"));
        }
        Ok(project)
    }
}
