//! Persistence contract for projects and teams.

use async_trait::async_trait;

use teamforge_auth::StoreError;
use teamforge_core::{OrganizationId, Page, ProjectId, TeamId};

use crate::{Project, Team};

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn insert_project(&self, project: Project) -> Result<(), StoreError>;

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Projects of one organization, oldest first.
    async fn list_projects(&self, organization_id: OrganizationId, page: Page) -> Result<Vec<Project>, StoreError>;

    /// Replace a stored project. Returns false when it no longer exists.
    async fn update_project(&self, project: Project) -> Result<bool, StoreError>;

    /// Delete a project together with its resource permission rows.
    async fn delete_project(&self, id: ProjectId) -> Result<bool, StoreError>;

    async fn insert_team(&self, team: Team) -> Result<(), StoreError>;

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;

    /// Teams among `ids` that exist. Order is unspecified.
    async fn find_teams(&self, ids: &[TeamId]) -> Result<Vec<Team>, StoreError>;

    async fn list_teams(&self, organization_id: OrganizationId, page: Page) -> Result<Vec<Team>, StoreError>;

    async fn update_team(&self, team: Team) -> Result<bool, StoreError>;

    /// Delete a team, its permission rows and its project assignments.
    async fn delete_team(&self, id: TeamId) -> Result<bool, StoreError>;
}
