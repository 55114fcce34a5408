//! Project and team records plus their command payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use teamforge_auth::{ResourceId, ResourceOwnership};
use teamforge_core::error::require_non_blank;
use teamforge_core::{AccountId, DomainError, DomainResult, Entity, OrganizationId, ProjectId, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub organization_id: OrganizationId,
    pub created_by: AccountId,
    pub team_ids: Vec<TeamId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn ownership(&self) -> ResourceOwnership {
        ResourceOwnership {
            resource: ResourceId::Project(self.id),
            organization_id: self.organization_id,
            created_by: self.created_by,
        }
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub lead_id: Option<AccountId>,
    pub organization_id: OrganizationId,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn ownership(&self) -> ResourceOwnership {
        ResourceOwnership {
            resource: ResourceId::Team(self.id),
            organization_id: self.organization_id,
            created_by: self.created_by,
        }
    }
}

impl Entity for Team {
    type Id = TeamId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn check_dates(start: NaiveDate, end: Option<NaiveDate>) -> DomainResult<()> {
    match end {
        Some(end) if end < start => Err(DomainError::validation("endDate cannot precede startDate")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Target organization for account-scoped administrators.
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
}

impl CreateProject {
    pub fn validate(&self) -> DomainResult<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("description", &self.description)?;
        check_dates(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl UpdateProject {
    /// Apply onto `project`, validating the merged result.
    pub fn apply(self, project: &mut Project) -> DomainResult<()> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        if let Some(description) = &self.description {
            require_non_blank("description", description)?;
        }
        let start = self.start_date.unwrap_or(project.start_date);
        let end = self.end_date.or(project.end_date);
        check_dates(start, end)?;

        if let Some(name) = self.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            project.description = description.trim().to_string();
        }
        project.start_date = start;
        project.end_date = end;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeam {
    pub name: String,
    #[serde(default)]
    pub lead_id: Option<AccountId>,
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
}

impl CreateTeam {
    pub fn validate(&self) -> DomainResult<()> {
        require_non_blank("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub lead_id: Option<AccountId>,
}

impl UpdateTeam {
    pub fn apply(self, team: &mut Team) -> DomainResult<()> {
        if let Some(name) = self.name {
            require_non_blank("name", &name)?;
            team.name = name.trim().to_string();
        }
        if let Some(lead_id) = self.lead_id {
            team.lead_id = Some(lead_id);
        }
        Ok(())
    }
}
