use serde::{Deserialize, Serialize};

use teamforge_core::{ProjectId, TeamId};

/// Action being authorized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD grant flags shared by organization-level and resource-level rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionFlags {
    pub can_get: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl PermissionFlags {
    pub fn full() -> Self {
        Self {
            can_get: true,
            can_create: true,
            can_update: true,
            can_delete: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            can_get: true,
            ..Self::default()
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.can_create,
            Action::Read => self.can_get,
            Action::Update => self.can_update,
            Action::Delete => self.can_delete,
        }
    }
}

/// A concrete resource addressed by a resource-level permission row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceId {
    Project(ProjectId),
    Team(TeamId),
}

impl ResourceId {
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceId::Project(_) => "project",
            ResourceId::Team(_) => "team",
        }
    }
}

impl core::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ResourceId::Project(id) => write!(f, "project:{id}"),
            ResourceId::Team(id) => write!(f, "team:{id}"),
        }
    }
}
