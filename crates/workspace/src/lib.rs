//! `teamforge-workspace`: projects and teams, gated by the permission
//! resolver.

pub mod model;
pub mod project;
mod scope;
pub mod store;
pub mod team;

pub use model::{CreateProject, CreateTeam, Project, Team, UpdateProject, UpdateTeam};
pub use project::ProjectService;
pub use store::WorkspaceStore;
pub use team::TeamService;
