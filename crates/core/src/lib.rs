//! `teamforge-core`: identifiers and small domain building blocks shared by
//! every other crate.
//!
//! No IO and no async here.

pub mod entity;
pub mod error;
pub mod id;
pub mod page;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, MemberId, OrganizationId, OtpId, ProjectId, TeamId};
pub use page::Page;
