use serde::{Deserialize, Serialize};

use teamforge_core::{AccountId, MemberId, OrganizationId};

use crate::{AccountType, Level, Position};

/// Account-scoped identity, produced at sign-in.
///
/// Carries no organization context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPrincipal {
    pub id: AccountId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub verified: bool,
    pub account_type: AccountType,
}

/// Organization-member identity, produced when an account switches into an
/// organization.
///
/// `id` is still the underlying account id; `member_id` identifies the
/// membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPrincipal {
    pub id: AccountId,
    pub member_id: MemberId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub verified: bool,
    pub position: Position,
    pub level: Level,
    pub organization_id: OrganizationId,
}

/// The authenticated actor attached to a request.
///
/// A token encodes exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Principal {
    Account(AccountPrincipal),
    Member(MemberPrincipal),
}

impl Principal {
    /// Underlying account id, whatever the scope.
    pub fn account_id(&self) -> AccountId {
        match self {
            Principal::Account(p) => p.id,
            Principal::Member(p) => p.id,
        }
    }

    /// Organization context, present only for member principals.
    pub fn organization_id(&self) -> Option<OrganizationId> {
        match self {
            Principal::Account(_) => None,
            Principal::Member(p) => Some(p.organization_id),
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::Account(p) => &p.username,
            Principal::Member(p) => &p.username,
        }
    }

    /// True only for account-scoped administrators.
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Account(p) if p.account_type.is_admin())
    }

    pub fn as_member(&self) -> Option<&MemberPrincipal> {
        match self {
            Principal::Member(p) => Some(p),
            Principal::Account(_) => None,
        }
    }

    pub fn scope_name(&self) -> &'static str {
        match self {
            Principal::Account(_) => "account",
            Principal::Member(_) => "member",
        }
    }
}
