//! Permission Resolver: layered organization/resource authorization.
//!
//! Evaluation order (first match wins):
//! 1. administrative account type: always allowed, no context needed
//! 2. organization scope (creation, organization-wide listing): member
//!    context, organization permission row, and top rank for `Create`
//! 3. resource scope (read/update/delete of one project or team): creator,
//!    otherwise the resource permission row
//!
//! The two permission tables stay independent. An organization grant never
//! stands in for a missing resource row.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use teamforge_core::OrganizationId;

use crate::{
    AccessError, Action, CredentialStore, OrganizationPermission, Principal, ResourceId,
    ResourceOwnership, ResourcePermission,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no organization context")]
    NoOrganizationContext,

    #[error("no organization permission")]
    NoOrganizationPermission,

    #[error("insufficient rank")]
    InsufficientRank,

    #[error("no resource permission")]
    NoResourcePermission,
}

impl AuthzError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthzError::NoOrganizationContext => "no_organization_context",
            AuthzError::NoOrganizationPermission => "no_organization_permission",
            AuthzError::InsufficientRank => "insufficient_rank",
            AuthzError::NoResourcePermission => "no_resource_permission",
        }
    }
}

/// What an action is evaluated against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Organization(OrganizationId),
    Resource(ResourceId),
}

/// The rule that allowed an action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    Administrator,
    OrganizationPermission,
    Creator,
    ResourcePermission,
}

/// Organization-scope decision.
///
/// - No IO
/// - No panics
pub fn decide_organization(
    principal: &Principal,
    action: Action,
    organization_id: OrganizationId,
    row: Option<&OrganizationPermission>,
) -> Result<Grant, AuthzError> {
    if principal.is_admin() {
        return Ok(Grant::Administrator);
    }

    let member = match principal {
        Principal::Member(m) if m.organization_id == organization_id => m,
        _ => return Err(AuthzError::NoOrganizationContext),
    };

    let granted = row
        .filter(|r| r.organization_id == organization_id && r.account_id == member.id)
        .is_some_and(|r| r.flags.allows(action));
    if !granted {
        return Err(AuthzError::NoOrganizationPermission);
    }

    if action == Action::Create && !member.level.is_top() {
        return Err(AuthzError::InsufficientRank);
    }

    Ok(Grant::OrganizationPermission)
}

/// Resource-scope decision for an existing resource.
///
/// - No IO
/// - No panics
pub fn decide_resource(
    principal: &Principal,
    action: Action,
    ownership: &ResourceOwnership,
    row: Option<&ResourcePermission>,
) -> Result<Grant, AuthzError> {
    if principal.is_admin() {
        return Ok(Grant::Administrator);
    }

    let account_id = principal.account_id();
    if ownership.created_by == account_id {
        return Ok(Grant::Creator);
    }

    let granted = row
        .filter(|r| r.resource == ownership.resource && r.account_id == account_id)
        .is_some_and(|r| r.flags.allows(action));
    if granted {
        Ok(Grant::ResourcePermission)
    } else {
        Err(AuthzError::NoResourcePermission)
    }
}

/// Loads the permission facts for a request and applies the decision rules.
///
/// Holds no state beyond the store handle; nothing is cached across calls.
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn CredentialStore>,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn authorize(
        &self,
        principal: &Principal,
        action: Action,
        scope: Scope,
    ) -> Result<Grant, AccessError> {
        let outcome = if principal.is_admin() {
            Ok(Grant::Administrator)
        } else {
            match scope {
                Scope::Organization(organization_id) => {
                    self.authorize_organization(principal, action, organization_id).await
                }
                Scope::Resource(resource) => self.authorize_resource(principal, action, resource).await,
            }
        };

        match &outcome {
            Ok(grant) => tracing::debug!(
                account_id = %principal.account_id(),
                %action,
                scope = ?scope,
                grant = ?grant,
                "authorized"
            ),
            Err(err) => tracing::debug!(
                account_id = %principal.account_id(),
                %action,
                scope = ?scope,
                error = %err,
                "denied"
            ),
        }

        outcome
    }

    async fn authorize_organization(
        &self,
        principal: &Principal,
        action: Action,
        organization_id: OrganizationId,
    ) -> Result<Grant, AccessError> {
        // Context is checked before touching the store.
        if principal.organization_id() != Some(organization_id) {
            return Err(AuthzError::NoOrganizationContext.into());
        }

        let row = self
            .store
            .find_organization_permission(organization_id, principal.account_id())
            .await?;

        Ok(decide_organization(principal, action, organization_id, row.as_ref())?)
    }

    async fn authorize_resource(
        &self,
        principal: &Principal,
        action: Action,
        resource: ResourceId,
    ) -> Result<Grant, AccessError> {
        let ownership = self
            .store
            .find_resource(resource)
            .await?
            .ok_or_else(|| AccessError::not_found(resource.kind()))?;

        if ownership.created_by == principal.account_id() {
            return Ok(Grant::Creator);
        }

        let row = self
            .store
            .find_resource_permission(resource, principal.account_id())
            .await?;

        Ok(decide_resource(principal, action, &ownership, row.as_ref())?)
    }
}
