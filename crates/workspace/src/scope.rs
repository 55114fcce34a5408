use teamforge_auth::{AccessError, AuthzError, Principal};
use teamforge_core::OrganizationId;

/// Organization an organization-scope call targets.
///
/// Members default to their own organization. Account principals must name
/// one explicitly; only administrators get past the resolver with it.
pub(crate) fn target_organization(
    principal: &Principal,
    requested: Option<OrganizationId>,
) -> Result<OrganizationId, AccessError> {
    match (principal, requested) {
        (_, Some(organization_id)) => Ok(organization_id),
        (Principal::Member(member), None) => Ok(member.organization_id),
        (Principal::Account(_), None) => Err(AuthzError::NoOrganizationContext.into()),
    }
}
