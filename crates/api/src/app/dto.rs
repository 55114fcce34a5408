use serde::Deserialize;

use teamforge_auth::{Authenticated, Organization, RevocationReceipt};
use teamforge_core::{OrganizationId, Page, TeamId};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeamsRequest {
    pub team_ids: Vec<TeamId>,
}

/// `?page=&pageSize=&organizationId=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub organization_id: Option<OrganizationId>,
}

impl ListQuery {
    /// `None` lets the service apply its configured default.
    pub fn page(&self) -> Option<Page> {
        if self.page.is_none() && self.page_size.is_none() {
            return None;
        }
        Some(Page::new(
            self.page.unwrap_or(Page::DEFAULT_PAGE),
            self.page_size.unwrap_or(Page::DEFAULT_PAGE_SIZE),
        ))
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn organization_to_json(org: &Organization) -> serde_json::Value {
    serde_json::json!({
        "id": org.id.to_string(),
        "name": org.name,
        "ownerId": org.owner_id.to_string(),
        "createdAt": org.created_at.to_rfc3339(),
    })
}

pub fn session_to_json(session: &Authenticated) -> serde_json::Value {
    serde_json::json!({
        "principal": session.principal,
        "issuedAt": session.issued_at.to_rfc3339(),
        "expiresAt": session.expires_at.to_rfc3339(),
    })
}

pub fn revocation_to_json(receipt: &RevocationReceipt) -> serde_json::Value {
    serde_json::json!({
        "loggedOut": true,
        "newlyRevoked": receipt.newly_revoked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_without_paging_defers_to_service() {
        assert_eq!(ListQuery::default().page(), None);
        let q = ListQuery {
            page_size: Some(5),
            ..ListQuery::default()
        };
        assert_eq!(q.page(), Some(Page::new(1, 5)));
    }

    #[test]
    fn list_query_reads_camel_case() {
        let org = OrganizationId::new();
        let q: ListQuery =
            serde_json::from_value(serde_json::json!({ "page": 2, "pageSize": 3, "organizationId": org }))
                .unwrap();
        assert_eq!(q.page(), Some(Page::new(2, 3)));
        assert_eq!(q.organization_id, Some(org));
    }
}
