use teamforge_auth::{Authenticated, Principal};
use teamforge_core::OrganizationId;

/// Session context for a request (verified bearer token + principal).
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session: Authenticated,
}

impl SessionContext {
    pub fn new(session: Authenticated) -> Self {
        Self { session }
    }

    pub fn principal(&self) -> &Principal {
        &self.session.principal
    }

    /// Organization the token is scoped to; `None` for account tokens.
    pub fn organization_id(&self) -> Option<OrganizationId> {
        self.session.principal.organization_id()
    }

    pub fn session(&self) -> &Authenticated {
        &self.session
    }
}
