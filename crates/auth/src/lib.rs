//! `teamforge-auth`: session and authorization core.
//!
//! Token issuance, organization-context switching, revocation and the
//! layered permission model. Decoupled from HTTP; persistence is reached
//! only through the `CredentialStore` and `RevocationRegistry` contracts.

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod error;
pub mod guard;
pub mod hasher;
pub mod issuer;
pub mod permissions;
pub mod principal;
pub mod revocation;
pub mod roles;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use authorize::{AuthzError, Grant, PermissionResolver, Scope, decide_organization, decide_resource};
pub use claims::{Claims, ClaimsValidationError, TokenClaims, validate_claims};
pub use codec::{
    DEFAULT_TOKEN_LIFETIME_SECS, Hs256TokenCodec, SignedToken, TokenCodec, TokenError, VerifiedToken,
};
pub use error::{AccessError, CredentialError};
pub use guard::{Authenticated, AuthorizationGuard, bearer_token};
pub use hasher::{Argon2Hasher, HashError, SecretHasher};
pub use issuer::{IssuedToken, SessionIssuer};
pub use permissions::{Action, PermissionFlags, ResourceId};
pub use principal::{AccountPrincipal, MemberPrincipal, Principal};
pub use revocation::{RegistryError, RevocationReceipt, RevocationRegistry};
pub use roles::{AccountType, Level, Position};
pub use store::{
    Account, CredentialStore, Membership, NewAccount, Organization, OrganizationPermission,
    ResourceOwnership, ResourcePermission, StoreError,
};
