//! Account lifecycle: sign-up, verification, sign-in, organizations and
//! logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teamforge_auth::{
    AccessError, AccountType, Authenticated, AuthzError, CredentialError, CredentialStore,
    IssuedToken, Level, Membership, NewAccount, Organization, OrganizationPermission,
    PermissionFlags, Position, Principal, RevocationReceipt, RevocationRegistry, SecretHasher,
    SessionIssuer,
};
use teamforge_core::error::require_non_blank;
use teamforge_core::{AccountId, MemberId, OrganizationId, Page};

use crate::{DirectoryStore, OrganizationCharter, OtpCode};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUp {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Result of sign-up or OTP resend.
///
/// The code is handed back to the caller; delivery is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpIssued {
    pub account_id: AccountId,
    pub email: String,
    pub otp: String,
    pub otp_expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AccountService {
    credentials: Arc<dyn CredentialStore>,
    directory: Arc<dyn DirectoryStore>,
    hasher: Arc<dyn SecretHasher>,
    issuer: SessionIssuer,
    registry: Arc<dyn RevocationRegistry>,
    default_page: Page,
}

impl AccountService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        directory: Arc<dyn DirectoryStore>,
        hasher: Arc<dyn SecretHasher>,
        issuer: SessionIssuer,
        registry: Arc<dyn RevocationRegistry>,
    ) -> Self {
        Self {
            credentials,
            directory,
            hasher,
            issuer,
            registry,
            default_page: Page::default(),
        }
    }

    pub fn with_default_page(mut self, page: Page) -> Self {
        self.default_page = page;
        self
    }

    pub async fn sign_up(&self, req: SignUp) -> Result<OtpIssued, AccessError> {
        require_non_blank("username", &req.username)?;
        require_non_blank("firstName", &req.first_name)?;
        require_non_blank("lastName", &req.last_name)?;
        require_non_blank("email", &req.email)?;
        require_non_blank("password", &req.password)?;

        if self
            .credentials
            .find_account_by_email_or_username(&req.email, &req.username)
            .await?
            .is_some()
        {
            return Err(AccessError::conflict("username or email already registered"));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let account = self
            .credentials
            .create_account(NewAccount {
                username: req.username,
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                account_type: AccountType::User,
            })
            .await?;

        let issued = self.issue_otp(account.id, &account.email).await?;
        tracing::info!(account_id = %account.id, "account registered");
        Ok(issued)
    }

    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(), AccessError> {
        let account = self
            .credentials
            .find_account_by_email(email)
            .await?
            .ok_or(CredentialError::InvalidOtp)?;

        let otp = self
            .directory
            .find_otp(account.id, code.trim())
            .await?
            .filter(|otp| otp.is_usable(Utc::now()))
            .ok_or(CredentialError::InvalidOtp)?;

        // Lost race with a concurrent verify or resend.
        if !self.directory.consume_otp(otp.id).await? {
            return Err(CredentialError::InvalidOtp.into());
        }

        if !self.credentials.update_account_verified(account.id, true).await? {
            return Err(AccessError::not_found("account"));
        }

        tracing::info!(account_id = %account.id, "account verified");
        Ok(())
    }

    pub async fn resend_otp(&self, email: &str) -> Result<OtpIssued, AccessError> {
        let account = self
            .credentials
            .find_account_by_email(email)
            .await?
            .ok_or_else(|| AccessError::not_found("account"))?;

        let expired = self.directory.expire_otps(account.id).await?;
        tracing::debug!(account_id = %account.id, expired, "outstanding codes expired");

        self.issue_otp(account.id, &account.email).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IssuedToken, AccessError> {
        let account = self
            .credentials
            .find_account_by_email(email)
            .await?
            .ok_or(CredentialError::BadLogin)?;

        if !self.hasher.verify(password, &account.password_hash) {
            tracing::warn!(account_id = %account.id, "sign-in rejected");
            return Err(CredentialError::BadLogin.into());
        }

        if !account.verified {
            return Err(AccessError::conflict("account is not verified"));
        }

        let issued = self.issuer.issue_account_token(&account, Utc::now())?;
        tracing::info!(account_id = %account.id, "signed in");
        Ok(issued)
    }

    /// Found an organization owned by the caller.
    ///
    /// The caller becomes its `CREATOR` at top rank with a full permission row.
    pub async fn create_organization(
        &self,
        principal: &Principal,
        name: &str,
    ) -> Result<Organization, AccessError> {
        require_non_blank("name", name)?;

        let owner_id = principal.account_id();
        let organization = Organization {
            id: OrganizationId::new(),
            name: name.trim().to_string(),
            owner_id,
            created_at: Utc::now(),
        };
        let charter = OrganizationCharter {
            founder: Membership {
                id: MemberId::new(),
                account_id: owner_id,
                organization_id: organization.id,
                position: Position::creator(),
                level: Level::TOP,
            },
            permission: OrganizationPermission {
                organization_id: organization.id,
                account_id: owner_id,
                flags: PermissionFlags::full(),
            },
            organization,
        };

        let organization = self.directory.create_organization(charter).await?;
        tracing::info!(organization_id = %organization.id, %owner_id, "organization created");
        Ok(organization)
    }

    /// Organizations owned by the caller. An empty page is `NotFound`.
    pub async fn list_organizations(
        &self,
        principal: &Principal,
        page: Option<Page>,
    ) -> Result<Vec<Organization>, AccessError> {
        let page = page.unwrap_or(self.default_page);
        let organizations = self
            .directory
            .list_owned_organizations(principal.account_id(), page)
            .await?;

        if organizations.is_empty() {
            return Err(AccessError::not_found("organization"));
        }
        Ok(organizations)
    }

    pub async fn switch_organization(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<IssuedToken, AccessError> {
        let account = self
            .credentials
            .find_account_by_id(principal.account_id())
            .await?
            .ok_or_else(|| AccessError::not_found("account"))?;

        self.issuer
            .issue_member_token(&account, organization_id, Utc::now())
            .await
    }

    /// Leave the organization context: a fresh account token is issued
    /// first, then the presented member token is revoked.
    ///
    /// If revocation fails the new token is discarded and the error returned,
    /// leaving the old token valid.
    pub async fn logout_organization(&self, session: &Authenticated) -> Result<IssuedToken, AccessError> {
        let member = session
            .principal
            .as_member()
            .ok_or(AuthzError::NoOrganizationContext)?;

        let issued = self.issuer.reissue_account_token(member, Utc::now()).await?;
        self.registry.revoke(&session.token, session.expires_at).await?;

        tracing::info!(
            account_id = %member.id,
            organization_id = %member.organization_id,
            "left organization"
        );
        Ok(issued)
    }

    pub async fn logout(&self, session: &Authenticated) -> Result<RevocationReceipt, AccessError> {
        let receipt = self.registry.revoke(&session.token, session.expires_at).await?;
        tracing::info!(
            account_id = %session.principal.account_id(),
            newly_revoked = receipt.newly_revoked,
            "logged out"
        );
        Ok(receipt)
    }

    async fn issue_otp(&self, account_id: AccountId, email: &str) -> Result<OtpIssued, AccessError> {
        let otp = OtpCode::issue(account_id, Utc::now(), &mut rand::thread_rng());
        let issued = OtpIssued {
            account_id,
            email: email.to_string(),
            otp: otp.code.clone(),
            otp_expires_at: otp.expires_at,
        };
        self.directory.insert_otp(otp).await?;
        Ok(issued)
    }
}
