//! Session Issuer: account tokens at sign-in, member tokens on organization
//! switch, account tokens again on organization logout.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use teamforge_core::OrganizationId;

use crate::{
    AccessError, Account, Claims, CredentialStore, MemberPrincipal, Principal, TokenCodec,
};

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// Next issuance timestamp in unix millis, strictly greater than every
/// previous one handed out by this process.
pub fn next_timestamp(now: DateTime<Utc>) -> i64 {
    let wall = now.timestamp_millis();
    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last + 1);
        match LAST_TIMESTAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// A token together with the principal it encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub principal: Principal,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionIssuer {
    codec: Arc<dyn TokenCodec>,
    store: Arc<dyn CredentialStore>,
}

impl SessionIssuer {
    pub fn new(codec: Arc<dyn TokenCodec>, store: Arc<dyn CredentialStore>) -> Self {
        Self { codec, store }
    }

    pub fn issue_account_token(&self, account: &Account, now: DateTime<Utc>) -> Result<IssuedToken, AccessError> {
        self.issue(Principal::Account(account.principal()), now)
    }

    /// Member-scoped token for `organization_id`.
    ///
    /// The organization must exist and the account must hold a membership in
    /// it; either miss is `NotFound`.
    pub async fn issue_member_token(
        &self,
        account: &Account,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AccessError> {
        self.store
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| AccessError::not_found("organization"))?;

        let membership = self
            .store
            .find_organization_membership(account.id, organization_id)
            .await?
            .ok_or_else(|| AccessError::not_found("membership"))?;

        let principal = Principal::Member(MemberPrincipal {
            id: account.id,
            member_id: membership.id,
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            verified: account.verified,
            position: membership.position,
            level: membership.level,
            organization_id,
        });

        let issued = self.issue(principal, now)?;
        tracing::info!(account_id = %account.id, %organization_id, "member token issued");
        Ok(issued)
    }

    /// Account-scoped token for a member leaving its organization context.
    ///
    /// Claims are rebuilt from the stored account, not copied from the member.
    pub async fn reissue_account_token(
        &self,
        member: &MemberPrincipal,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AccessError> {
        if self.store.find_organization(member.organization_id).await?.is_none() {
            return Err(AccessError::conflict("organization no longer exists"));
        }

        let account = self
            .store
            .find_account_by_id(member.id)
            .await?
            .ok_or_else(|| AccessError::not_found("account"))?;

        self.issue_account_token(&account, now)
    }

    fn issue(&self, principal: Principal, now: DateTime<Utc>) -> Result<IssuedToken, AccessError> {
        let claims = Claims {
            principal,
            timestamp: next_timestamp(now),
        };
        let signed = self.codec.sign(&claims, None, now)?;
        Ok(IssuedToken {
            token: signed.token,
            principal: claims.principal,
            issued_at: signed.issued_at,
            expires_at: signed.expires_at,
        })
    }
}
