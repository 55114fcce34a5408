//! Authorization Guard: turns a bearer credential into an authenticated
//! principal, or rejects it.
//!
//! Read-only: the guard never writes to the registry or the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AccessError, CredentialError, Principal, RevocationRegistry, TokenCodec};

/// A request whose bearer token passed signature, expiry and revocation checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    /// Raw bearer string; doubles as the revocation key.
    pub token: String,
    pub principal: Principal,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Extract the token from an `Authorization` header value.
///
/// Returns `None` unless the value is `Bearer <token>` with a non-blank token.
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[derive(Clone)]
pub struct AuthorizationGuard {
    codec: Arc<dyn TokenCodec>,
    registry: Arc<dyn RevocationRegistry>,
}

impl AuthorizationGuard {
    pub fn new(codec: Arc<dyn TokenCodec>, registry: Arc<dyn RevocationRegistry>) -> Self {
        Self { codec, registry }
    }

    /// Run the checks in order: presence, signature/expiry, revocation.
    pub async fn authorize(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Authenticated, AccessError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(CredentialError::Missing)?;

        let verified = self.codec.verify(token, now).map_err(|e| {
            tracing::warn!(error = %e, "bearer token rejected");
            CredentialError::Invalid
        })?;

        if self.registry.is_revoked(token).await? {
            tracing::warn!(
                account_id = %verified.claims.principal.account_id(),
                scope = verified.claims.principal.scope_name(),
                "revoked token presented"
            );
            return Err(CredentialError::Revoked.into());
        }

        Ok(Authenticated {
            token: token.to_string(),
            principal: verified.claims.principal,
            issued_at: verified.issued_at,
            expires_at: verified.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::testing::{FakeRevocationRegistry, account};
    use crate::{Claims, Hs256TokenCodec};

    fn setup() -> (AuthorizationGuard, Arc<Hs256TokenCodec>, Arc<FakeRevocationRegistry>) {
        let codec = Arc::new(Hs256TokenCodec::new("guard-test-secret"));
        let registry = Arc::new(FakeRevocationRegistry::default());
        (AuthorizationGuard::new(codec.clone(), registry.clone()), codec, registry)
    }

    fn token(codec: &Hs256TokenCodec, now: DateTime<Utc>) -> String {
        let claims = Claims {
            principal: Principal::Account(account("alice").principal()),
            timestamp: now.timestamp_millis(),
        };
        codec.sign(&claims, None, now).unwrap().token
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer   abc  "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("bEaReR  abc "), Some("abc"));
        assert_eq!(bearer_token("bearer "), None);
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token("basic abc"), None);
    }

    #[tokio::test]
    async fn missing_or_blank_is_missing() {
        let (guard, _, _) = setup();
        for input in [None, Some(""), Some("   ")] {
            let err = guard.authorize(input, Utc::now()).await.unwrap_err();
            assert_eq!(err, AccessError::Credential(CredentialError::Missing));
        }
    }

    #[tokio::test]
    async fn bad_or_expired_token_is_invalid() {
        let (guard, codec, _) = setup();
        let now = Utc::now();

        let err = guard.authorize(Some("garbage"), now).await.unwrap_err();
        assert_eq!(err, AccessError::Credential(CredentialError::Invalid));

        let old = token(&codec, now - Duration::hours(2));
        let err = guard.authorize(Some(&old), now).await.unwrap_err();
        assert_eq!(err, AccessError::Credential(CredentialError::Invalid));
    }

    #[tokio::test]
    async fn valid_token_authenticates() {
        let (guard, codec, _) = setup();
        let now = Utc::now();
        let t = token(&codec, now);

        let auth = guard.authorize(Some(&t), now).await.unwrap();
        assert_eq!(auth.token, t);
        assert_eq!(auth.principal.username(), "alice");
        assert!(auth.expires_at > auth.issued_at);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() {
        let (guard, codec, registry) = setup();
        let now = Utc::now();
        let t = token(&codec, now);
        registry.revoke(&t, now + Duration::hours(1)).await.unwrap();

        let err = guard.authorize(Some(&t), now).await.unwrap_err();
        assert_eq!(err, AccessError::Credential(CredentialError::Revoked));
    }

    #[tokio::test]
    async fn unreachable_registry_fails_closed() {
        let codec = Arc::new(Hs256TokenCodec::new("guard-test-secret"));
        let guard = AuthorizationGuard::new(codec.clone(), Arc::new(FakeRevocationRegistry::failing()));
        let now = Utc::now();
        let t = token(&codec, now);

        let err = guard.authorize(Some(&t), now).await.unwrap_err();
        assert!(matches!(err, AccessError::StoreUnavailable(_)));
    }
}
