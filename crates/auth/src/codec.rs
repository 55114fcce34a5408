//! Bearer token codec (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{ClaimsValidationError, TokenClaims, validate_claims};
use crate::Claims;

/// Default token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("claims could not be serialized")]
    Unserializable,
}

/// A freshly signed token with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Claims recovered from a verified token, unchanged from issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub claims: Claims,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signs claims into opaque bearer tokens and verifies them back.
///
/// Stateless apart from the signing secret and default lifetime.
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` valid from `now` for `lifetime` (default when `None`).
    fn sign(
        &self,
        claims: &Claims,
        lifetime: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError>;

    /// Verify signature and expiry, returning the decoded claims.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError>;

    fn default_lifetime(&self) -> Duration;
}

/// HS256 codec keyed by a process-wide symmetric secret.
///
/// Rotating the secret invalidates every outstanding token.
#[derive(Clone)]
pub struct Hs256TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_lifetime: Duration,
}

impl core::fmt::Debug for Hs256TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenCodec")
            .field("secret", &"[REDACTED]")
            .field("default_lifetime", &self.default_lifetime)
            .finish()
    }
}

impl Hs256TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_lifetime(secret, Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS))
    }

    pub fn with_lifetime(secret: impl AsRef<[u8]>, default_lifetime: Duration) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            default_lifetime,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `validate_claims`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn sign(
        &self,
        claims: &Claims,
        lifetime: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let expires_at = now + lifetime.unwrap_or(self.default_lifetime);
        let payload = TokenClaims::new(claims, now, expires_at);

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|_| TokenError::Unserializable)?;

        Ok(SignedToken {
            token,
            issued_at: payload.issued_at().unwrap_or(now),
            expires_at: payload.expires_at().unwrap_or(expires_at),
        })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;

        let payload = data.claims;
        validate_claims(&payload, now).map_err(|e| match e {
            ClaimsValidationError::Expired => TokenError::Expired,
            ClaimsValidationError::InvalidTimeWindow => TokenError::Malformed,
        })?;

        let (Some(issued_at), Some(expires_at)) = (payload.issued_at(), payload.expires_at()) else {
            return Err(TokenError::Malformed);
        };

        Ok(VerifiedToken {
            claims: payload.claims(),
            issued_at,
            expires_at,
        })
    }

    fn default_lifetime(&self) -> Duration {
        self.default_lifetime
    }
}

#[cfg(test)]
mod tests {
    use teamforge_core::{AccountId, MemberId, OrganizationId};

    use super::*;
    use crate::{AccountPrincipal, AccountType, Level, MemberPrincipal, Position, Principal};

    const SECRET: &str = "codec-test-secret";

    fn account_claims() -> Claims {
        Claims {
            principal: Principal::Account(AccountPrincipal {
                id: AccountId::new(),
                username: "alice".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                email: "alice@example.com".to_string(),
                verified: true,
                account_type: AccountType::User,
            }),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn sign_then_verify_returns_same_claims() {
        let codec = Hs256TokenCodec::new(SECRET);
        let now = Utc::now();
        let claims = account_claims();

        let signed = codec.sign(&claims, None, now).unwrap();
        let verified = codec.verify(&signed.token, now).unwrap();

        assert_eq!(verified.claims, claims);
        assert_eq!(verified.expires_at, signed.expires_at);
        assert_eq!(
            (signed.expires_at - signed.issued_at).num_seconds(),
            DEFAULT_TOKEN_LIFETIME_SECS
        );
    }

    #[test]
    fn member_claims_survive_round_trip() {
        let codec = Hs256TokenCodec::new(SECRET);
        let now = Utc::now();
        let claims = Claims {
            principal: Principal::Member(MemberPrincipal {
                id: AccountId::new(),
                member_id: MemberId::new(),
                username: "alice".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                email: "alice@example.com".to_string(),
                verified: true,
                position: Position::creator(),
                level: Level::Level4,
                organization_id: OrganizationId::new(),
            }),
            timestamp: now.timestamp_millis(),
        };

        let signed = codec.sign(&claims, Some(Duration::minutes(5)), now).unwrap();
        assert_eq!(codec.verify(&signed.token, now).unwrap().claims, claims);
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = Hs256TokenCodec::new(SECRET);
        assert_eq!(codec.verify("not-a-token", Utc::now()), Err(TokenError::Malformed));
        assert_eq!(codec.verify("", Utc::now()), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let now = Utc::now();
        let signed = Hs256TokenCodec::new("secret-one")
            .sign(&account_claims(), None, now)
            .unwrap();

        let result = Hs256TokenCodec::new("secret-two").verify(&signed.token, now);
        assert_eq!(result, Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn tampered_payload_is_signature_invalid() {
        let codec = Hs256TokenCodec::new(SECRET);
        let now = Utc::now();
        let a = codec.sign(&account_claims(), None, now).unwrap().token;
        let b = codec.sign(&account_claims(), None, now).unwrap().token;

        // Header and signature of `a` around the payload of `b`.
        let a_parts: Vec<&str> = a.split('.').collect();
        let b_parts: Vec<&str> = b.split('.').collect();
        let forged = format!("{}.{}.{}", a_parts[0], b_parts[1], a_parts[2]);

        assert_eq!(codec.verify(&forged, now), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let codec = Hs256TokenCodec::new(SECRET);
        let now = Utc::now();
        let signed = codec
            .sign(&account_claims(), None, now - Duration::hours(2))
            .unwrap();

        assert_eq!(codec.verify(&signed.token, now), Err(TokenError::Expired));
    }

    #[test]
    fn token_is_valid_until_its_expiry_second() {
        let codec = Hs256TokenCodec::with_lifetime(SECRET, Duration::seconds(60));
        let now = Utc::now();
        let signed = codec.sign(&account_claims(), None, now).unwrap();

        assert!(codec.verify(&signed.token, signed.expires_at).is_ok());
        assert_eq!(
            codec.verify(&signed.token, signed.expires_at + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: verify(sign(c, L)) == c immediately after signing.
            #[test]
            fn round_trip_preserves_claims(
                username in "[a-z0-9]{4,32}",
                first_name in "[A-Za-z]{1,20}",
                last_name in "[A-Za-z]{1,20}",
                verified in any::<bool>(),
                admin in any::<bool>(),
                timestamp in 0i64..4_000_000_000_000,
                lifetime_secs in 1i64..86_400,
            ) {
                let codec = Hs256TokenCodec::new(SECRET);
                let now = Utc::now();
                let claims = Claims {
                    principal: Principal::Account(AccountPrincipal {
                        id: AccountId::new(),
                        email: format!("{username}@example.com"),
                        username,
                        first_name,
                        last_name,
                        verified,
                        account_type: if admin { AccountType::Admin } else { AccountType::User },
                    }),
                    timestamp,
                };

                let signed = codec.sign(&claims, Some(Duration::seconds(lifetime_secs)), now).unwrap();
                let verified = codec.verify(&signed.token, now).unwrap();
                prop_assert_eq!(verified.claims, claims);
            }

            /// Property: once now > iat + lifetime the token is Expired.
            #[test]
            fn past_expiry_always_expired(
                lifetime_secs in 1i64..7_200,
                overshoot_secs in 1i64..100_000,
            ) {
                let codec = Hs256TokenCodec::new(SECRET);
                let issued = Utc::now() - Duration::days(30);
                let signed = codec.sign(&account_claims(), Some(Duration::seconds(lifetime_secs)), issued).unwrap();
                let later = signed.expires_at + Duration::seconds(overshoot_secs);
                prop_assert_eq!(codec.verify(&signed.token, later), Err(TokenError::Expired));
            }
        }
    }
}
