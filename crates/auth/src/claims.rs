use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Principal;

/// Identity claims snapshotting a principal at issuance time.
///
/// `timestamp` (unix millis) is informational only and is never used as a
/// token identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub principal: Principal,
    pub timestamp: i64,
}

/// Signed payload: the claims plus the validity window (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub principal: Principal,
    pub timestamp: i64,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(claims: &Claims, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            principal: claims.principal.clone(),
            timestamp: claims.timestamp,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn claims(&self) -> Claims {
        Claims {
            principal: self.principal.clone(),
            timestamp: self.timestamp,
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsValidationError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token time window (exp < iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the validity window of decoded claims.
///
/// Signature verification happens before this, in the codec. A token is
/// usable up to and including its `exp` second.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), ClaimsValidationError> {
    if claims.exp < claims.iat {
        return Err(ClaimsValidationError::InvalidTimeWindow);
    }
    if now.timestamp() > claims.exp {
        return Err(ClaimsValidationError::Expired);
    }
    Ok(())
}
