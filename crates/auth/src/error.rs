//! Error taxonomy of the session and authorization core.
//!
//! Callers branch on variants, never on messages.

use thiserror::Error;

use teamforge_core::DomainError;

use crate::{AuthzError, HashError, RegistryError, StoreError, TokenError};

/// Failures of authentication (who is calling).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("missing bearer credential")]
    Missing,

    #[error("invalid bearer credential")]
    Invalid,

    #[error("credential has been revoked")]
    Revoked,

    #[error("email or password is invalid")]
    BadLogin,

    #[error("invalid or expired one-time code")]
    InvalidOtp,
}

/// Umbrella error returned by every core operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("forbidden: {0}")]
    Forbidden(#[from] AuthzError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Local failure unrelated to the caller's input (hashing, signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccessError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::Credential(CredentialError::Missing) => "missing_credential",
            AccessError::Credential(CredentialError::Invalid) => "invalid_credential",
            AccessError::Credential(CredentialError::Revoked) => "revoked",
            AccessError::Credential(CredentialError::BadLogin) => "bad_login",
            AccessError::Credential(CredentialError::InvalidOtp) => "invalid_otp",
            AccessError::Forbidden(e) => e.code(),
            AccessError::NotFound(_) => "not_found",
            AccessError::Conflict(_) => "conflict",
            AccessError::Validation(_) => "validation_error",
            AccessError::StoreUnavailable(_) => "store_unavailable",
            AccessError::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for AccessError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

impl From<RegistryError> for AccessError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

impl From<TokenError> for AccessError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Unserializable => Self::Internal(value.to_string()),
            TokenError::Malformed | TokenError::SignatureInvalid | TokenError::Expired => {
                Self::Credential(CredentialError::Invalid)
            }
        }
    }
}

impl From<HashError> for AccessError {
    fn from(value: HashError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<DomainError> for AccessError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
        }
    }
}
