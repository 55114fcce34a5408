//! One-way password hashing.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("invalid hasher parameters")]
    InvalidParams,

    #[error("failed to hash secret")]
    Hashing,
}

/// Salted, deliberately slow secret hashing.
///
/// Two calls with the same input yield different digests.
pub trait SecretHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// True iff `digest` was produced from `plaintext` under this scheme.
    /// A malformed digest verifies as `false`.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id hasher with tunable work factor.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    /// Number of iterations
    time_cost: u32,
    /// Degree of parallelism
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB - argon2 default
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// 64 MiB memory, 3 iterations, 4 lanes.
    pub fn production() -> Self {
        Self::new(65536, 3, 4)
    }

    fn argon2(&self) -> Result<Argon2<'static>, HashError> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| HashError::InvalidParams)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| HashError::Hashing)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        // Parameters are read from the digest itself.
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Hasher {
        Argon2Hasher::new(1024, 1, 1)
    }

    #[test]
    fn verify_accepts_matching_secret() {
        let hasher = fast();
        let digest = hasher.hash("s3cret!pass").unwrap();
        assert!(hasher.verify("s3cret!pass", &digest));
        assert!(!hasher.verify("wrong!pass1", &digest));
    }

    #[test]
    fn digests_are_salted() {
        let hasher = fast();
        let a = hasher.hash("s3cret!pass").unwrap();
        let b = hasher.hash("s3cret!pass").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("s3cret!pass", &b));
    }

    #[test]
    fn malformed_digest_is_false_not_error() {
        let hasher = fast();
        assert!(!hasher.verify("anything", "not-a-phc-string"));
        assert!(!hasher.verify("anything", ""));
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let hasher = Argon2Hasher::new(1024, 1, 0);
        assert_eq!(hasher.hash("x"), Err(HashError::InvalidParams));
    }
}
