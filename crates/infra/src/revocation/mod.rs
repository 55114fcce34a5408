//! Revocation registry implementations.
//!
//! - `InMemoryRevocationRegistry`: single process, tests/dev
//! - `RedisRevocationRegistry` (feature `redis`): shared across instances
//! - `RevocationPurger`: background task dropping expired entries

pub mod memory;
pub mod purge;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::InMemoryRevocationRegistry;
pub use purge::{DEFAULT_PURGE_INTERVAL, RevocationPurger};
#[cfg(feature = "redis")]
pub use self::redis::RedisRevocationRegistry;
