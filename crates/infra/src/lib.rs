//! Infrastructure layer: stores, revocation registries, config.

pub mod config;
pub mod revocation;
pub mod store;


pub use config::{AppConfig, Argon2Profile};
pub use revocation::{DEFAULT_PURGE_INTERVAL, InMemoryRevocationRegistry, RevocationPurger};
#[cfg(feature = "redis")]
pub use revocation::RedisRevocationRegistry;
pub use store::InMemoryStore;
