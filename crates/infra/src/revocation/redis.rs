//! Redis-backed revocation registry.
//!
//! One sorted set holds every revoked token: member = raw bearer string,
//! score = the token's expiry (unix seconds). `ZADD NX` gives idempotent
//! revocation that keeps the first expiry, and `ZREMRANGEBYSCORE` purges
//! entries that can no longer verify anyway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use teamforge_auth::{RegistryError, RevocationReceipt, RevocationRegistry};

/// Default sorted-set key.
const DEFAULT_KEY: &str = "teamforge:revoked-tokens";

#[derive(Debug, Clone)]
pub struct RedisRevocationRegistry {
    client: redis::Client,
    key: String,
}

fn unavailable(e: redis::RedisError) -> RegistryError {
    RegistryError::Unavailable(e.to_string())
}

impl RedisRevocationRegistry {
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `key` - sorted-set key (default: "teamforge:revoked-tokens")
    pub fn new(redis_url: impl AsRef<str>, key: Option<String>) -> Result<Self, RegistryError> {
        let client = redis::Client::open(redis_url.as_ref()).map_err(unavailable)?;
        Ok(Self {
            client,
            key: key.unwrap_or_else(|| DEFAULT_KEY.to_string()),
        })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, RegistryError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)
    }
}

#[async_trait]
impl RevocationRegistry for RedisRevocationRegistry {
    #[instrument(skip(self, token_id), fields(key = %self.key), err)]
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RevocationReceipt, RegistryError> {
        let mut conn = self.connection().await?;
        let added = redis::cmd("ZADD")
            .arg(&self.key)
            .arg("NX")
            .arg(expires_at.timestamp())
            .arg(token_id)
            .query_async::<_, i64>(&mut conn)
            .await
            .map_err(unavailable)?;

        Ok(RevocationReceipt {
            newly_revoked: added > 0,
        })
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RegistryError> {
        let mut conn = self.connection().await?;
        let score = redis::cmd("ZSCORE")
            .arg(&self.key)
            .arg(token_id)
            .query_async::<_, Option<f64>>(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(score.is_some())
    }

    #[instrument(skip(self), fields(key = %self.key), err)]
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RegistryError> {
        let mut conn = self.connection().await?;
        // Exclusive upper bound: entries expiring exactly at `now` stay.
        let removed = redis::cmd("ZREMRANGEBYSCORE")
            .arg(&self.key)
            .arg("-inf")
            .arg(format!("({}", now.timestamp()))
            .query_async::<_, usize>(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(removed)
    }
}
