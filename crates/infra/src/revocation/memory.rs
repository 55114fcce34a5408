use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use teamforge_auth::{RegistryError, RevocationReceipt, RevocationRegistry};

/// Process-local revocation set keyed by the raw bearer string.
#[derive(Debug, Default)]
pub struct InMemoryRevocationRegistry {
    inner: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> RegistryError {
    RegistryError::Unavailable("revocation registry lock poisoned".to_string())
}

#[async_trait]
impl RevocationRegistry for InMemoryRevocationRegistry {
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RevocationReceipt, RegistryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let newly_revoked = !map.contains_key(token_id);
        if newly_revoked {
            map.insert(token_id.to_string(), expires_at);
        }
        Ok(RevocationReceipt { newly_revoked })
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RegistryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.contains_key(token_id))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RegistryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let before = map.len();
        map.retain(|_, expires_at| *expires_at >= now);
        Ok(before - map.len())
    }
}
