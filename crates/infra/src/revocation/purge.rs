//! Background purge of expired revocation entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;

use teamforge_auth::RevocationRegistry;

/// Default time between purge passes.
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Periodically drops registry entries whose token has expired.
pub struct RevocationPurger {
    registry: Arc<dyn RevocationRegistry>,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl RevocationPurger {
    pub fn new(registry: Arc<dyn RevocationRegistry>, interval: Duration) -> Self {
        Self {
            registry,
            interval,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle that stops the worker when notified.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Spawn the worker. A failed pass is logged and retried on the next tick.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(interval_secs = self.interval.as_secs(), "revocation purger started");

            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = self.shutdown.notified() => {
                        tracing::info!("revocation purger stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match self.registry.purge_expired(Utc::now()).await {
                            Ok(0) => {}
                            Ok(removed) => tracing::debug!(removed, "purged expired revocations"),
                            Err(e) => tracing::warn!(error = %e, "revocation purge failed"),
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::InMemoryRevocationRegistry;

    #[tokio::test]
    async fn purger_drops_expired_and_stops_on_shutdown() {
        let registry = Arc::new(InMemoryRevocationRegistry::new());
        let now = Utc::now();
        registry.revoke("old", now - ChronoDuration::minutes(1)).await.unwrap();
        registry.revoke("live", now + ChronoDuration::hours(1)).await.unwrap();

        let purger = RevocationPurger::new(registry.clone(), Duration::from_millis(10));
        let shutdown = purger.shutdown_handle();
        let handle = purger.start();

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.notify_one();
        handle.await.unwrap();

        assert!(!registry.is_revoked("old").await.unwrap());
        assert!(registry.is_revoked("live").await.unwrap());
    }
}
