//! Configuration loading and representation.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use chrono::Duration;

use teamforge_auth::{Argon2Hasher, DEFAULT_TOKEN_LIFETIME_SECS};
use teamforge_core::Page;

use crate::revocation::DEFAULT_PURGE_INTERVAL;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Argon2 cost preset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Argon2Profile {
    #[default]
    Default,
    Production,
}

impl Argon2Profile {
    pub fn hasher(&self) -> Argon2Hasher {
        match self {
            Argon2Profile::Default => Argon2Hasher::default(),
            Argon2Profile::Production => Argon2Hasher::production(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bind_addr: SocketAddr,
    /// Shared revocation registry; in-memory when absent.
    pub redis_url: Option<String>,
    pub default_page: Page,
    pub argon2_profile: Argon2Profile,
    /// Time between revocation purge passes.
    pub purge_interval: std::time::Duration,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("bind_addr", &self.bind_addr)
            .field("redis_url", &self.redis_url)
            .field("default_page", &self.default_page)
            .field("argon2_profile", &self.argon2_profile)
            .field("purge_interval", &self.purge_interval)
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(v) => v.parse::<i64>().context("TOKEN_TTL_SECS must be an integer")?,
            None => DEFAULT_TOKEN_LIFETIME_SECS,
        };
        if ttl_secs <= 0 {
            bail!("TOKEN_TTL_SECS must be positive, got {ttl_secs}");
        }

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address")?;

        let page = match get("DEFAULT_PAGE") {
            Some(v) => v.parse::<u32>().context("DEFAULT_PAGE must be a positive integer")?,
            None => Page::DEFAULT_PAGE,
        };
        let page_size = match get("DEFAULT_PAGE_SIZE") {
            Some(v) => v.parse::<u32>().context("DEFAULT_PAGE_SIZE must be a positive integer")?,
            None => Page::DEFAULT_PAGE_SIZE,
        };

        let argon2_profile = match get("ARGON2_PROFILE").as_deref() {
            None | Some("default") => Argon2Profile::Default,
            Some("production") => Argon2Profile::Production,
            Some(other) => bail!("ARGON2_PROFILE must be `default` or `production`, got `{other}`"),
        };

        let purge_interval = match get("REVOCATION_PURGE_SECS") {
            Some(v) => {
                let secs = v
                    .parse::<u64>()
                    .context("REVOCATION_PURGE_SECS must be a positive integer")?;
                if secs == 0 {
                    bail!("REVOCATION_PURGE_SECS must be positive");
                }
                std::time::Duration::from_secs(secs)
            }
            None => DEFAULT_PURGE_INTERVAL,
        };

        Ok(Self {
            jwt_secret,
            token_ttl: Duration::seconds(ttl_secs),
            bind_addr,
            redis_url: get("REDIS_URL"),
            default_page: Page::new(page, page_size),
            argon2_profile,
            purge_interval,
        })
    }
}
