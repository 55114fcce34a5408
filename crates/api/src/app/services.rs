use std::sync::Arc;

use teamforge_accounts::AccountService;
use teamforge_auth::{
    AuthorizationGuard, Hs256TokenCodec, PermissionResolver, RevocationRegistry, SessionIssuer,
};
use teamforge_infra::{AppConfig, InMemoryRevocationRegistry, InMemoryStore};
use teamforge_workspace::{ProjectService, TeamService};

/// Everything the handlers need, shared behind one `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountService,
    pub projects: ProjectService,
    pub teams: TeamService,
    pub guard: AuthorizationGuard,
    /// Backing store; exposed for seeding (admin provisioning, tests).
    pub store: Arc<InMemoryStore>,
    pub registry: Arc<dyn RevocationRegistry>,
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let registry = build_registry(config)?;
        let store = Arc::new(InMemoryStore::new());
        Ok(Self::wire(config, store, registry))
    }

    fn wire(config: &AppConfig, store: Arc<InMemoryStore>, registry: Arc<dyn RevocationRegistry>) -> Self {
        let codec = Arc::new(Hs256TokenCodec::with_lifetime(
            config.jwt_secret.as_bytes(),
            config.token_ttl,
        ));
        let hasher = Arc::new(config.argon2_profile.hasher());

        let issuer = SessionIssuer::new(codec.clone(), store.clone());
        let guard = AuthorizationGuard::new(codec, registry.clone());
        let resolver = PermissionResolver::new(store.clone());

        let accounts = AccountService::new(
            store.clone(),
            store.clone(),
            hasher,
            issuer,
            registry.clone(),
        )
        .with_default_page(config.default_page);
        let projects = ProjectService::new(resolver.clone(), store.clone(), store.clone())
            .with_default_page(config.default_page);
        let teams =
            TeamService::new(resolver, store.clone(), store.clone()).with_default_page(config.default_page);

        Self {
            accounts,
            projects,
            teams,
            guard,
            store,
            registry,
        }
    }
}

fn build_registry(config: &AppConfig) -> anyhow::Result<Arc<dyn RevocationRegistry>> {
    let Some(url) = config.redis_url.as_deref() else {
        return Ok(Arc::new(InMemoryRevocationRegistry::new()));
    };

    #[cfg(feature = "redis")]
    {
        use anyhow::Context;

        let registry = teamforge_infra::RedisRevocationRegistry::new(url, None)
            .context("failed to open redis revocation registry")?;
        tracing::info!("using redis revocation registry");
        Ok(Arc::new(registry))
    }

    #[cfg(not(feature = "redis"))]
    {
        tracing::warn!(
            redis_url = url,
            "REDIS_URL set but redis feature not enabled, falling back to in-memory revocation"
        );
        Ok(Arc::new(InMemoryRevocationRegistry::new()))
    }
}
