use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use chrono::{Duration, Utc};
use teamforge_auth::{
    Account, AccountType, Action, AuthorizationGuard, CredentialStore, Hs256TokenCodec, Level,
    Membership, OrganizationPermission, PermissionFlags, PermissionResolver, Position,
    RevocationRegistry, Scope, SessionIssuer,
};
use teamforge_core::{AccountId, MemberId, OrganizationId};
use teamforge_infra::{InMemoryRevocationRegistry, InMemoryStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn account(username: &str) -> Account {
    Account {
        id: AccountId::new(),
        username: username.to_string(),
        first_name: "Bench".to_string(),
        last_name: "Mark".to_string(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        verified: true,
        account_type: AccountType::User,
        created_at: Utc::now(),
    }
}

/// Store with one organization and a top-rank member holding a full row.
fn seeded_store() -> (Arc<InMemoryStore>, Account, OrganizationId) {
    let store = Arc::new(InMemoryStore::new());
    let founder = account("founder");
    store.seed_account(founder.clone()).unwrap();

    let rt = runtime();
    let org = rt.block_on(async {
        use teamforge_accounts::{DirectoryStore, OrganizationCharter};
        use teamforge_auth::Organization;

        let organization_id = OrganizationId::new();
        store
            .create_organization(OrganizationCharter {
                organization: Organization {
                    id: organization_id,
                    name: "Bench Org".to_string(),
                    owner_id: founder.id,
                    created_at: Utc::now(),
                },
                founder: Membership {
                    id: MemberId::new(),
                    account_id: founder.id,
                    organization_id,
                    position: Position::creator(),
                    level: Level::Level4,
                },
                permission: OrganizationPermission {
                    organization_id,
                    account_id: founder.id,
                    flags: PermissionFlags::full(),
                },
            })
            .await
            .unwrap()
            .id
    });
    (store, founder, org)
}

fn bench_guard_authorize(c: &mut Criterion) {
    let rt = runtime();
    let codec = Arc::new(Hs256TokenCodec::new("bench-secret"));
    let (store, founder, _) = seeded_store();
    let issuer = SessionIssuer::new(codec.clone(), store);

    let mut group = c.benchmark_group("guard_authorize");
    group.throughput(Throughput::Elements(1));

    for revoked in [0usize, 10_000] {
        let registry = Arc::new(InMemoryRevocationRegistry::new());
        let exp = Utc::now() + Duration::hours(1);
        rt.block_on(async {
            for i in 0..revoked {
                registry.revoke(&format!("revoked-{i}"), exp).await.unwrap();
            }
        });
        let guard = AuthorizationGuard::new(codec.clone(), registry);
        let token = issuer.issue_account_token(&founder, Utc::now()).unwrap().token;

        group.bench_with_input(BenchmarkId::new("registry_size", revoked), &token, |b, token| {
            b.iter(|| {
                rt.block_on(guard.authorize(Some(black_box(token)), Utc::now()))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_permission_resolver(c: &mut Criterion) {
    let rt = runtime();
    let codec = Arc::new(Hs256TokenCodec::new("bench-secret"));
    let (store, founder, org) = seeded_store();
    let issuer = SessionIssuer::new(codec, store.clone());
    let member = rt
        .block_on(issuer.issue_member_token(&founder, org, Utc::now()))
        .unwrap()
        .principal;

    let outsider = account("outsider");
    store.seed_account(outsider.clone()).unwrap();
    let admin = Account {
        account_type: AccountType::Admin,
        ..account("root")
    };

    let resolver = PermissionResolver::new(store.clone() as Arc<dyn CredentialStore>);
    let mut group = c.benchmark_group("permission_resolver");

    group.bench_function("member_create_allowed", |b| {
        b.iter(|| {
            rt.block_on(resolver.authorize(black_box(&member), Action::Create, Scope::Organization(org)))
                .unwrap()
        });
    });

    group.bench_function("account_denied_without_context", |b| {
        let principal = teamforge_auth::Principal::Account(outsider.principal());
        b.iter(|| {
            rt.block_on(resolver.authorize(black_box(&principal), Action::Create, Scope::Organization(org)))
                .unwrap_err()
        });
    });

    group.bench_function("administrator_bypass", |b| {
        let principal = teamforge_auth::Principal::Account(admin.principal());
        b.iter(|| {
            rt.block_on(resolver.authorize(black_box(&principal), Action::Delete, Scope::Organization(org)))
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_guard_authorize, bench_permission_resolver);
criterion_main!(benches);
