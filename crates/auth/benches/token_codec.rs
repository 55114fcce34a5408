use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use chrono::{Duration, Utc};
use teamforge_auth::{
    AccountPrincipal, AccountType, Claims, Hs256TokenCodec, Level, MemberPrincipal, Position,
    Principal, TokenCodec,
};
use teamforge_core::{AccountId, MemberId, OrganizationId};

fn account_claims() -> Claims {
    Claims {
        principal: Principal::Account(AccountPrincipal {
            id: AccountId::new(),
            username: "bench".to_string(),
            first_name: "Bench".to_string(),
            last_name: "Mark".to_string(),
            email: "bench@example.com".to_string(),
            verified: true,
            account_type: AccountType::User,
        }),
        timestamp: Utc::now().timestamp_millis(),
    }
}

fn member_claims() -> Claims {
    Claims {
        principal: Principal::Member(MemberPrincipal {
            id: AccountId::new(),
            member_id: MemberId::new(),
            username: "bench".to_string(),
            first_name: "Bench".to_string(),
            last_name: "Mark".to_string(),
            email: "bench@example.com".to_string(),
            verified: true,
            position: Position::creator(),
            level: Level::Level4,
            organization_id: OrganizationId::new(),
        }),
        timestamp: Utc::now().timestamp_millis(),
    }
}

fn bench_sign(c: &mut Criterion) {
    let codec = Hs256TokenCodec::new("bench-secret");
    let mut group = c.benchmark_group("token_sign");

    for (name, claims) in [("account", account_claims()), ("member", member_claims())] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &claims, |b, claims| {
            b.iter(|| {
                codec
                    .sign(black_box(claims), None, Utc::now())
                    .expect("sign")
            })
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let codec = Hs256TokenCodec::new("bench-secret");
    let now = Utc::now();
    let mut group = c.benchmark_group("token_verify");

    for (name, claims) in [("account", account_claims()), ("member", member_claims())] {
        let token = codec.sign(&claims, Some(Duration::hours(1)), now).expect("sign").token;
        group.bench_with_input(BenchmarkId::from_parameter(name), &token, |b, token| {
            b.iter(|| codec.verify(black_box(token), now).expect("verify"))
        });
    }

    let forged = Hs256TokenCodec::new("other-secret")
        .sign(&account_claims(), None, now)
        .expect("sign")
        .token;
    group.bench_function("rejected_signature", |b| {
        b.iter(|| codec.verify(black_box(&forged), now).is_err())
    });
    group.finish();
}

criterion_group!(benches, bench_sign, bench_verify);
criterion_main!(benches);
