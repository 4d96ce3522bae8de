//! Decision engine benchmark: one decision over a wide policy.
//!
//! The target envelope is sub-millisecond for policies with up to 100
//! bindings and 10 requested permissions.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rsiam_domain::condition::EvalContext;
use rsiam_domain::engine::check_permissions;
use rsiam_domain::groups::GroupRegistry;
use rsiam_domain::model::{Binding, Condition, Policy};
use rsiam_domain::roles::RoleCatalog;

fn wide_policy(bindings: usize) -> Policy {
    let mut policy = Policy {
        version: 3,
        ..Default::default()
    };
    for i in 0..bindings {
        policy.bindings.push(Binding {
            role: "roles/viewer".to_string(),
            members: vec![format!("user:member-{i}@example.com")],
            condition: if i % 4 == 0 {
                Some(Condition {
                    expression: format!("resource.name.startsWith(\"projects/bench-{i}\")"),
                    ..Default::default()
                })
            } else {
                None
            },
        });
    }
    // The caller only matches the last binding, forcing a full scan.
    policy.bindings.push(Binding {
        role: "roles/owner".to_string(),
        members: vec!["user:caller@example.com".to_string()],
        condition: None,
    });
    policy
}

fn permissions() -> Vec<String> {
    vec![
        "secretmanager.secrets.get",
        "secretmanager.secrets.create",
        "secretmanager.secrets.update",
        "secretmanager.secrets.delete",
        "secretmanager.secrets.list",
        "secretmanager.versions.access",
        "secretmanager.versions.list",
        "cloudkms.cryptoKeys.encrypt",
        "cloudkms.cryptoKeys.decrypt",
        "cloudkms.keyRings.list",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn bench_check_permissions(c: &mut Criterion) {
    let policy = wide_policy(100);
    let perms = permissions();
    let custom_roles: HashMap<String, Vec<String>> = HashMap::new();
    let groups: HashMap<String, Vec<String>> = HashMap::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    c.bench_function("check_100_bindings_10_permissions", |b| {
        b.iter(|| {
            let ctx = EvalContext::new("projects/bench/secrets/s1", now);
            let catalog = RoleCatalog::new(&custom_roles, false);
            let registry = GroupRegistry::new(&groups);
            black_box(check_permissions(
                black_box(&policy),
                black_box("user:caller@example.com"),
                black_box(&perms),
                &ctx,
                &catalog,
                &registry,
            ))
        })
    });
}

criterion_group!(benches, bench_check_permissions);
criterion_main!(benches);
