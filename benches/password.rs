//! Argon2 密码哈希性能基准测试
//!
//! Registration and login each pay for one of these on a blocking thread.

use criterion::{Criterion, criterion_group, criterion_main};
use shortener::services::normalize_email;
use shortener::utils::password::{hash_password, verify_password};

fn bench_hash_password(c: &mut Criterion) {
    c.bench_function("password/hash", |b| {
        b.iter(|| hash_password("register_password_123").expect("hash should succeed"));
    });
}

fn bench_verify_password(c: &mut Criterion) {
    let password = "login_password_456";
    let hash = hash_password(password).expect("hash should succeed");

    let mut group = c.benchmark_group("password/verify");

    group.bench_function("match", |b| {
        b.iter(|| assert!(verify_password(password, &hash).expect("verify should succeed")));
    });

    group.bench_function("mismatch", |b| {
        b.iter(|| assert!(!verify_password("wrong_password", &hash).expect("verify should succeed")));
    });

    group.finish();
}

fn bench_normalize_email(c: &mut Criterion) {
    c.bench_function("password/normalize_email", |b| {
        b.iter(|| normalize_email(Some("  Some.User@Example.COM  ")).expect("valid email"));
    });
}

criterion_group!(
    benches,
    bench_hash_password,
    bench_verify_password,
    bench_normalize_email
);
criterion_main!(benches);
