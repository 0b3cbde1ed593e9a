//! 短码、URL 校验与 JWT 的性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shortener::api::jwt::JwtService;
use shortener::utils::url_validator::validate_url;
use shortener::utils::{generate_random_code, generate_secure_token, is_valid_short_code};

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    let max_len_code = "a".repeat(64);
    let too_long_code = "a".repeat(65);
    let cases = [
        ("generated", "aB3xZ9", true),
        ("dash_underscore", "my-code_01", true),
        ("max_length", max_len_code.as_str(), true),
        ("too_long", too_long_code.as_str(), false),
        ("injection", "'; DROP TABLE urls--", false),
    ];

    for (name, code, expected) in cases {
        group.bench_function(name, |b| {
            b.iter(|| assert_eq!(is_valid_short_code(code), expected));
        });
    }

    group.finish();
}

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    for length in [4, 6, 12, 32] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| generate_random_code(length));
        });
    }

    group.finish();
}

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("https", |b| {
        b.iter(|| validate_url("https://www.example.com/some/long/path?with=query&and=more"));
    });

    group.bench_function("dangerous_scheme", |b| {
        b.iter(|| validate_url("javascript:alert(document.cookie)").is_err());
    });

    group.bench_function("not_a_url", |b| {
        b.iter(|| validate_url("definitely not a url").is_err());
    });

    group.finish();
}

fn bench_jwt(c: &mut Criterion) {
    let access_secret = generate_secure_token(32);
    let refresh_secret = generate_secure_token(32);
    let service = JwtService::new(&access_secret, &refresh_secret, 5, 1);
    let token = service
        .generate_access_token(1, "bench@example.com")
        .expect("token should be issued");

    let mut group = c.benchmark_group("utils/jwt");

    group.bench_function("issue_access", |b| {
        b.iter(|| service.generate_access_token(1, "bench@example.com"));
    });

    group.bench_function("validate_access", |b| {
        b.iter(|| service.validate_access_token(&token).expect("token should be valid"));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_is_valid_short_code,
    bench_generate_random_code,
    bench_validate_url,
    bench_jwt
);
criterion_main!(benches);
