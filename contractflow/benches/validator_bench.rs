//! Benchmarks for schema validation and request matching.

use contractflow::contracts::fixtures;
use contractflow::core::HttpRequest;
use contractflow::matcher::RequestMatcher;
use contractflow::mocks::MockRule;
use contractflow::schema::{infer_schema, SchemaValidator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn validation_benchmark(c: &mut Criterion) {
    let Ok(contract) = fixtures::list_users_contract() else {
        return;
    };
    let Some(schema) = contract.response_schema else {
        return;
    };
    let users: Vec<_> = (0..100)
        .map(|i| json!({"id": i, "username": format!("user{i}"), "email": format!("user{i}@example.com")}))
        .collect();
    let body = json!({"users": users, "count": 100});
    let validator = SchemaValidator::new();

    c.bench_function("validate_100_users", |b| {
        b.iter(|| black_box(validator.validate(black_box(&body), &schema)))
    });
    c.bench_function("infer_100_users", |b| b.iter(|| black_box(infer_schema(black_box(&body)))));
}

fn matcher_benchmark(c: &mut Criterion) {
    let rules: Vec<MockRule> = (0..50)
        .map(|i| MockRule::new("GET", &format!("/api/resource{i}/{{id}}")))
        .chain(std::iter::once(MockRule::new("GET", "/api/resource49/status")))
        .collect();
    let request = HttpRequest::get("/api/resource49/status");
    let matcher = RequestMatcher::new();

    c.bench_function("match_51_rules", |b| {
        b.iter(|| black_box(matcher.find(black_box(&request), &rules).is_match()))
    });
}

criterion_group!(benches, validation_benchmark, matcher_benchmark);
criterion_main!(benches);
