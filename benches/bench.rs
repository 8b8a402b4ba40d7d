// Criterion benchmarks for GP contract validation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gp_contracts::core::{resolve_optimizer, validate, Objective};
use gp_contracts::models::{Endpoint, GpMeanVarResponse, GpNextPointsRequest};
use serde_json::{json, Value};

fn create_historical_info(num_points: usize, dim: usize) -> Value {
    let points: Vec<Value> = (0..num_points)
        .map(|i| {
            let point: Vec<f64> = (0..dim).map(|d| ((i * 7 + d * 3) % 100) as f64 / 100.0).collect();
            json!({"point": point, "value": (i as f64 * 0.37).sin(), "value_var": 0.01})
        })
        .collect();
    json!({"points_sampled": points})
}

fn create_next_points_request(num_points: usize, dim: usize) -> Value {
    let bounds: Vec<Value> = (0..dim).map(|_| json!({"min": 0.0, "max": 1.0})).collect();
    json!({
        "num_to_sample": 4,
        "gp_historical_info": create_historical_info(num_points, dim),
        "domain_info": {"dim": dim, "domain_bounds": bounds},
        "optimizer_info": {
            "optimizer_type": "gradient_descent_optimizer",
            "num_multistarts": 50,
            "optimizer_parameters": {
                "max_num_steps": 100,
                "max_num_restarts": 2,
                "num_steps_averaged": 15,
                "gamma": 0.7,
                "pre_mult": 1.0,
                "max_relative_change": 0.7,
                "tolerance": 1.0e-5,
            },
        },
    })
}

fn bench_next_points_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_points_validation");

    for num_points in [10, 100, 1000].iter() {
        let payload = create_next_points_request(*num_points, 3);

        group.bench_with_input(BenchmarkId::new("validate", num_points), num_points, |b, _| {
            b.iter(|| validate::<GpNextPointsRequest>(black_box(payload.clone())))
        });
    }

    group.finish();
}

fn bench_validate_and_resolve(c: &mut Criterion) {
    let payload = create_next_points_request(100, 3);

    c.bench_function("validate_and_resolve_optimizer", |b| {
        b.iter(|| {
            let request = validate::<GpNextPointsRequest>(black_box(payload.clone())).ok()?;
            let objective = Objective::for_next_points(request.num_to_sample, &request.points_being_sampled);
            resolve_optimizer(&request.optimizer_info, objective).ok()
        })
    });
}

fn bench_rejection(c: &mut Criterion) {
    let mut payload = create_next_points_request(100, 3);
    payload["num_to_sample"] = json!(0);
    payload["unexpected"] = json!(true);

    c.bench_function("reject_invalid_next_points", |b| {
        b.iter(|| Endpoint::NextPointsEpi.normalize_request(black_box(payload.clone())))
    });
}

fn bench_response_normalization(c: &mut Criterion) {
    let n = 50;
    let mean: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let var: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.05 }).collect())
        .collect();
    let response = serde_json::to_value(GpMeanVarResponse::new("gp_mean_var", mean, var)).unwrap_or_default();

    c.bench_function("normalize_mean_var_response_50", |b| {
        b.iter(|| Endpoint::MeanVar.normalize_response(black_box(response.clone())))
    });
}

criterion_group!(
    benches,
    bench_next_points_validation,
    bench_validate_and_resolve,
    bench_rejection,
    bench_response_normalization
);

criterion_main!(benches);
