//! Benchmarks for the policy evaluation hot path.
//!
//! Run with: cargo bench
//!
//! To compare against baseline:
//! 1. First run: cargo bench -- --save-baseline main
//! 2. After changes: cargo bench -- --baseline main

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sim_policy::{
    ControlModel, Policy, REPRESENTATION_KEY, Representation, SPLINE_POINTS_KEY, SplinePolicy,
    TaskConfig,
};

/// Builds a policy with `n` knots on a uniform time grid.
fn make_policy(model: &ControlModel, representation: Representation, n: usize) -> SplinePolicy {
    let task = TaskConfig::new()
        .with(SPLINE_POINTS_KEY, n as f64)
        .with(REPRESENTATION_KEY, f64::from(representation.code()));
    let mut policy = SplinePolicy::allocate(model, &task, n).expect("allocate");
    policy.reset(n);

    let nu = model.nu();
    let values: Vec<f64> = (0..n * nu).map(|i| (i as f64 * 0.7).sin()).collect();
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
    policy.copy_parameters_from(&values, &times);
    policy
}

fn bench_action(c: &mut Criterion) {
    let model =
        ControlModel::with_uniform_range("bench", 8, 32, (-1.0, 1.0)).expect("model");
    let mut group = c.benchmark_group("action");

    for n in [8, 64, 512] {
        for rep in [
            Representation::ZeroOrderHold,
            Representation::Linear,
            Representation::Cubic,
        ] {
            let policy = make_policy(&model, rep, n);
            let span = (n - 1) as f64 * 0.1;
            let mut out = vec![0.0; model.nu()];

            group.bench_with_input(
                BenchmarkId::new(format!("{rep:?}"), n),
                &policy,
                |b, policy| {
                    let mut t = 0.0;
                    b.iter(|| {
                        // Sweep query times like a control loop would.
                        t = (t + 0.003) % span;
                        policy.action(&model, black_box(&mut out), None, black_box(t));
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_copy_from(c: &mut Criterion) {
    let model =
        ControlModel::with_uniform_range("bench", 8, 32, (-1.0, 1.0)).expect("model");
    let src = make_policy(&model, Representation::Linear, 512);
    let mut dst =
        SplinePolicy::allocate(&model, &TaskConfig::new(), 512).expect("allocate");

    c.bench_function("copy_from_512", |b| {
        b.iter(|| {
            dst.copy_from(black_box(&src), 512);
        });
    });
}

criterion_group!(benches, bench_action, bench_copy_from);
criterion_main!(benches);
