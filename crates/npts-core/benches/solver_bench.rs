use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use npts_core::driver::{distributed_solve, DistributedSolveConfig};
use npts_math::tridiag::solve_constant_weight;
use npts_types::config::ReducedSystemStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const N: usize = 1 << 16;

fn rhs() -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    Array1::from_iter((0..N).map(|_| rng.gen_range(-1.0..1.0)))
}

fn bench_sequential(c: &mut Criterion) {
    let r = rhs().to_vec();
    c.bench_function("thomas_sequential_65536", |b| {
        b.iter(|| black_box(solve_constant_weight(&r)))
    });
}

fn bench_distributed(c: &mut Criterion) {
    let r = rhs();
    let mut group = c.benchmark_group("distributed_solve_65536");
    group.sample_size(20);
    for workers in [1usize, 2, 4, 8] {
        let cfg = DistributedSolveConfig {
            workers,
            reduced_system: ReducedSystemStrategy::ClosedForm,
        };
        group.bench_with_input(BenchmarkId::from_parameter(workers), &cfg, |b, cfg| {
            b.iter(|| black_box(distributed_solve(&r, cfg)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sequential, bench_distributed);
criterion_main!(benches);
