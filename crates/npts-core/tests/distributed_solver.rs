// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Distributed Solver Integration Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rank-group tests of the pipeline + two-sweep solver.
//!
//! Covers: the four-unknown example, partition invariance, agreement
//! with the sequential Thomas solve, divisibility rejection across a
//! whole group, and both reduced-system strategies.

use ndarray::Array1;
use npts_core::comm::ThreadComm;
use npts_core::driver::{distributed_solve, DistributedSolveConfig};
use npts_core::pipeline::precompute_beta_gam;
use npts_core::solver::nonperiodic_tridiagonal_solver;
use npts_math::tridiag::{relative_error, solve_constant_weight};
use npts_types::config::ReducedSystemStrategy;
use npts_types::error::NptsError;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;

const SENTINEL: f64 = 987.0;

fn solve_with(r: &[f64], workers: usize, strategy: ReducedSystemStrategy) -> Vec<f64> {
    let cfg = DistributedSolveConfig {
        workers,
        reduced_system: strategy,
    };
    distributed_solve(&Array1::from(r.to_vec()), &cfg)
        .expect("distributed solve")
        .x
        .to_vec()
}

fn random_rhs(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

#[test]
fn four_unknowns_match_closed_form_for_every_partition() {
    // [1 w 0 0; w 1 w 0; 0 w 1 w; 0 0 w 1]·x = [1 1 1 1], w = 1/3
    let expected = [9.0 / 11.0, 6.0 / 11.0, 6.0 / 11.0, 9.0 / 11.0];
    for workers in [1, 2, 4] {
        let x = solve_with(&[1.0; 4], workers, ReducedSystemStrategy::ClosedForm);
        for i in 0..4 {
            assert!(
                (x[i] - expected[i]).abs() < 1e-14,
                "P={workers}: x[{i}] = {}, expected {}",
                x[i],
                expected[i]
            );
        }
    }
}

#[test]
fn partition_invariance_over_all_divisors() {
    let n = 48;
    let r = random_rhs(n, 11);
    let baseline = solve_with(&r, 1, ReducedSystemStrategy::ClosedForm);
    for workers in [2, 3, 4, 6, 8, 12, 16, 24, 48] {
        let x = solve_with(&r, workers, ReducedSystemStrategy::ClosedForm);
        let err = relative_error(&x, &baseline).unwrap();
        assert!(err < 1e-12, "P={workers}: relative error {err}");
    }
}

#[test]
fn strategies_agree_on_large_group() {
    let r = random_rhs(512, 5);
    let closed = solve_with(&r, 32, ReducedSystemStrategy::ClosedForm);
    let walk = solve_with(&r, 32, ReducedSystemStrategy::Recurrence);
    assert!(relative_error(&closed, &walk).unwrap() < 1e-13);
}

#[test]
fn indivisible_size_rejected_on_every_rank_with_output_untouched() {
    let nranks = 4;
    let system_size = 10;
    let local = 3;
    let comms = ThreadComm::group(nranks).unwrap();
    let outcomes: Vec<(Result<(), NptsError>, Vec<f64>)> = thread::scope(|s| {
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                s.spawn(move || {
                    let beta = vec![1.0; local];
                    let gam = vec![0.0; local];
                    let r = vec![1.0; local];
                    let mut x = vec![SENTINEL; local];
                    let res =
                        nonperiodic_tridiagonal_solver(&comm, &beta, &gam, &r, system_size, &mut x);
                    (res, x)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (rank, (res, x)) in outcomes.into_iter().enumerate() {
        assert!(
            matches!(res, Err(NptsError::NotDivisible { .. })),
            "rank {rank}: {res:?}"
        );
        assert!(x.iter().all(|&v| v == SENTINEL), "rank {rank} wrote x");
    }
}

#[test]
fn rank_local_entry_points_on_thread_group() {
    // Drive the two public rank-local calls directly, the way an MPI
    // caller would, without the driver.
    let nranks = 3;
    let local = 7;
    let n = nranks * local;
    let r = random_rhs(n, 99);
    let comms = ThreadComm::group(nranks).unwrap();
    let r_ref = &r;
    let blocks: Vec<Vec<f64>> = thread::scope(|s| {
        let handles: Vec<_> = comms
            .into_iter()
            .enumerate()
            .map(|(rank, comm)| {
                s.spawn(move || {
                    let mut beta = vec![0.0; local];
                    let mut gam = vec![0.0; local];
                    precompute_beta_gam(&comm, n, &mut beta, &mut gam).unwrap();
                    let r_local = &r_ref[rank * local..(rank + 1) * local];
                    let mut x = vec![0.0; local];
                    nonperiodic_tridiagonal_solver(&comm, &beta, &gam, r_local, n, &mut x).unwrap();
                    x
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let x: Vec<f64> = blocks.concat();
    let reference = solve_constant_weight(&r).unwrap();
    assert!(relative_error(&x, &reference).unwrap() < 1e-12);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Any equal-block partition reproduces the sequential Thomas solve.
    #[test]
    fn matches_sequential_thomas(
        local in 1usize..40,
        workers in 1usize..10,
        seed in any::<u64>(),
        recurrence in any::<bool>(),
    ) {
        let n = local * workers;
        let r = random_rhs(n, seed);
        let strategy = if recurrence {
            ReducedSystemStrategy::Recurrence
        } else {
            ReducedSystemStrategy::ClosedForm
        };
        let x = solve_with(&r, workers, strategy);
        let reference = solve_constant_weight(&r).unwrap();
        let err = relative_error(&x, &reference).unwrap();
        prop_assert!(err < 1e-10, "n={} P={} relative error {}", n, workers, err);
    }
}
