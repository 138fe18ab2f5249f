// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Thread-Group Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! End-to-end distributed solve on a thread-backed rank group.
//!
//! The driver owns everything the rank-local entry points leave to the
//! caller: it builds the group, splits `r` into rank blocks, runs the
//! coefficient pipeline and the two-sweep solver on one scoped thread
//! per rank, and stitches the blocks of `x` back together. Replacing
//! [`ThreadComm`] with an rsmpi communicator leaves the per-rank code
//! unchanged.

use std::thread;
use std::time::{Duration, Instant};

use ndarray::Array1;
use npts_math::tridiag::residual_inf_norm;
use npts_types::config::ReducedSystemStrategy;
use npts_types::constants::MAX_WORKERS;
use npts_types::error::{check_worker_count, NptsError, NptsResult};

use crate::comm::{Communicator, ThreadComm};
use crate::domain::{decompose_blocks, largest_divisor_at_most, split_blocks, stitch_blocks};
use crate::pipeline::precompute_beta_gam;
use crate::solver::{nonperiodic_tridiagonal_solver_with, SolverOptions};

/// Configuration for the thread-group solve.
#[derive(Debug, Clone)]
pub struct DistributedSolveConfig {
    /// Number of ranks. Must divide the system size.
    pub workers: usize,
    pub reduced_system: ReducedSystemStrategy,
}

impl Default for DistributedSolveConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            reduced_system: ReducedSystemStrategy::ClosedForm,
        }
    }
}

/// Wall-clock time per phase, maximum over ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimings {
    pub pipeline: Duration,
    pub solve: Duration,
}

impl PhaseTimings {
    fn max(self, other: Self) -> Self {
        Self {
            pipeline: self.pipeline.max(other.pipeline),
            solve: self.solve.max(other.solve),
        }
    }
}

/// Result of a distributed solve.
#[derive(Debug, Clone)]
pub struct DistributedSolveResult {
    /// Global solution vector.
    pub x: Array1<f64>,
    /// Number of ranks used.
    pub workers: usize,
    /// max |A·x − r|.
    pub residual: f64,
    pub timings: PhaseTimings,
}

struct RankOutput {
    x_local: Vec<f64>,
    timings: PhaseTimings,
}

fn run_rank<C: Communicator + ?Sized>(
    comm: &C,
    system_size: usize,
    r_local: &[f64],
    options: &SolverOptions,
) -> NptsResult<RankOutput> {
    let local_size = r_local.len();
    let mut beta = vec![0.0; local_size];
    let mut gam = vec![0.0; local_size];
    let mut x_local = vec![0.0; local_size];

    comm.barrier()?;
    let t0 = Instant::now();
    precompute_beta_gam(comm, system_size, &mut beta, &mut gam)?;
    comm.barrier()?;
    let t1 = Instant::now();
    nonperiodic_tridiagonal_solver_with(comm, &beta, &gam, r_local, system_size, &mut x_local, options)?;
    let t2 = Instant::now();

    Ok(RankOutput {
        x_local,
        timings: PhaseTimings {
            pipeline: t1 - t0,
            solve: t2 - t1,
        },
    })
}

/// Solve `A·x = r` with `cfg.workers` ranks, one OS thread each.
///
/// When several ranks fail, the reported error is the first one in rank
/// order that is not a communication failure (those are usually peers
/// noticing the original failure), falling back to the first error.
pub fn distributed_solve(
    r: &Array1<f64>,
    cfg: &DistributedSolveConfig,
) -> NptsResult<DistributedSolveResult> {
    let system_size = r.len();
    if r.iter().any(|v| !v.is_finite()) {
        return Err(NptsError::NonFinite(
            "right-hand side contains non-finite values".to_string(),
        ));
    }
    check_worker_count(cfg.workers)?;
    let slices = decompose_blocks(system_size, cfg.workers)?;
    let r_blocks = split_blocks(r, &slices)?;
    let comms = ThreadComm::group(cfg.workers)?;
    let options = SolverOptions {
        reduced_system: cfg.reduced_system,
    };

    let span = tracing::info_span!("distributed_solve", system_size, workers = cfg.workers);
    let _guard = span.enter();

    let outcomes: Vec<NptsResult<RankOutput>> = thread::scope(|scope| {
        let handles: Vec<_> = comms
            .into_iter()
            .zip(&r_blocks)
            .map(|(comm, r_block)| {
                let span = span.clone();
                scope.spawn(move || {
                    let _guard = span.enter();
                    let r_local = r_block.to_vec();
                    run_rank(&comm, system_size, &r_local, &options)
                })
            })
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(NptsError::WorkerPanicked { rank }))
            })
            .collect()
    });

    let mut blocks = Vec::with_capacity(cfg.workers);
    let mut timings = PhaseTimings::default();
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(out) => {
                timings = timings.max(out.timings);
                blocks.push(Array1::from(out.x_local));
            }
            Err(e) => errors.push(e),
        }
    }
    if let Some(err) = errors
        .into_iter()
        .min_by_key(|e| matches!(e, NptsError::Communication { .. }))
    {
        tracing::error!(%err, "distributed solve failed");
        return Err(err);
    }

    let x = stitch_blocks(&blocks, &slices)?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(NptsError::NonFinite(
            "distributed solve produced non-finite x".to_string(),
        ));
    }
    let residual = residual_inf_norm(&x.to_vec(), &r.to_vec())?;
    tracing::info!(
        residual,
        pipeline_us = timings.pipeline.as_micros() as u64,
        solve_us = timings.solve.as_micros() as u64,
        "distributed solve complete"
    );

    Ok(DistributedSolveResult {
        x,
        workers: cfg.workers,
        residual,
        timings,
    })
}

/// Worker count used by [`auto_distributed_solve`]: the largest divisor
/// of `system_size` not exceeding the Rayon thread count (and
/// [`MAX_WORKERS`]).
pub fn auto_worker_count(system_size: usize) -> usize {
    let nthreads = rayon::current_num_threads().clamp(1, MAX_WORKERS);
    largest_divisor_at_most(system_size, nthreads)
}

/// Convenience: solve with an automatically chosen worker count.
pub fn auto_distributed_solve(
    r: &Array1<f64>,
    reduced_system: ReducedSystemStrategy,
) -> NptsResult<DistributedSolveResult> {
    let cfg = DistributedSolveConfig {
        workers: auto_worker_count(r.len()),
        reduced_system,
    };
    distributed_solve(r, &cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use npts_math::tridiag::solve_constant_weight;

    #[test]
    fn test_distributed_solve_smoke() {
        let r = Array1::from_iter((0..64).map(|i| (i as f64 * 0.2).sin()));
        let cfg = DistributedSolveConfig {
            workers: 8,
            ..Default::default()
        };
        let result = distributed_solve(&r, &cfg).expect("distributed solve");
        assert_eq!(result.workers, 8);
        assert_eq!(result.x.len(), 64);
        assert!(result.residual < 1e-12, "residual {}", result.residual);

        let reference = solve_constant_weight(&r.to_vec()).unwrap();
        for (i, (xi, ri)) in result.x.iter().zip(&reference).enumerate() {
            assert!((xi - ri).abs() < 1e-12, "x[{i}] = {xi}, reference {ri}");
        }
    }

    #[test]
    fn test_distributed_solve_rejects_indivisible() {
        let r = Array1::from_elem(10, 1.0);
        let cfg = DistributedSolveConfig {
            workers: 4,
            ..Default::default()
        };
        assert!(matches!(
            distributed_solve(&r, &cfg),
            Err(NptsError::NotDivisible {
                system_size: 10,
                workers: 4
            })
        ));
    }

    #[test]
    fn test_distributed_solve_rejects_oversize_group() {
        // Divisible, so only the worker cap stops it before any setup.
        let n = 2 * MAX_WORKERS * 4;
        let r = Array1::from_elem(n, 1.0);
        let cfg = DistributedSolveConfig {
            workers: 2 * MAX_WORKERS,
            ..Default::default()
        };
        assert!(matches!(
            distributed_solve(&r, &cfg),
            Err(NptsError::ConfigError(_))
        ));
    }

    #[test]
    fn test_distributed_solve_rejects_non_finite_rhs() {
        let mut r = Array1::from_elem(4, 1.0);
        r[2] = f64::NAN;
        let cfg = DistributedSolveConfig {
            workers: 2,
            ..Default::default()
        };
        assert!(matches!(
            distributed_solve(&r, &cfg),
            Err(NptsError::NonFinite(_))
        ));
    }

    #[test]
    fn test_auto_worker_count_divides() {
        for n in [1usize, 7, 12, 1024, 4096] {
            let p = auto_worker_count(n);
            assert!(p >= 1);
            assert_eq!(n % p, 0);
            assert!(p <= rayon::current_num_threads().max(1));
        }
    }

    #[test]
    fn test_auto_distributed_solve() {
        let r = Array1::from_elem(48, 1.0);
        let result = auto_distributed_solve(&r, ReducedSystemStrategy::Recurrence).unwrap();
        assert_eq!(48 % result.workers, 0);
        assert!(result.residual < 1e-12);
    }
}
