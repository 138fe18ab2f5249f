// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Run Orchestration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Turn a [`RunConfig`] into a solve and a printable report.

use std::path::Path;

use anyhow::{bail, Context};
use ndarray::Array1;
use npts_core::driver::{auto_worker_count, distributed_solve, DistributedSolveConfig};
use npts_math::tridiag::{relative_error, solve_constant_weight};
use npts_types::config::{ReducedSystemStrategy, RhsSpec, RunConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Number of leading/trailing entries shown in the text report.
const PREVIEW: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub system_size: usize,
    pub workers: usize,
    pub reduced_system: ReducedSystemStrategy,
    pub residual_inf: f64,
    /// Relative error against the sequential solve, when verified.
    pub relative_error: Option<f64>,
    pub pipeline_seconds: f64,
    pub solve_seconds: f64,
    pub x: Vec<f64>,
}

pub fn build_rhs(cfg: &RunConfig) -> Array1<f64> {
    match &cfg.rhs {
        RhsSpec::Constant { constant } => Array1::from_elem(cfg.system_size, *constant),
        RhsSpec::Random { seed } => {
            let mut rng = StdRng::seed_from_u64(*seed);
            Array1::from_iter((0..cfg.system_size).map(|_| rng.gen_range(-1.0..1.0)))
        }
        RhsSpec::Values { values } => Array1::from(values.clone()),
    }
}

pub fn run(cfg: &RunConfig) -> anyhow::Result<RunReport> {
    cfg.validate()?;
    let r = build_rhs(cfg);
    let workers = cfg
        .workers
        .unwrap_or_else(|| auto_worker_count(cfg.system_size));
    tracing::info!(
        system_size = cfg.system_size,
        workers,
        strategy = ?cfg.reduced_system,
        "starting run"
    );

    let solve_cfg = DistributedSolveConfig {
        workers,
        reduced_system: cfg.reduced_system,
    };
    let result = distributed_solve(&r, &solve_cfg).context("distributed solve failed")?;
    let x = result.x.to_vec();

    let relative_error = if cfg.verify {
        let reference = solve_constant_weight(&r.to_vec())?;
        let err = relative_error(&x, &reference)?;
        tracing::info!(relative_error = err, "verified against sequential solve");
        Some(err)
    } else {
        None
    };

    Ok(RunReport {
        system_size: cfg.system_size,
        workers: result.workers,
        reduced_system: cfg.reduced_system,
        residual_inf: result.residual,
        relative_error,
        pipeline_seconds: result.timings.pipeline.as_secs_f64(),
        solve_seconds: result.timings.solve.as_secs_f64(),
        x,
    })
}

/// Fail when verification ran and exceeded `tolerance`.
pub fn check_verification(report: &RunReport, tolerance: f64) -> anyhow::Result<()> {
    match report.relative_error {
        Some(err) if err > tolerance => {
            bail!("verification failed: relative error {err:.3e} > tolerance {tolerance:.3e}")
        }
        _ => Ok(()),
    }
}

/// Width of the padded label column in the text report.
const LABEL_WIDTH: usize = 17;

fn report_lines(report: &RunReport, config: &Path) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Configuration:", config.display().to_string()),
        ("System size:", report.system_size.to_string()),
        ("Workers:", report.workers.to_string()),
        ("Reduced system:", format!("{:?}", report.reduced_system)),
        ("Pipeline:", format!("{:.6} s", report.pipeline_seconds)),
        ("Solve:", format!("{:.6} s", report.solve_seconds)),
        ("Residual (inf):", format!("{:.3e}", report.residual_inf)),
    ];
    if let Some(err) = report.relative_error {
        lines.push(("Relative error:", format!("{err:.3e}")));
    }
    lines
}

pub fn print_report(report: &RunReport, config: &Path) {
    println!("NPTS Distributed Tridiagonal Solve");
    println!("==================================");
    for (label, value) in report_lines(report, config) {
        println!("{label:<LABEL_WIDTH$}{value}");
    }
    let n = report.x.len();
    if n <= 2 * PREVIEW {
        println!("x = {:?}", report.x);
    } else {
        println!(
            "x = {:?} ... {:?}",
            &report.x[..PREVIEW],
            &report.x[n - PREVIEW..]
        );
    }
}
