// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Two-Sweep Distributed Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Non-periodic tridiagonal solve distributed over equal rank blocks.
//!
//! The matrix has unit diagonal and off-diagonals `w = 1/3`; `beta` and
//! `gam` come from [`crate::pipeline::precompute_beta_gam`]. Each call:
//!
//! 1. validates sizes (no buffer is written on failure),
//! 2. forward sweep: local elimination, all-gather of the last
//!    `(phi, psi)` per rank, broadcast of `u_first` from rank 0, coupling
//!    scalar `u_tilda`, then `u = phi + u_tilda·psi`,
//! 3. backward sweep: all-gather of first `gam` per rank, local
//!    substitution, all-gather of the first `(phi, psi)` per rank,
//!    broadcast of `x_last` from the last rank, coupling scalar
//!    `x_tilda`, then `x = phi + x_tilda·psi`.
//!
//! Every rank must issue the same collectives in the same order. The
//! reduced-system vectors are returned by the collectives and dropped at
//! the end of their sweep.

use npts_math::reduced::{backward_coupling, forward_coupling};
use npts_math::sweep::{backward_sweep, forward_sweep};
use npts_types::config::ReducedSystemStrategy;
use npts_types::error::{check_divisible, check_local_len, NptsResult};

use crate::comm::Communicator;

/// Per-call solver settings. Every rank of a group must pass the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverOptions {
    /// How the coupling scalars are resolved from the gathered vectors.
    pub reduced_system: ReducedSystemStrategy,
}

/// Solve this rank's block with the default options.
///
/// `x_local` is written only on success.
pub fn nonperiodic_tridiagonal_solver<C: Communicator + ?Sized>(
    comm: &C,
    beta_local: &[f64],
    gam_local: &[f64],
    r_local: &[f64],
    system_size: usize,
    x_local: &mut [f64],
) -> NptsResult<()> {
    nonperiodic_tridiagonal_solver_with(
        comm,
        beta_local,
        gam_local,
        r_local,
        system_size,
        x_local,
        &SolverOptions::default(),
    )
}

/// Solve this rank's block with explicit [`SolverOptions`].
///
/// Validation errors are returned before any collective; a peer failure
/// during the sweeps surfaces as `NptsError::Communication`. `x_local`
/// is written only on success.
#[allow(clippy::too_many_arguments)]
pub fn nonperiodic_tridiagonal_solver_with<C: Communicator + ?Sized>(
    comm: &C,
    beta_local: &[f64],
    gam_local: &[f64],
    r_local: &[f64],
    system_size: usize,
    x_local: &mut [f64],
    options: &SolverOptions,
) -> NptsResult<()> {
    let rank = comm.rank();
    let nranks = comm.size();

    let local_size = match check_divisible(system_size, nranks) {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(rank, system_size, nranks, "{e}");
            return Err(e);
        }
    };
    check_local_len("beta_local", beta_local.len(), local_size)?;
    check_local_len("gam_local", gam_local.len(), local_size)?;
    check_local_len("r_local", r_local.len(), local_size)?;
    check_local_len("x_local", x_local.len(), local_size)?;

    let _span =
        tracing::debug_span!("nonperiodic_tridiagonal_solver", rank, nranks, local_size).entered();
    let strategy = options.reduced_system;
    let is_first = rank == 0;
    let is_last = rank + 1 == nranks;
    let last = local_size - 1;

    // ── L-R sweep ──
    let forward = forward_sweep(beta_local, r_local, is_first);

    let (phi_last, psi_last) = forward.last();
    let phi_lasts = comm.all_gather(phi_last)?;
    let psi_lasts = comm.all_gather(psi_last)?;
    let u_first = comm.broadcast(
        if is_first {
            beta_local[0] * r_local[0]
        } else {
            0.0
        },
        0,
    )?;

    let u_tilda = forward_coupling(rank, &phi_lasts, &psi_lasts, u_first, strategy);
    let u_local = forward.combine(u_tilda);
    tracing::debug!(u_first, u_tilda, "forward sweep resolved");

    // ── R-L sweep ──
    let gam_firsts = comm.all_gather(gam_local[0])?;
    let right_gam = (!is_last).then(|| gam_firsts[rank + 1]);
    let backward = backward_sweep(gam_local, &u_local, right_gam);

    let (phi_first, psi_first) = backward.first();
    let phi_firsts = comm.all_gather(phi_first)?;
    let psi_firsts = comm.all_gather(psi_first)?;
    let x_last = comm.broadcast(if is_last { u_local[last] } else { 0.0 }, nranks - 1)?;

    let x_tilda = backward_coupling(rank, &phi_firsts, &psi_firsts, x_last, strategy);
    let solution = backward.combine(x_tilda);
    tracing::debug!(x_last, x_tilda, "backward sweep resolved");

    x_local.copy_from_slice(&solution);
    Ok(())
}
