// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Reduced System
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Size-P reduced systems coupling rank blocks.
//!
//! Forward sweep: with `phi_lasts[k]`, `psi_lasts[k]` the last entries of
//! rank k's forward representation, the coupling scalar of rank k obeys
//!
//!   u_0 = u_first,   u_k = phi_lasts[k-1] + psi_lasts[k-1]·u_{k-1}
//!
//! Backward sweep: with `phi_firsts[k]`, `psi_firsts[k]` the first entries
//! of rank k's backward representation,
//!
//!   x_{P-1} = x_last,   x_k = phi_firsts[k+1] + psi_firsts[k+1]·x_{k+1}
//!
//! Every rank holds the full gathered vectors and evaluates only its own
//! scalar. The closed form unrolls the recurrence into a sum of products
//! (O(P²) per rank); the recurrence walk is O(P).

use npts_types::config::ReducedSystemStrategy;

/// Coupling scalar `u_tilda` of `rank` for the forward sweep.
///
/// Rank 0 gets `u_first` (empty sum, unit product).
///
/// Panics if `rank` is out of range or the vectors differ in length.
pub fn forward_coupling(
    rank: usize,
    phi_lasts: &[f64],
    psi_lasts: &[f64],
    u_first: f64,
    strategy: ReducedSystemStrategy,
) -> f64 {
    assert_eq!(phi_lasts.len(), psi_lasts.len());
    assert!(rank < phi_lasts.len(), "rank {rank} outside reduced system");
    match strategy {
        ReducedSystemStrategy::ClosedForm => {
            forward_closed_form(rank, phi_lasts, psi_lasts, u_first)
        }
        ReducedSystemStrategy::Recurrence => phi_lasts[..rank]
            .iter()
            .zip(&psi_lasts[..rank])
            .fold(u_first, |u, (phi, psi)| phi + psi * u),
    }
}

fn forward_closed_form(rank: usize, phi_lasts: &[f64], psi_lasts: &[f64], u_first: f64) -> f64 {
    let mut u_tilda = 0.0;
    let mut anchor_product = 1.0;
    for i in 0..rank {
        let tail: f64 = psi_lasts[i + 1..rank].iter().product();
        u_tilda += phi_lasts[i] * tail;
        anchor_product *= psi_lasts[i];
    }
    u_tilda + u_first * anchor_product
}

/// Coupling scalar `x_tilda` of `rank` for the backward sweep.
///
/// The last rank gets `x_last`.
///
/// Panics if `rank` is out of range or the vectors differ in length.
pub fn backward_coupling(
    rank: usize,
    phi_firsts: &[f64],
    psi_firsts: &[f64],
    x_last: f64,
    strategy: ReducedSystemStrategy,
) -> f64 {
    assert_eq!(phi_firsts.len(), psi_firsts.len());
    let nranks = phi_firsts.len();
    assert!(rank < nranks, "rank {rank} outside reduced system");
    match strategy {
        ReducedSystemStrategy::ClosedForm => {
            backward_closed_form(rank, phi_firsts, psi_firsts, x_last)
        }
        ReducedSystemStrategy::Recurrence => phi_firsts[rank + 1..]
            .iter()
            .zip(&psi_firsts[rank + 1..])
            .rev()
            .fold(x_last, |x, (phi, psi)| phi + psi * x),
    }
}

fn backward_closed_form(rank: usize, phi_firsts: &[f64], psi_firsts: &[f64], x_last: f64) -> f64 {
    let nranks = phi_firsts.len();
    if rank + 1 == nranks {
        return x_last;
    }
    let mut x_tilda = 0.0;
    for i in rank + 2..nranks {
        let head: f64 = psi_firsts[rank + 1..i].iter().product();
        x_tilda += phi_firsts[i] * head;
    }
    let anchor_product: f64 = psi_firsts[rank + 1..].iter().product();
    x_tilda + phi_firsts[rank + 1] + x_last * anchor_product
}
