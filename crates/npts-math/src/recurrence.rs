// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Recurrence
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pivot recurrence of the constant-weight family.
//!
//! `beta[i]` is the reciprocal Thomas pivot of row i and `gam[i]` the
//! eliminated super-diagonal of row i-1:
//!
//!   beta[i] = 1 / (1 - w·beta[i-1]·w),   gam[i] = beta[i-1]·w
//!
//! seeded by `beta[0] = 1, gam[0] = 0` at the lowest global index.

use npts_types::constants::{BETA_SEED, GAM_SEED, OFF_DIAGONAL_WEIGHT};

/// Next `(beta, gam)` pair given the previous `beta`.
#[inline]
pub fn step(prev_beta: f64) -> (f64, f64) {
    let w = OFF_DIAGONAL_WEIGHT;
    (1.0 / (1.0 - w * prev_beta * w), prev_beta * w)
}

/// Seed entry 0 of a block: the global seed when `left` is `None`,
/// otherwise one step past the left neighbour's last `beta`.
pub fn seed(left: Option<f64>) -> (f64, f64) {
    match left {
        None => (BETA_SEED, GAM_SEED),
        Some(last_beta) => step(last_beta),
    }
}

/// Fill `beta[1..]`, `gam[1..]` from an already seeded entry 0.
pub fn extend(beta: &mut [f64], gam: &mut [f64]) {
    debug_assert_eq!(beta.len(), gam.len());
    for i in 1..beta.len() {
        let (b, g) = step(beta[i - 1]);
        beta[i] = b;
        gam[i] = g;
    }
}

/// Whole-system coefficients, computed on one thread.
pub fn global_beta_gam(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut beta = vec![0.0; n];
    let mut gam = vec![0.0; n];
    if n == 0 {
        return (beta, gam);
    }
    (beta[0], gam[0]) = seed(None);
    extend(&mut beta, &mut gam);
    (beta, gam)
}
