// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sequential Thomas algorithm and helpers for the constant-weight
//! tridiagonal family (unit diagonal, off-diagonals `w = 1/3`).
//!
//! The distributed solver is verified against these routines.

use npts_types::constants::OFF_DIAGONAL_WEIGHT;
use npts_types::error::{NptsError, NptsResult};

/// Solve tridiagonal system Ax = d using the Thomas algorithm.
///
/// - `a`: sub-diagonal \[n\] (a\[0\] unused)
/// - `b`: main diagonal \[n\]
/// - `c`: super-diagonal \[n\] (c\[n-1\] unused)
/// - `d`: right-hand side \[n\]
///
/// Returns: solution vector x \[n\]
///
/// Errors on empty input, band length mismatch, or a zero pivot.
pub fn thomas_solve(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> NptsResult<Vec<f64>> {
    let n = d.len();
    if n == 0 {
        return Err(NptsError::LinAlg("System size must be > 0".to_string()));
    }
    if a.len() != n || b.len() != n || c.len() != n {
        return Err(NptsError::LinAlg(format!(
            "Band lengths a={}, b={}, c={} do not match rhs length {n}",
            a.len(),
            b.len(),
            c.len()
        )));
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    // Forward sweep
    let pivot = check_pivot(b[0], 0)?;
    c_prime[0] = c[0] / pivot;
    d_prime[0] = d[0] / pivot;

    for i in 1..n {
        let den = check_pivot(b[i] - a[i] * c_prime[i - 1], i)?;
        if i < n - 1 {
            c_prime[i] = c[i] / den;
        }
        d_prime[i] = (d[i] - a[i] * d_prime[i - 1]) / den;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}

fn check_pivot(pivot: f64, index: usize) -> NptsResult<f64> {
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(NptsError::LinAlg(format!(
            "Zero or non-finite pivot {pivot} at row {index}"
        )));
    }
    Ok(pivot)
}

/// Bands `(a, b, c)` of the n×n constant-weight matrix.
pub fn constant_weight_bands(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let w = OFF_DIAGONAL_WEIGHT;
    let a = (0..n).map(|i| if i > 0 { w } else { 0.0 }).collect();
    let b = vec![1.0; n];
    let c = (0..n).map(|i| if i + 1 < n { w } else { 0.0 }).collect();
    (a, b, c)
}

/// Sequential reference solve of the constant-weight system.
pub fn solve_constant_weight(r: &[f64]) -> NptsResult<Vec<f64>> {
    let (a, b, c) = constant_weight_bands(r.len());
    thomas_solve(&a, &b, &c, r)
}

/// Matrix-vector product A·x for the constant-weight matrix.
pub fn apply_constant_weight(x: &[f64]) -> Vec<f64> {
    let w = OFF_DIAGONAL_WEIGHT;
    let n = x.len();
    (0..n)
        .map(|i| {
            let mut v = x[i];
            if i > 0 {
                v += w * x[i - 1];
            }
            if i + 1 < n {
                v += w * x[i + 1];
            }
            v
        })
        .collect()
}

/// max |A·x − r|.
pub fn residual_inf_norm(x: &[f64], r: &[f64]) -> NptsResult<f64> {
    if x.len() != r.len() {
        return Err(NptsError::LinAlg(format!(
            "residual shape mismatch: x={} r={}",
            x.len(),
            r.len()
        )));
    }
    Ok(apply_constant_weight(x)
        .iter()
        .zip(r)
        .map(|(ax, ri)| (ax - ri).abs())
        .fold(0.0f64, f64::max))
}

/// max |x − reference| / max(max |reference|, tiny).
pub fn relative_error(x: &[f64], reference: &[f64]) -> NptsResult<f64> {
    if x.len() != reference.len() {
        return Err(NptsError::LinAlg(format!(
            "relative_error shape mismatch: {} vs {}",
            x.len(),
            reference.len()
        )));
    }
    let scale = reference
        .iter()
        .map(|v| v.abs())
        .fold(0.0f64, f64::max)
        .max(f64::MIN_POSITIVE);
    let diff = x
        .iter()
        .zip(reference)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f64, f64::max);
    Ok(diff / scale)
}
