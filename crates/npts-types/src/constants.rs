// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Sub/super-diagonal weight of the matrix family (unit diagonal).
/// Fixed for this solver variant; not a runtime parameter.
pub const OFF_DIAGONAL_WEIGHT: f64 = 1.0 / 3.0;

/// First `beta` of the global recurrence (lowest index).
pub const BETA_SEED: f64 = 1.0;

/// First `gam` of the global recurrence (lowest index).
pub const GAM_SEED: f64 = 0.0;

/// Largest thread-backed rank group. Setup cost grows with the square
/// of the group size, and each rank holds one OS thread.
pub const MAX_WORKERS: usize = 1024;

/// Default relative error accepted when verifying against the sequential solve.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;
