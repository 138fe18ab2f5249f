// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Local Sweeps
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-rank local elimination sweeps.
//!
//! Each sweep expresses every owned unknown as `phi[i] + t·psi[i]` for
//! a single coupling scalar `t` that is not known until the reduced
//! system across ranks has been resolved. Sweeps need no communication.

use npts_types::constants::OFF_DIAGONAL_WEIGHT;

/// Affine representation `value[i] = phi[i] + coupling·psi[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineSweep {
    pub phi: Vec<f64>,
    pub psi: Vec<f64>,
}

impl AffineSweep {
    fn zeros(n: usize) -> Self {
        Self {
            phi: vec![0.0; n],
            psi: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }

    /// `(phi, psi)` of the lowest owned index.
    pub fn first(&self) -> (f64, f64) {
        (self.phi[0], self.psi[0])
    }

    /// `(phi, psi)` of the highest owned index.
    pub fn last(&self) -> (f64, f64) {
        let n = self.len();
        (self.phi[n - 1], self.psi[n - 1])
    }

    /// Evaluate the representation once the coupling scalar is known.
    pub fn combine(&self, coupling: f64) -> Vec<f64> {
        self.phi
            .iter()
            .zip(&self.psi)
            .map(|(phi, psi)| phi + coupling * psi)
            .collect()
    }
}

/// Forward (left-to-right) elimination over one block.
///
/// `at_left_edge` marks the block holding global index 0: it seeds
/// `phi = 0, psi = 1`, so its coupling scalar is the eliminated value
/// of index 0 itself. Other blocks couple to the last eliminated value
/// of their left neighbour.
///
/// Panics if `beta` is empty or `beta`/`r` lengths differ.
pub fn forward_sweep(beta: &[f64], r: &[f64], at_left_edge: bool) -> AffineSweep {
    assert!(!beta.is_empty(), "forward sweep needs a non-empty block");
    assert_eq!(beta.len(), r.len());
    let w = OFF_DIAGONAL_WEIGHT;
    let n = beta.len();
    let mut sweep = AffineSweep::zeros(n);

    if at_left_edge {
        sweep.phi[0] = 0.0;
        sweep.psi[0] = 1.0;
    } else {
        sweep.phi[0] = beta[0] * r[0];
        sweep.psi[0] = -w * beta[0];
    }

    for i in 1..n {
        sweep.phi[i] = beta[i] * (r[i] - w * sweep.phi[i - 1]);
        sweep.psi[i] = -w * beta[i] * sweep.psi[i - 1];
    }
    sweep
}

/// Backward (right-to-left) substitution over one block.
///
/// `u` is the forward-eliminated right-hand side of the block. `right_gam`
/// is the first `gam` of the right neighbour, `None` for the block that
/// holds the last global index: that block seeds `phi = 0, psi = 1`.
///
/// Panics if `gam` is empty or `gam`/`u` lengths differ.
pub fn backward_sweep(gam: &[f64], u: &[f64], right_gam: Option<f64>) -> AffineSweep {
    assert!(!gam.is_empty(), "backward sweep needs a non-empty block");
    assert_eq!(gam.len(), u.len());
    let n = gam.len();
    let last = n - 1;
    let mut sweep = AffineSweep::zeros(n);

    match right_gam {
        None => {
            sweep.phi[last] = 0.0;
            sweep.psi[last] = 1.0;
        }
        Some(g) => {
            sweep.phi[last] = u[last];
            sweep.psi[last] = -g;
        }
    }

    for i in (0..last).rev() {
        sweep.phi[i] = u[i] - gam[i + 1] * sweep.phi[i + 1];
        sweep.psi[i] = -gam[i + 1] * sweep.psi[i + 1];
    }
    sweep
}
