// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Block Domain Decomposition
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Equal contiguous block ownership of a 1D unknown vector.
//!
//! Rank 0 owns the lowest indices. Blocks never overlap: the solver
//! couples neighbours through the reduced system, not through halos.

use ndarray::{s, Array1};
use npts_types::error::{check_divisible, NptsError, NptsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSlice {
    pub rank: usize,
    pub nranks: usize,
    pub global_n: usize,
    pub local_n: usize,
    pub start: usize,
    pub end: usize,
}

impl BlockSlice {
    pub fn has_left_neighbor(&self) -> bool {
        self.rank > 0
    }

    pub fn has_right_neighbor(&self) -> bool {
        self.rank + 1 < self.nranks
    }
}

/// Split `global_n` unknowns into `nranks` equal blocks.
pub fn decompose_blocks(global_n: usize, nranks: usize) -> NptsResult<Vec<BlockSlice>> {
    let local_n = check_divisible(global_n, nranks)?;
    Ok((0..nranks)
        .map(|rank| BlockSlice {
            rank,
            nranks,
            global_n,
            local_n,
            start: rank * local_n,
            end: (rank + 1) * local_n,
        })
        .collect())
}

pub fn split_blocks(global: &Array1<f64>, slices: &[BlockSlice]) -> NptsResult<Vec<Array1<f64>>> {
    if slices.is_empty() {
        return Err(NptsError::ConfigError(
            "No slices provided for split_blocks".to_string(),
        ));
    }
    slices
        .iter()
        .map(|sdef| {
            if sdef.global_n != global.len() {
                return Err(NptsError::ConfigError(format!(
                    "Slice/global mismatch: slice.global_n={} global.len()={}",
                    sdef.global_n,
                    global.len()
                )));
            }
            Ok(global.slice(s![sdef.start..sdef.end]).to_owned())
        })
        .collect()
}

pub fn stitch_blocks(locals: &[Array1<f64>], slices: &[BlockSlice]) -> NptsResult<Array1<f64>> {
    if locals.len() != slices.len() {
        return Err(NptsError::ConfigError(format!(
            "locals/slices mismatch: {} vs {}",
            locals.len(),
            slices.len()
        )));
    }
    let global_n = slices
        .last()
        .map(|s| s.global_n)
        .ok_or_else(|| NptsError::ConfigError("No slices provided".to_string()))?;
    let mut global = Array1::zeros(global_n);
    for (local, sdef) in locals.iter().zip(slices) {
        if local.len() != sdef.local_n {
            return Err(NptsError::LocalSizeMismatch {
                name: "stitched block",
                expected: sdef.local_n,
                actual: local.len(),
            });
        }
        global.slice_mut(s![sdef.start..sdef.end]).assign(local);
    }
    Ok(global)
}

/// Largest divisor of `n` that does not exceed `cap` (at least 1).
pub fn largest_divisor_at_most(n: usize, cap: usize) -> usize {
    (1..=cap.max(1).min(n.max(1)))
        .rev()
        .find(|d| n % d == 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_blocks_covers_domain() {
        let slices = decompose_blocks(12, 3).unwrap();
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start, 0);
        assert_eq!(slices[2].end, 12);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(!slices[0].has_left_neighbor());
        assert!(slices[0].has_right_neighbor());
        assert!(!slices[2].has_right_neighbor());
    }

    #[test]
    fn test_decompose_rejects_uneven_split() {
        assert!(matches!(
            decompose_blocks(10, 4),
            Err(NptsError::NotDivisible { .. })
        ));
        assert!(decompose_blocks(8, 0).is_err());
    }

    #[test]
    fn test_split_and_stitch_roundtrip() {
        let global = Array1::from_iter((0..8).map(|i| i as f64));
        let slices = decompose_blocks(8, 4).unwrap();
        let locals = split_blocks(&global, &slices).unwrap();
        assert_eq!(locals[1].to_vec(), vec![2.0, 3.0]);
        let stitched = stitch_blocks(&locals, &slices).unwrap();
        assert_eq!(stitched, global);
    }

    #[test]
    fn test_stitch_guards() {
        let slices = decompose_blocks(4, 2).unwrap();
        let short = vec![Array1::zeros(2)];
        assert!(stitch_blocks(&short, &slices).is_err());
        let wrong_len = vec![Array1::zeros(2), Array1::zeros(3)];
        assert!(matches!(
            stitch_blocks(&wrong_len, &slices),
            Err(NptsError::LocalSizeMismatch { .. })
        ));
        let other = Array1::zeros(6);
        assert!(split_blocks(&other, &slices).is_err());
    }

    #[test]
    fn test_largest_divisor_at_most() {
        assert_eq!(largest_divisor_at_most(1024, 12), 8);
        assert_eq!(largest_divisor_at_most(12, 12), 12);
        assert_eq!(largest_divisor_at_most(7, 4), 1);
        assert_eq!(largest_divisor_at_most(5, 0), 1);
        assert_eq!(largest_divisor_at_most(3, 16), 3);
    }
}
