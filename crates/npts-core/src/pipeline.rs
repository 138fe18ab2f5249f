// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Coefficient Pipeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Systolic computation of the `beta`/`gam` coefficients.
//!
//! `beta[i]` depends on `beta[i-1]` across the whole system, so ranks run
//! strictly in order: each blocks until its left neighbour hands over its
//! last `beta`, extends the recurrence over its own block, and hands its
//! own last `beta` to the right. Latency grows linearly with the rank
//! count; the work per rank is O(local_size).

use npts_math::recurrence;
use npts_types::error::{check_divisible, check_local_len, NptsResult};

use crate::comm::{Communicator, MessageTag};

/// One rank's position in the hand-off chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStage {
    /// Rank we receive the boundary `beta` from, if any.
    pub upstream: Option<usize>,
    /// Rank we pass our last `beta` to, if any.
    pub downstream: Option<usize>,
}

impl PipelineStage {
    pub fn for_rank(rank: usize, nranks: usize) -> Self {
        Self {
            upstream: rank.checked_sub(1),
            downstream: (rank + 1 < nranks).then_some(rank + 1),
        }
    }

    fn receive<C: Communicator + ?Sized>(&self, comm: &C) -> NptsResult<Option<f64>> {
        self.upstream
            .map(|left| comm.recv(left, MessageTag::BoundaryBeta))
            .transpose()
    }

    fn forward<C: Communicator + ?Sized>(&self, comm: &C, last_beta: f64) -> NptsResult<()> {
        match self.downstream {
            Some(right) => comm.send(right, MessageTag::BoundaryBeta, last_beta),
            None => Ok(()),
        }
    }
}

/// Fill this rank's `beta_local`/`gam_local` block.
///
/// Both buffers must hold `system_size / comm.size()` entries. On error
/// the buffers may be partially written.
pub fn precompute_beta_gam<C: Communicator + ?Sized>(
    comm: &C,
    system_size: usize,
    beta_local: &mut [f64],
    gam_local: &mut [f64],
) -> NptsResult<()> {
    let rank = comm.rank();
    let nranks = comm.size();
    let local_size = check_divisible(system_size, nranks)?;
    check_local_len("beta_local", beta_local.len(), local_size)?;
    check_local_len("gam_local", gam_local.len(), local_size)?;

    let _span = tracing::debug_span!("precompute_beta_gam", rank, nranks, local_size).entered();
    let stage = PipelineStage::for_rank(rank, nranks);

    let left = stage.receive(comm)?;
    (beta_local[0], gam_local[0]) = recurrence::seed(left);
    recurrence::extend(beta_local, gam_local);

    let last_beta = beta_local[local_size - 1];
    stage.forward(comm, last_beta)?;
    tracing::debug!(last_beta, "coefficient block ready");
    Ok(())
}
