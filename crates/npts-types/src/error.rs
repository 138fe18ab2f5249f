// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

use crate::constants::MAX_WORKERS;

#[derive(Error, Debug)]
pub enum NptsError {
    #[error("system_size ({system_size}) not a multiple of worker count ({workers})")]
    NotDivisible { system_size: usize, workers: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Local buffer `{name}` has length {actual}, expected {expected}")]
    LocalSizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Communication failure on rank {rank}: {message}")]
    Communication { rank: usize, message: String },

    #[error("Worker thread for rank {rank} panicked")]
    WorkerPanicked { rank: usize },

    #[error("Linear algebra error: {0}")]
    LinAlg(String),

    #[error("Non-finite values: {0}")]
    NonFinite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NptsResult<T> = Result<T, NptsError>;

/// Reject a `system_size` that cannot be split into equal rank blocks.
///
/// Returns the per-rank block length on success.
pub fn check_divisible(system_size: usize, workers: usize) -> NptsResult<usize> {
    if workers == 0 {
        return Err(NptsError::ConfigError(
            "worker count must be >= 1".to_string(),
        ));
    }
    if system_size % workers != 0 {
        return Err(NptsError::NotDivisible {
            system_size,
            workers,
        });
    }
    if system_size == 0 {
        return Err(NptsError::ConfigError(
            "system_size must be >= 1".to_string(),
        ));
    }
    Ok(system_size / workers)
}

/// Reject a thread-group worker count outside `1..=MAX_WORKERS`.
pub fn check_worker_count(workers: usize) -> NptsResult<()> {
    if workers == 0 || workers > MAX_WORKERS {
        return Err(NptsError::ConfigError(format!(
            "worker count must be in 1..={MAX_WORKERS}, got {workers}"
        )));
    }
    Ok(())
}

/// Reject a local buffer whose length differs from the rank block length.
pub fn check_local_len(name: &'static str, actual: usize, expected: usize) -> NptsResult<()> {
    if actual != expected {
        return Err(NptsError::LocalSizeMismatch {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}
