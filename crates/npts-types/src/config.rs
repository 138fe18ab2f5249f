// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOLERANCE;
use crate::error::{check_divisible, check_worker_count, NptsError, NptsResult};

/// How each rank resolves its coupling scalar from the gathered
/// per-rank boundary vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducedSystemStrategy {
    /// Closed-form sum of products, O(P²) per rank.
    #[default]
    ClosedForm,
    /// Walk the size-P recurrence from the anchored edge, O(P) per rank.
    Recurrence,
}

/// Right-hand side of a solve request.
///
/// Exactly one key is accepted; an object mixing keys of two variants
/// is a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum RhsSpec {
    /// Every entry equal to `constant`.
    Constant { constant: f64 },
    /// Uniform in [-1, 1) from a seeded generator.
    Random { seed: u64 },
    /// Explicit values, one per unknown.
    Values { values: Vec<f64> },
}

/// Top-level run configuration, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub system_size: usize,
    /// Worker count. When absent the driver picks the largest divisor
    /// of `system_size` not exceeding the Rayon thread count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    pub rhs: RhsSpec,
    #[serde(default)]
    pub reduced_system: ReducedSystemStrategy,
    /// Compare against the sequential Thomas solve after the run.
    #[serde(default = "default_verify")]
    pub verify: bool,
    /// Relative error accepted by verification.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_verify() -> bool {
    true
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl RunConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> NptsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NptsResult<()> {
        if self.system_size == 0 {
            return Err(NptsError::ConfigError(
                "system_size must be >= 1".to_string(),
            ));
        }
        if let Some(workers) = self.workers {
            check_worker_count(workers)?;
            check_divisible(self.system_size, workers)?;
        }
        if let RhsSpec::Values { values } = &self.rhs {
            if values.len() != self.system_size {
                return Err(NptsError::ConfigError(format!(
                    "rhs has {} values for system_size={}",
                    values.len(),
                    self.system_size
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(NptsError::ConfigError(
                    "rhs contains non-finite values".to_string(),
                ));
            }
        }
        if let RhsSpec::Constant { constant } = self.rhs {
            if !constant.is_finite() {
                return Err(NptsError::ConfigError(format!(
                    "rhs constant must be finite, got {constant}"
                )));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(NptsError::ConfigError(format!(
                "tolerance must be finite > 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
