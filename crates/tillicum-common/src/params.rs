//! Workload parameter grid indexed by the job-array task id.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Learning rates swept across a job array when no grid is configured.
pub const DEFAULT_LEARNING_RATES: [f64; 5] = [1e-4, 3e-4, 1e-3, 3e-3, 1e-2];

/// An ordered, non-empty list of candidate parameter values.
///
/// Each array task picks `values[job_index % len]`, so every task index maps to
/// a value and neighbouring tasks sweep through the grid in order.
///
/// # Examples
///
/// ```
/// use tillicum_common::ParameterGrid;
///
/// let grid = ParameterGrid::default();
/// assert_eq!(grid.select(7), 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ParameterGrid {
    values: Vec<f64>,
}

impl ParameterGrid {
    /// Build a grid, rejecting empty lists and non-finite values.
    pub fn new(values: Vec<f64>) -> Result<Self, ConfigError> {
        if values.is_empty() {
            return Err(ConfigError::invalid("job.parameters", "parameter list must not be empty"));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::invalid(
                "job.parameters",
                format!("parameter values must be finite, got {bad}"),
            ));
        }
        Ok(Self { values })
    }

    /// Select the value for `job_index`.
    pub fn select(&self, job_index: u32) -> f64 {
        self.values[self.position(job_index)]
    }

    /// Position in the grid that `job_index` selects.
    pub fn position(&self, job_index: u32) -> usize {
        // u32 -> usize is lossless on every supported target
        job_index as usize % self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A grid is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self { values: DEFAULT_LEARNING_RATES.to_vec() }
    }
}

impl TryFrom<Vec<f64>> for ParameterGrid {
    type Error = ConfigError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<ParameterGrid> for Vec<f64> {
    fn from(grid: ParameterGrid) -> Self {
        grid.values
    }
}
