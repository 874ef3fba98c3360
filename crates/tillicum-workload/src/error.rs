//! Workload and result-record errors.

use std::path::PathBuf;
use thiserror::Error;

/// The compute step failed: device open, allocation or kernel error.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("compute error: {0}")]
    Compute(#[from] candle_core::Error),
}

/// The result record could not be persisted.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to write result file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize result record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Any failure of [`crate::SmokeTestJob::execute`].
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Workload(#[from] WorkloadError),

    #[error(transparent)]
    Record(#[from] RecordError),
}
