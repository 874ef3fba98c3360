//! Result records and the per-task result file.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tillicum_common::{OutputConfig, ResultFormat};
use tracing::info;

/// Outcome of one array task. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadResult {
    pub job_index: u32,
    pub parameter: f64,
    pub elapsed_seconds: f64,
    pub checksum: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl WorkloadResult {
    pub fn new(job_index: u32, parameter: f64, elapsed_seconds: f64, checksum: f64) -> Self {
        Self {
            job_index,
            parameter,
            elapsed_seconds,
            checksum,
            hostname: None,
            matrix_size: None,
            device: None,
        }
    }

    /// Attach run metadata carried by the JSON format.
    pub fn with_run_metadata(
        mut self,
        hostname: impl Into<String>,
        matrix_size: usize,
        device: impl Into<String>,
    ) -> Self {
        self.hostname = Some(hostname.into());
        self.matrix_size = Some(matrix_size);
        self.device = Some(device.into());
        self
    }

    /// The four-line text record.
    ///
    /// # Examples
    ///
    /// ```
    /// use tillicum_workload::WorkloadResult;
    ///
    /// let text = WorkloadResult::new(3, 3e-3, 12.34, 1.234e9).render_text();
    /// assert_eq!(text, "Task 3\nLearning rate: 0.003\nTime: 12.34s\nChecksum: 1.234e+09\n");
    /// ```
    pub fn render_text(&self) -> String {
        format!(
            "Task {}\nLearning rate: {}\nTime: {:.2}s\nChecksum: {}\n",
            self.job_index,
            self.parameter,
            self.elapsed_seconds,
            format_scientific(self.checksum, 3)
        )
    }
}

/// Format `value` in scientific notation with `precision` fractional digits
/// and a signed, at-least-two-digit exponent (`1.234e+09`, `5.000e-03`).
pub fn format_scientific(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rendered = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        Err(_) => rendered,
    }
}

/// Writes result records into a results directory.
///
/// File names embed the task index, so array tasks never share a file. The
/// directory is expected to exist; it is not created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultWriter {
    dir: PathBuf,
    format: ResultFormat,
}

impl ResultWriter {
    pub fn new(dir: impl Into<PathBuf>, format: ResultFormat) -> Self {
        Self { dir: dir.into(), format }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(output.results_dir.clone(), output.format)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/results_task_<job_index>.<txt|json>`
    pub fn path_for(&self, job_index: u32) -> PathBuf {
        self.dir.join(format!("results_task_{job_index}.{}", self.format.extension()))
    }

    /// Create or truncate the task's result file and write `result` to it.
    pub fn write(&self, result: &WorkloadResult) -> Result<PathBuf, RecordError> {
        let path = self.path_for(result.job_index);
        let body = match self.format {
            ResultFormat::Text => result.render_text(),
            ResultFormat::Json => {
                let mut json = serde_json::to_string_pretty(result)?;
                json.push('\n');
                json
            }
        };
        fs::write(&path, body).map_err(|source| RecordError::Io { path: path.clone(), source })?;
        info!(path = %path.display(), job_index = result.job_index, "wrote result record");
        Ok(path)
    }
}
