//! The array-task smoke test: pick a parameter, run the workload, persist.

use crate::device::{device_label, select_device};
use crate::error::{JobError, RecordError, WorkloadError};
use crate::matmul::MatmulWorkload;
use crate::record::{ResultWriter, WorkloadResult};
use candle_core::Device;
use std::path::PathBuf;
use tillicum_common::{JobContext, TillicumConfig};
use tillicum_device_probe::AcceleratorInfo;

/// One job-array element's smoke test.
///
/// Callers that want to report progress between steps use
/// [`select_device`](Self::select_device), [`run_workload`](Self::run_workload)
/// and [`persist`](Self::persist) directly; [`execute`](Self::execute) runs all
/// three in order.
#[derive(Debug)]
pub struct SmokeTestJob<'a> {
    config: &'a TillicumConfig,
    context: &'a JobContext,
    accelerator: &'a AcceleratorInfo,
}

/// What [`SmokeTestJob::execute`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub result: WorkloadResult,
    pub path: PathBuf,
}

impl<'a> SmokeTestJob<'a> {
    pub fn new(
        config: &'a TillicumConfig,
        context: &'a JobContext,
        accelerator: &'a AcceleratorInfo,
    ) -> Self {
        Self { config, context, accelerator }
    }

    pub fn job_index(&self) -> u32 {
        self.context.job_index()
    }

    /// Parameter value for this task.
    pub fn parameter(&self) -> f64 {
        self.config.job.parameters.select(self.context.job_index())
    }

    pub fn select_device(&self) -> Result<Device, WorkloadError> {
        select_device(self.config.job.device, self.accelerator)
    }

    /// Run the matmul on `device` and build the task's result record.
    pub fn run_workload(&self, device: &Device) -> Result<WorkloadResult, WorkloadError> {
        let size = self.config.job.matrix_size;
        let outcome = MatmulWorkload::new(size).run(device)?;
        Ok(WorkloadResult::new(
            self.job_index(),
            self.parameter(),
            outcome.elapsed_seconds(),
            outcome.checksum,
        )
        .with_run_metadata(self.context.hostname(), size, device_label(device)))
    }

    pub fn writer(&self) -> ResultWriter {
        ResultWriter::from_config(&self.config.output)
    }

    pub fn persist(&self, result: &WorkloadResult) -> Result<PathBuf, RecordError> {
        self.writer().write(result)
    }

    pub fn execute(&self) -> Result<JobReport, JobError> {
        let device = self.select_device()?;
        let result = self.run_workload(&device)?;
        let path = self.persist(&result)?;
        Ok(JobReport { result, path })
    }
}
