//! Full array-task smoke test

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tillicum_common::{ConfigBuilder, DevicePreference, JobContext, ResultFormat, TillicumConfig};
use tillicum_device_probe::detect_accelerators;
use tillicum_workload::{device_label, format_scientific, SmokeTestJob};
use tracing::info;

use super::simulate_work;
use crate::output;

/// Run the matmul smoke test for one job-array element
#[derive(Debug, Clone, Default, Args)]
pub struct RunCommand {
    /// Job-array index (overrides the scheduler's environment variable)
    #[arg(long, value_name = "N")]
    pub task_id: Option<u32>,

    /// Side length of the square matrix
    #[arg(long, value_name = "N")]
    pub matrix_size: Option<usize>,

    /// Directory that receives the result file (must already exist)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Result file format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ResultFormat>,

    /// Compute device (auto, cpu, cuda)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<DevicePreference>,

    /// Seconds to sleep after the workload
    #[arg(long, value_name = "SECS")]
    pub sleep_secs: Option<f64>,
}

impl RunCommand {
    /// Layer this command's flags over the loaded configuration.
    pub fn apply(&self, builder: ConfigBuilder) -> ConfigBuilder {
        builder
            .job_index(self.task_id)
            .matrix_size(self.matrix_size)
            .results_dir(self.results_dir.clone())
            .result_format(self.format)
            .device(self.device)
            .simulate_work_secs(self.sleep_secs)
    }

    pub fn execute(&self, config: &TillicumConfig) -> Result<()> {
        let context =
            JobContext::resolve(config.job.index).context("Failed to resolve job context")?;

        output::heading(&format!("Starting Tillicum array task {}", context.job_index()));
        println!("Runtime: {}", output::runtime_identity());
        println!("Hostname: {}", context.hostname());

        output::step("Checking accelerator availability...");
        let accel = detect_accelerators();
        println!("  Accelerator available: {}", accel.available);
        output::device_list(&accel);

        let job = SmokeTestJob::new(config, &context, &accel);
        println!("Learning rate: {}", job.parameter());

        let device = job.select_device().context("Failed to open compute device")?;
        let size = config.job.matrix_size;
        output::step(&format!("Computing {size}x{size} matrix product on {}...", device_label(&device)));

        let result = job.run_workload(&device).context("Synthetic workload failed")?;
        info!(
            task = result.job_index,
            elapsed_s = result.elapsed_seconds,
            checksum = result.checksum,
            "workload finished"
        );
        println!("Computation complete! Result checksum: {}", format_scientific(result.checksum, 3));
        println!("Elapsed time: {:.2} seconds", result.elapsed_seconds);

        simulate_work(config.job.simulate_work()?);

        let path = job.persist(&result).context("Failed to save results")?;
        println!("Results saved to {}", path.display());

        output::success("Job completed successfully.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_loaded_configuration() {
        let cmd = RunCommand {
            task_id: Some(9),
            matrix_size: Some(32),
            results_dir: Some(PathBuf::from("/scratch/results")),
            format: Some(ResultFormat::Json),
            device: Some(DevicePreference::Cpu),
            sleep_secs: Some(0.5),
        };
        let base = ConfigBuilder::new().job_index(Some(2)).matrix_size(Some(64));
        let config = cmd.apply(base).build().unwrap();

        assert_eq!(config.job.index, 9);
        assert_eq!(config.job.matrix_size, 32);
        assert_eq!(config.output.results_dir, PathBuf::from("/scratch/results"));
        assert_eq!(config.output.format, ResultFormat::Json);
        assert_eq!(config.job.device, DevicePreference::Cpu);
        assert_eq!(config.job.simulate_work_secs, 0.5);
    }

    #[test]
    fn absent_flags_keep_loaded_values() {
        let base = ConfigBuilder::new().job_index(Some(4)).matrix_size(Some(64));
        let config = RunCommand::default().apply(base).build().unwrap();
        assert_eq!(config.job.index, 4);
        assert_eq!(config.job.matrix_size, 64);
        assert_eq!(config.job.simulate_work_secs, 0.0);
    }
}
