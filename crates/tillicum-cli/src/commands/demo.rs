//! Lightweight onboarding job: identify the runtime and list accelerators.

use anyhow::Result;
use clap::Args;
use tillicum_common::sleep_duration;
use tillicum_device_probe::detect_accelerators;

use super::simulate_work;
use crate::output;

pub const DEFAULT_DEMO_SLEEP_SECS: f64 = 2.0;

/// Report the runtime and detected GPUs, then hold the allocation briefly
#[derive(Debug, Clone, Args)]
pub struct DemoCommand {
    /// Seconds to sleep before reporting completion
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_DEMO_SLEEP_SECS)]
    pub sleep_secs: f64,
}

impl Default for DemoCommand {
    fn default() -> Self {
        Self { sleep_secs: DEFAULT_DEMO_SLEEP_SECS }
    }
}

impl DemoCommand {
    pub fn execute(&self) -> Result<()> {
        let pause = sleep_duration("--sleep-secs", self.sleep_secs)?;

        output::heading("Starting Tillicum demo job...");
        println!("Runtime: {}", output::runtime_identity());

        output::step("Checking accelerator availability...");
        let accel = detect_accelerators();
        output::device_list(&accel);

        simulate_work(pause);

        output::success("Job completed successfully.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::{exit_code_for, EXIT_CONFIG_FAIL};

    #[test]
    fn negative_sleep_is_a_config_error() {
        let err = DemoCommand { sleep_secs: -1.0 }.execute().unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_CONFIG_FAIL);
    }

    #[test]
    fn out_of_range_sleep_is_a_config_error() {
        let err = DemoCommand { sleep_secs: 1e20 }.execute().unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_CONFIG_FAIL);
    }

    #[test]
    fn default_sleep_is_two_seconds() {
        assert_eq!(DemoCommand::default().sleep_secs, 2.0);
    }
}
