//! CLI command implementations

pub mod config;
pub mod demo;
pub mod info;
pub mod run;

pub use config::ConfigAction;
pub use demo::DemoCommand;
pub use info::InfoCommand;
pub use run::RunCommand;

use std::time::Duration;
use tracing::debug;

/// Hold the allocation for `pause` so the job is visible in the scheduler's
/// queue views.
pub(crate) fn simulate_work(pause: Duration) {
    if !pause.is_zero() {
        debug!(secs = pause.as_secs_f64(), "simulating additional work");
        std::thread::sleep(pause);
    }
}
