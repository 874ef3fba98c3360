// Exit codes for scheduler-side triage
use tillicum_common::{ConfigError, EnvironmentError};
use tillicum_workload::{RecordError, WorkloadError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_GENERIC_FAIL: i32 = 1;
pub const EXIT_CONFIG_FAIL: i32 = 2;
pub const EXIT_ENVIRONMENT_FAIL: i32 = 3;
pub const EXIT_WORKLOAD_FAIL: i32 = 4;
pub const EXIT_RESULT_IO_FAIL: i32 = 5;

/// Map the first typed error in `err`'s chain to an exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return EXIT_CONFIG_FAIL;
        }
        if cause.is::<EnvironmentError>() {
            return EXIT_ENVIRONMENT_FAIL;
        }
        if cause.is::<WorkloadError>() {
            return EXIT_WORKLOAD_FAIL;
        }
        if cause.is::<RecordError>() {
            return EXIT_RESULT_IO_FAIL;
        }
    }
    EXIT_GENERIC_FAIL
}
