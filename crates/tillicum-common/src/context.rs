//! Job context resolved from the scheduler environment.

use crate::error::EnvironmentError;
use serde::Serialize;
use std::env;
use tracing::{debug, warn};

/// Scheduler variable that carries the job-array task index.
pub const DEFAULT_INDEX_ENV: &str = "SLURM_ARRAY_TASK_ID";

/// Identity of this job-array element. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobContext {
    job_index: u32,
    hostname: String,
}

impl JobContext {
    pub fn new(job_index: u32, hostname: impl Into<String>) -> Self {
        Self { job_index, hostname: hostname.into() }
    }

    /// Resolve the context for `job_index` on the local node.
    ///
    /// Fails when the hostname cannot be read.
    pub fn resolve(job_index: u32) -> Result<Self, EnvironmentError> {
        let hostname = local_hostname()?;
        debug!(job_index, hostname = %hostname, "resolved job context");
        Ok(Self { job_index, hostname })
    }

    pub fn job_index(&self) -> u32 {
        self.job_index
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// Read the local hostname via the OS.
pub fn local_hostname() -> Result<String, EnvironmentError> {
    sysinfo::System::host_name()
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or(EnvironmentError::Hostname)
}

/// Read the task index from `var`.
///
/// Returns `None` when the variable is unset. A value that is set but does not
/// parse as a non-negative integer is logged and treated as task 0.
pub fn job_index_from_env(var: &str) -> Option<u32> {
    let raw = env::var(var).ok()?;
    match parse_job_index(&raw) {
        Some(index) => Some(index),
        None => {
            warn!(var, value = %raw, "ignoring unparsable job index, using 0");
            Some(0)
        }
    }
}

/// Parse a scheduler-provided task index.
pub fn parse_job_index(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parse_accepts_plain_and_padded_integers() {
        assert_eq!(parse_job_index("3"), Some(3));
        assert_eq!(parse_job_index(" 42\n"), Some(42));
        assert_eq!(parse_job_index("0"), Some(0));
    }

    #[test]
    fn parse_rejects_negative_and_garbage() {
        assert_eq!(parse_job_index("-1"), None);
        assert_eq!(parse_job_index("abc"), None);
        assert_eq!(parse_job_index(""), None);
        assert_eq!(parse_job_index("1.5"), None);
    }

    #[test]
    #[serial(tillicum_env)]
    fn unset_variable_yields_none() {
        temp_env::with_var(DEFAULT_INDEX_ENV, None::<&str>, || {
            assert_eq!(job_index_from_env(DEFAULT_INDEX_ENV), None);
        });
    }

    #[test]
    #[serial(tillicum_env)]
    fn garbage_variable_falls_back_to_zero() {
        temp_env::with_var(DEFAULT_INDEX_ENV, Some("not-a-number"), || {
            assert_eq!(job_index_from_env(DEFAULT_INDEX_ENV), Some(0));
        });
    }

    #[test]
    #[serial(tillicum_env)]
    fn set_variable_is_parsed() {
        temp_env::with_var(DEFAULT_INDEX_ENV, Some("17"), || {
            assert_eq!(job_index_from_env(DEFAULT_INDEX_ENV), Some(17));
        });
    }

    #[test]
    fn resolve_reads_a_hostname() {
        let ctx = JobContext::resolve(4).expect("test hosts have a hostname");
        assert_eq!(ctx.job_index(), 4);
        assert!(!ctx.hostname().is_empty());
    }
}
