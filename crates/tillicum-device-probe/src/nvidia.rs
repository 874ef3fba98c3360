//! CUDA device enumeration through `nvidia-smi`.

use crate::{AcceleratorProbe, ProbeOutcome, ProbeSource};
use std::ffi::OsString;
use std::process::{Command, Stdio};
use tracing::debug;

/// Enumerates NVIDIA GPUs by running
/// `nvidia-smi --query-gpu=index,name --format=csv,noheader`.
///
/// A missing binary, or one that exits non-zero (driver not loaded), counts as
/// an unavailable runtime.
#[derive(Debug, Clone)]
pub struct NvidiaSmiProbe {
    program: OsString,
}

impl NvidiaSmiProbe {
    /// Use a specific `nvidia-smi` executable.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for NvidiaSmiProbe {
    fn default() -> Self {
        Self::with_program("nvidia-smi")
    }
}

impl AcceleratorProbe for NvidiaSmiProbe {
    fn source(&self) -> ProbeSource {
        ProbeSource::NvidiaSmi
    }

    fn enumerate(&self) -> ProbeOutcome {
        let output = Command::new(&self.program)
            .args(["--query-gpu=index,name", "--format=csv,noheader"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                ProbeOutcome::Devices(parse_query_output(&String::from_utf8_lossy(&out.stdout)))
            }
            Ok(out) => {
                debug!(status = ?out.status, "nvidia-smi exited unsuccessfully");
                ProbeOutcome::Unavailable
            }
            Err(e) => {
                debug!(error = %e, "nvidia-smi could not be started");
                ProbeOutcome::Unavailable
            }
        }
    }
}

/// Parse `index,name` CSV rows into per-device names.
///
/// Rows without a numeric index are skipped. Blank names and `nvidia-smi`
/// placeholders such as `[N/A]` or `[Unknown Error]` become `None`.
///
/// # Examples
///
/// ```
/// use tillicum_device_probe::parse_query_output;
///
/// let names = parse_query_output("0, NVIDIA H200\n1, [N/A]\n");
/// assert_eq!(names, vec![Some("NVIDIA H200".to_string()), None]);
/// ```
pub fn parse_query_output(stdout: &str) -> Vec<Option<String>> {
    stdout
        .lines()
        .filter_map(|line| {
            let (index, name) = line.split_once(',').unwrap_or((line, ""));
            index.trim().parse::<usize>().ok()?;
            let name = name.trim();
            if name.is_empty() || name.starts_with('[') {
                Some(None)
            } else {
                Some(Some(name.to_owned()))
            }
        })
        .collect()
}
