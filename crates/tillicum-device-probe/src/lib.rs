//! Accelerator detection and capability probing for Tillicum smoke tests.
//!
//! Detection never fails. When the accelerator tooling is missing from the
//! node entirely the result is an [`AcceleratorInfo`] with
//! `available == false`, the same shape a GPU node with zero visible devices
//! produces.
//!
//! `TILLICUM_GPU_FAKE` replaces real probing for deterministic testing:
//!
//! - `none` → the runtime is present but reports zero devices
//! - `unavailable` → the runtime is not installed at all
//! - `A100,,H200` → three devices, the second with an unresolvable name
//!
//! Strict mode (`TILLICUM_STRICT_MODE=1`) ignores `TILLICUM_GPU_FAKE` and
//! probes real hardware.

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, info, warn};

mod fake;
mod nvidia;

pub use fake::{parse_fake_spec, FakeProbe};
pub use nvidia::{parse_query_output, NvidiaSmiProbe};

/// Environment override for accelerator detection.
pub const GPU_FAKE_ENV: &str = "TILLICUM_GPU_FAKE";
/// Set to `1`/`true` to ignore [`GPU_FAKE_ENV`].
pub const STRICT_MODE_ENV: &str = "TILLICUM_STRICT_MODE";
/// Substituted when a device's name cannot be resolved.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown GPU";

// ── Probe seam ───────────────────────────────────────────────────────────────

/// Which mechanism produced an [`AcceleratorInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeSource {
    /// No probe could run; the accelerator runtime is absent.
    None,
    NvidiaSmi,
    Fake,
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::NvidiaSmi => "nvidia-smi",
            Self::Fake => "fake",
        })
    }
}

/// Raw result of asking a runtime for its devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The capability itself is missing (library or tool not installed).
    Unavailable,
    /// One entry per device, in device order. `None` marks a device whose name
    /// could not be resolved.
    Devices(Vec<Option<String>>),
}

/// A way of enumerating attached accelerators.
///
/// Implementations must not panic and must report a missing runtime as
/// [`ProbeOutcome::Unavailable`] rather than an error.
pub trait AcceleratorProbe {
    fn source(&self) -> ProbeSource;

    fn enumerate(&self) -> ProbeOutcome;
}

// ── Result types ─────────────────────────────────────────────────────────────

/// One enumerated accelerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceleratorDevice {
    pub index: usize,
    pub name: String,
}

/// Accelerator availability for this process. Derived once per run.
///
/// Serializes with the derived `device_name` and `device_count` alongside
/// the stored fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceleratorInfo {
    /// At least one device was enumerated.
    pub available: bool,
    pub devices: Vec<AcceleratorDevice>,
    pub source: ProbeSource,
}

impl AcceleratorInfo {
    /// No accelerator runtime on this node.
    pub fn unavailable() -> Self {
        Self { available: false, devices: Vec::new(), source: ProbeSource::None }
    }

    /// Name of the first device, if any.
    pub fn device_name(&self) -> Option<&str> {
        self.devices.first().map(|d| d.name.as_str())
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// One-line description for console banners.
    ///
    /// # Examples
    ///
    /// ```
    /// use tillicum_device_probe::AcceleratorInfo;
    ///
    /// assert_eq!(AcceleratorInfo::unavailable().summary(), "No GPU detected.");
    /// ```
    pub fn summary(&self) -> String {
        match self.devices.as_slice() {
            [] => "No GPU detected.".to_string(),
            [only] => format!("GPU detected: {}", only.name),
            [first, ..] => format!("{} GPUs detected (device 0: {})", self.devices.len(), first.name),
        }
    }
}

#[derive(Serialize)]
struct AcceleratorInfoView<'a> {
    available: bool,
    device_name: Option<&'a str>,
    device_count: usize,
    devices: &'a [AcceleratorDevice],
    source: ProbeSource,
}

impl Serialize for AcceleratorInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AcceleratorInfoView {
            available: self.available,
            device_name: self.device_name(),
            device_count: self.device_count(),
            devices: &self.devices,
            source: self.source,
        }
        .serialize(serializer)
    }
}

impl Default for AcceleratorInfo {
    fn default() -> Self {
        Self::unavailable()
    }
}

// ── Detection ────────────────────────────────────────────────────────────────

/// Fold a probe's raw outcome into an [`AcceleratorInfo`].
///
/// Unresolvable names are replaced by [`UNKNOWN_DEVICE_NAME`].
pub fn detect_with(probe: &dyn AcceleratorProbe) -> AcceleratorInfo {
    let source = probe.source();
    match probe.enumerate() {
        ProbeOutcome::Unavailable => {
            info!(%source, "accelerator runtime not detected, continuing without GPU");
            AcceleratorInfo::unavailable()
        }
        ProbeOutcome::Devices(names) => {
            let devices: Vec<AcceleratorDevice> = names
                .into_iter()
                .enumerate()
                .map(|(index, name)| {
                    let name = name.unwrap_or_else(|| {
                        warn!(index, "device name unavailable, using placeholder");
                        UNKNOWN_DEVICE_NAME.to_string()
                    });
                    AcceleratorDevice { index, name }
                })
                .collect();
            debug!(%source, count = devices.len(), "enumerated accelerators");
            AcceleratorInfo { available: !devices.is_empty(), devices, source }
        }
    }
}

/// Detect accelerators on this node.
///
/// Honours `TILLICUM_GPU_FAKE` unless strict mode is on; otherwise queries
/// `nvidia-smi`.
pub fn detect_accelerators() -> AcceleratorInfo {
    match FakeProbe::from_env() {
        Some(fake) => detect_with(&fake),
        None => detect_with(&NvidiaSmiProbe::default()),
    }
}

/// `TILLICUM_STRICT_MODE` is set to `1` or `true`.
pub fn strict_mode_enabled() -> bool {
    std::env::var(STRICT_MODE_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

// ── CPU facts ────────────────────────────────────────────────────────────────

/// Host CPU facts reported alongside accelerator detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuInfo {
    /// Logical cores available to the process (always ≥ 1).
    pub logical_cores: usize,
    pub arch: &'static str,
    pub os: &'static str,
}

/// Probe the host CPU. Never fails; cores fall back to 1.
pub fn probe_cpu() -> CpuInfo {
    let logical_cores =
        std::thread::available_parallelism().map(std::num::NonZero::get).unwrap_or(1);
    CpuInfo { logical_cores, arch: std::env::consts::ARCH, os: std::env::consts::OS }
}
