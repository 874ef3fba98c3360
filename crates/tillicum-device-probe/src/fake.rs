//! `TILLICUM_GPU_FAKE` override probe.

use crate::{strict_mode_enabled, AcceleratorProbe, ProbeOutcome, ProbeSource, GPU_FAKE_ENV};

/// Probe that reports a fixed, pre-parsed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeProbe {
    outcome: ProbeOutcome,
}

impl FakeProbe {
    pub fn new(spec: &str) -> Self {
        Self { outcome: parse_fake_spec(spec) }
    }

    /// Build from `TILLICUM_GPU_FAKE`, unless unset or strict mode is on.
    pub fn from_env() -> Option<Self> {
        if strict_mode_enabled() {
            return None;
        }
        let spec = std::env::var(GPU_FAKE_ENV).ok()?;
        Some(Self::new(&spec))
    }
}

impl AcceleratorProbe for FakeProbe {
    fn source(&self) -> ProbeSource {
        ProbeSource::Fake
    }

    fn enumerate(&self) -> ProbeOutcome {
        self.outcome.clone()
    }
}

/// Parse a fake-device spec.
///
/// `none` (or an empty string) means zero devices and `unavailable` means no
/// runtime. Anything else is a comma-separated list of device names, where an
/// empty entry stands for a device whose name cannot be resolved.
///
/// # Examples
///
/// ```
/// use tillicum_device_probe::{parse_fake_spec, ProbeOutcome};
///
/// assert_eq!(parse_fake_spec("none"), ProbeOutcome::Devices(vec![]));
/// assert_eq!(parse_fake_spec("unavailable"), ProbeOutcome::Unavailable);
/// assert_eq!(
///     parse_fake_spec("H200, "),
///     ProbeOutcome::Devices(vec![Some("H200".into()), None]),
/// );
/// ```
pub fn parse_fake_spec(spec: &str) -> ProbeOutcome {
    let trimmed = spec.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return ProbeOutcome::Devices(Vec::new());
    }
    if trimmed.eq_ignore_ascii_case("unavailable") {
        return ProbeOutcome::Unavailable;
    }
    let names = trimmed
        .split(',')
        .map(str::trim)
        .map(|name| if name.is_empty() { None } else { Some(name.to_owned()) })
        .collect();
    ProbeOutcome::Devices(names)
}
