//! Console banners for job output.
//!
//! Progress lines go to stdout with `println!` so they land in the
//! scheduler's `.out` file; diagnostics go through `tracing` to stderr.

use console::style;
use tillicum_device_probe::AcceleratorInfo;
use tillicum_workload::compute_backend;

/// Crate version plus the toolchain and compute backend it was built with.
pub fn runtime_identity() -> String {
    format!(
        "tillicum {} (rustc {}, {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_RUSTC_SEMVER"),
        env!("VERGEN_CARGO_TARGET_TRIPLE"),
        compute_backend()
    )
}

pub fn build_timestamp() -> &'static str {
    env!("VERGEN_BUILD_TIMESTAMP")
}

pub fn heading(msg: &str) {
    println!("{}", style(msg).bold().cyan());
}

pub fn step(msg: &str) {
    println!("{} {}", style("→").cyan(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// Print each detected device on its own line, or a single "no GPU" line.
pub fn device_list(accel: &AcceleratorInfo) {
    if accel.devices.is_empty() {
        println!("  {}", accel.summary());
        return;
    }
    println!("  {} GPU(s) detected via {}:", accel.device_count(), accel.source);
    for device in &accel.devices {
        println!("    GPU {}: {}", device.index, device.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_identity_names_version_and_backend() {
        let identity = runtime_identity();
        assert!(identity.starts_with(&format!("tillicum {}", env!("CARGO_PKG_VERSION"))));
        assert!(identity.contains(compute_backend()));
    }
}
