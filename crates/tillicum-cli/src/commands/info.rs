//! System information report

use anyhow::Result;
use clap::Args;
use console::style;
use serde_json::{json, Value};
use tillicum_common::{local_hostname, TillicumConfig};
use tillicum_device_probe::{detect_accelerators, probe_cpu, strict_mode_enabled};
use tillicum_workload::{compute_backend, cuda_compiled};

use crate::output;

/// Show versions, host facts and detected accelerators
#[derive(Debug, Clone, Default, Args)]
pub struct InfoCommand {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl InfoCommand {
    pub fn execute(&self, config: &TillicumConfig) -> Result<()> {
        let report = system_report(config);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_text(&report);
        }
        Ok(())
    }
}

/// Collect the report. Host facts that cannot be read are left null.
pub fn system_report(config: &TillicumConfig) -> Value {
    let cpu = probe_cpu();
    let accel = detect_accelerators();
    let index = config.job.index;

    json!({
        "version": {
            "tillicum": env!("CARGO_PKG_VERSION"),
            "rustc": env!("VERGEN_RUSTC_SEMVER"),
            "target": env!("VERGEN_CARGO_TARGET_TRIPLE"),
            "built": output::build_timestamp(),
            "backend": compute_backend(),
            "cuda_compiled": cuda_compiled(),
            "features": env!("VERGEN_CARGO_FEATURES"),
        },
        "host": {
            "hostname": local_hostname().ok(),
            "os": cpu.os,
            "arch": cpu.arch,
            "logical_cores": cpu.logical_cores,
        },
        "accelerators": accel,
        "strict_mode": strict_mode_enabled(),
        "job": {
            "index_env": config.job.index_env,
            "index": index,
            "parameter": config.job.parameters.select(index),
        },
    })
}

fn print_text(report: &Value) {
    println!("{}", style("Tillicum System Information").bold().cyan());
    println!();

    let version = &report["version"];
    println!("{}", style("Version:").bold());
    println!("  Tillicum: {}", text(&version["tillicum"]));
    println!("  Rust: {}", text(&version["rustc"]));
    println!("  Target: {}", text(&version["target"]));
    println!("  Built: {}", text(&version["built"]));
    println!("  Backend: {}", text(&version["backend"]));
    println!("  Features: {}", text(&version["features"]));
    println!();

    let host = &report["host"];
    println!("{}", style("System:").bold());
    println!("  Hostname: {}", text(&host["hostname"]));
    println!("  OS: {}", text(&host["os"]));
    println!("  Architecture: {}", text(&host["arch"]));
    println!("  CPU cores: {}", host["logical_cores"]);
    println!();

    println!("{}", style("Accelerators:").bold());
    match report["accelerators"]["devices"].as_array() {
        Some(devices) if !devices.is_empty() => {
            for device in devices {
                println!("  GPU {}: {}", device["index"], text(&device["name"]));
            }
        }
        _ => println!("  No GPU detected."),
    }
    if report["strict_mode"].as_bool().unwrap_or(false) {
        println!("  {}", style("strict mode: fake devices ignored").yellow());
    }
    println!();

    let job = &report["job"];
    println!("{}", style("Job:").bold());
    println!("  Index ({}): {}", text(&job["index_env"]), job["index"]);
    println!("  Learning rate: {}", job["parameter"]);
}

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or("unknown")
}
