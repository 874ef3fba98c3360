//! Compute device selection.

use crate::error::WorkloadError;
use candle_core::Device;
use tillicum_common::DevicePreference;
use tillicum_device_probe::AcceleratorInfo;
use tracing::{debug, info};

/// Whether CUDA support was compiled into this binary.
///
/// A detected GPU is only used for compute when this is `true`.
#[inline]
pub const fn cuda_compiled() -> bool {
    cfg!(feature = "cuda")
}

/// Name of the compute backend, for runtime identity banners.
pub fn compute_backend() -> &'static str {
    if cuda_compiled() {
        "candle (cuda)"
    } else {
        "candle (cpu)"
    }
}

/// Pick the device the workload runs on.
///
/// - `Cpu` always returns the CPU.
/// - `Auto` uses CUDA device 0 when an accelerator was detected and CUDA is
///   compiled in, and the CPU otherwise.
/// - `Cuda` requires CUDA device 0 and fails if it cannot be opened.
pub fn select_device(
    preference: DevicePreference,
    accelerator: &AcceleratorInfo,
) -> Result<Device, WorkloadError> {
    let device = match preference {
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Auto if accelerator.available => {
            let device = Device::cuda_if_available(0)?;
            if device.is_cpu() {
                info!("accelerator detected but CUDA support is not compiled in, computing on CPU");
            }
            device
        }
        DevicePreference::Auto => Device::Cpu,
        DevicePreference::Cuda => Device::new_cuda(0)?,
    };
    debug!(?preference, device = device_label(&device), "selected compute device");
    Ok(device)
}

/// Short label for a device: `cpu`, `cuda:0` or `metal`.
pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda:0"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}
