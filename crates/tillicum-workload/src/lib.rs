//! Synthetic accelerator workload for Tillicum array jobs
//!
//! The workload squares a pseudo-random matrix with `candle-core`, on CUDA
//! device 0 when one is available and the `cuda` feature is on, otherwise on
//! the CPU. The job index, selected parameter, elapsed time and checksum are
//! written to a per-task result file.

pub mod device;
pub mod error;
pub mod job;
pub mod matmul;
pub mod record;

pub use device::{compute_backend, cuda_compiled, device_label, select_device};
pub use error::{JobError, RecordError, WorkloadError};
pub use job::{JobReport, SmokeTestJob};
pub use matmul::{checksum, MatmulWorkload, WorkloadOutcome};
pub use record::{format_scientific, ResultWriter, WorkloadResult};
