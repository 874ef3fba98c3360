//! Square-matrix multiplication workload.

use crate::error::WorkloadError;
use candle_core::{DType, Device, Tensor};
use std::time::{Duration, Instant};
use tracing::info;

/// Multiplies an `n × n` uniform-random matrix by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulWorkload {
    size: usize,
}

/// Timing and checksum of one workload run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadOutcome {
    /// Wall-clock time of the product plus device synchronization.
    pub elapsed: Duration,
    /// Sum of every element of the product.
    pub checksum: f64,
}

impl WorkloadOutcome {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl MatmulWorkload {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Allocate the input on `device`, then time its square.
    ///
    /// Allocation is excluded from the measured time.
    pub fn run(&self, device: &Device) -> Result<WorkloadOutcome, WorkloadError> {
        let x = Tensor::rand(0f32, 1f32, (self.size, self.size), device)?;
        synchronize(device)?;
        self.square(&x)
    }

    /// Time `x · x` and sum the result.
    pub fn square(&self, x: &Tensor) -> Result<WorkloadOutcome, WorkloadError> {
        let device = x.device();
        let start = Instant::now();
        let y = x.matmul(x)?;
        synchronize(device)?;
        let elapsed = start.elapsed();

        let total = checksum(&y)?;
        info!(
            size = self.size,
            elapsed_ms = elapsed.as_millis() as u64,
            checksum = total,
            "matmul workload complete"
        );
        Ok(WorkloadOutcome { elapsed, checksum: total })
    }
}

/// Sum of every element of a matrix.
///
/// Rows are reduced in their own dtype and the row sums are accumulated in
/// f64. A single f32 accumulator stops growing once the total passes 2^24
/// times the element size.
pub fn checksum(y: &Tensor) -> Result<f64, WorkloadError> {
    let rows = y.sum(1)?.to_dtype(DType::F64)?;
    Ok(rows.sum_all()?.to_scalar::<f64>()?)
}

/// Block until queued device work finishes. The CPU path runs synchronously
/// and is skipped.
fn synchronize(device: &Device) -> candle_core::Result<()> {
    if device.is_cpu() {
        Ok(())
    } else {
        device.synchronize()
    }
}
