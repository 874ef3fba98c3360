//! Common types for the Tillicum cluster smoke-test tools
//!
//! This crate holds the pieces every tool needs before it touches a device:
//! the layered job configuration, the job context resolved from the
//! scheduler environment, the workload parameter grid, and the shared error
//! taxonomy.

pub mod config;
pub mod context;
pub mod error;
pub mod params;

pub use config::*;
pub use context::{local_hostname, JobContext, DEFAULT_INDEX_ENV};
pub use error::*;
pub use params::{ParameterGrid, DEFAULT_LEARNING_RATES};
