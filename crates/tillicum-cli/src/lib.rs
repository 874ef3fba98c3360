//! Tillicum CLI library
//!
//! This library exposes internal modules for testing purposes.

pub mod commands;
pub mod exit;
pub mod logging;
pub mod output;
