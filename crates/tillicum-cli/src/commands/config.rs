//! `config` subcommands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;
use tillicum_common::TillicumConfig;

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration as TOML
    Show,
    /// Show the configuration file path
    Path,
}

impl ConfigAction {
    /// `explicit` is the `--config` argument, if one was given.
    pub fn execute(self, config: &TillicumConfig, explicit: Option<&Path>) -> Result<()> {
        match self {
            Self::Show => {
                let rendered = config.to_toml().context("Failed to serialize configuration")?;
                println!("{rendered}");
            }
            Self::Path => {
                let path = explicit
                    .map(Path::to_path_buf)
                    .unwrap_or_else(TillicumConfig::default_config_path);
                println!("{}", path.display());
            }
        }
        Ok(())
    }
}
