//! Configuration types and utilities
//!
//! A [`TillicumConfig`] is assembled once at startup by [`ConfigBuilder`] from,
//! in increasing precedence: compiled defaults, an optional TOML file, process
//! environment, and explicit overrides (normally CLI flags).

use crate::context::{job_index_from_env, DEFAULT_INDEX_ENV};
use crate::error::ConfigError;
use crate::params::ParameterGrid;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "TILLICUM_CONFIG";
/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tillicum.toml";
pub const RESULTS_DIR_ENV: &str = "TILLICUM_RESULTS_DIR";
pub const MATRIX_SIZE_ENV: &str = "TILLICUM_MATRIX_SIZE";
pub const DEVICE_ENV: &str = "TILLICUM_DEVICE";

/// Main Tillicum configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TillicumConfig {
    pub job: JobConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Job-array and workload settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Scheduler variable holding the array task index.
    pub index_env: String,
    /// Task index; normally filled in from `index_env`.
    pub index: u32,
    pub parameters: ParameterGrid,
    /// Side length of the square matrix multiplied by the workload.
    pub matrix_size: usize,
    /// Seconds to sleep after the workload to simulate a longer job.
    pub simulate_work_secs: f64,
    pub device: DevicePreference,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            index_env: DEFAULT_INDEX_ENV.to_string(),
            index: 0,
            parameters: ParameterGrid::default(),
            matrix_size: 10_000,
            simulate_work_secs: 0.0,
            device: DevicePreference::Auto,
        }
    }
}

impl JobConfig {
    /// `simulate_work_secs` as a sleep duration.
    pub fn simulate_work(&self) -> Result<Duration, ConfigError> {
        sleep_duration("job.simulate_work_secs", self.simulate_work_secs)
    }
}

/// Convert a seconds value into a sleep duration, rejecting negative,
/// non-finite and out-of-range values.
pub fn sleep_duration(key: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ConfigError::invalid(key, format!("must be a non-negative number of seconds, got {secs}"))
    })
}

/// Path named by `TILLICUM_CONFIG`, if set and non-empty.
fn config_path_from_env() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Result file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives `results_task_<n>` files. Must already exist.
    pub results_dir: PathBuf,
    pub format: ResultFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { results_dir: PathBuf::from("./logs"), format: ResultFormat::Text }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::Pretty }
    }
}

/// Where the synthetic workload should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Accelerator when one is detected, CPU otherwise.
    #[default]
    Auto,
    Cpu,
    /// Require CUDA device 0; failure to open it is fatal.
    Cuda,
}

/// On-disk format of the result record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    /// Four human-readable lines.
    #[default]
    Text,
    Json,
}

impl ResultFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

macro_rules! lowercase_enum {
    ($ty:ty, $key:literal, { $($name:literal => $variant:path),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(ConfigError::invalid(
                        $key,
                        format!("unknown value `{other}` (expected one of: {})", [$($name),+].join(", ")),
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($variant => $name,)+
                };
                f.write_str(name)
            }
        }
    };
}

lowercase_enum!(DevicePreference, "job.device", {
    "auto" => DevicePreference::Auto,
    "cpu" => DevicePreference::Cpu,
    "cuda" => DevicePreference::Cuda,
});

lowercase_enum!(ResultFormat, "output.format", {
    "text" => ResultFormat::Text,
    "json" => ResultFormat::Json,
});

lowercase_enum!(LogFormat, "logging.format", {
    "pretty" => LogFormat::Pretty,
    "compact" => LogFormat::Compact,
    "json" => LogFormat::Json,
});

impl TillicumConfig {
    /// Path of the configuration file to read when none is given explicitly.
    pub fn default_config_path() -> PathBuf {
        config_path_from_env().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.job.matrix_size == 0 {
            return Err(ConfigError::invalid("job.matrix_size", "must be at least 1"));
        }
        self.job.simulate_work()?;
        if self.job.index_env.trim().is_empty() {
            return Err(ConfigError::invalid("job.index_env", "must name an environment variable"));
        }
        Ok(())
    }

    /// Render as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Layered configuration builder.
///
/// # Examples
///
/// ```
/// use tillicum_common::{ConfigBuilder, DevicePreference};
///
/// let config = ConfigBuilder::new()
///     .job_index(Some(3))
///     .matrix_size(Some(64))
///     .device(Some(DevicePreference::Cpu))
///     .build()
///     .unwrap();
/// assert_eq!(config.job.index, 3);
/// assert_eq!(config.job.parameters.select(config.job.index), 3e-3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: TillicumConfig,
}

impl ConfigBuilder {
    /// Start from compiled defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read { path: path.to_path_buf(), source }
            }
        })?;
        let config = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(Self { config })
    }

    /// Load the configuration file layer.
    ///
    /// An `explicit` path, or one named by `TILLICUM_CONFIG`, must exist.
    /// Otherwise `./tillicum.toml` is tried and may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(config_path_from_env) {
            Some(path) => Self::from_file(&path),
            None => Self::from_file_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the
    /// compiled defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Ok(builder) => Ok(builder),
            Err(ConfigError::NotFound(_)) => {
                info!("Using default configuration");
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment overrides.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Some(index) = job_index_from_env(&self.config.job.index_env) {
            self.config.job.index = index;
        }
        if let Some(dir) = env::var_os(RESULTS_DIR_ENV).filter(|v| !v.is_empty()) {
            self.config.output.results_dir = PathBuf::from(dir);
        }
        if let Ok(raw) = env::var(MATRIX_SIZE_ENV) {
            self.config.job.matrix_size = raw.trim().parse().map_err(|_| {
                ConfigError::invalid(
                    "job.matrix_size",
                    format!("{MATRIX_SIZE_ENV}={raw} is not an integer"),
                )
            })?;
        }
        if let Ok(raw) = env::var(DEVICE_ENV) {
            self.config.job.device = raw.parse()?;
        }
        Ok(self)
    }

    pub fn job_index(mut self, index: Option<u32>) -> Self {
        if let Some(index) = index {
            self.config.job.index = index;
        }
        self
    }

    pub fn matrix_size(mut self, size: Option<usize>) -> Self {
        if let Some(size) = size {
            self.config.job.matrix_size = size;
        }
        self
    }

    pub fn simulate_work_secs(mut self, secs: Option<f64>) -> Self {
        if let Some(secs) = secs {
            self.config.job.simulate_work_secs = secs;
        }
        self
    }

    pub fn device(mut self, device: Option<DevicePreference>) -> Self {
        if let Some(device) = device {
            self.config.job.device = device;
        }
        self
    }

    pub fn results_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.config.output.results_dir = dir;
        }
        self
    }

    pub fn result_format(mut self, format: Option<ResultFormat>) -> Self {
        if let Some(format) = format {
            self.config.output.format = format;
        }
        self
    }

    pub fn log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.config.logging.level = level;
        }
        self
    }

    pub fn log_format(mut self, format: Option<LogFormat>) -> Self {
        if let Some(format) = format {
            self.config.logging.format = format;
        }
        self
    }

    /// Validate and return the final configuration.
    pub fn build(self) -> Result<TillicumConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests;
