//! Calculator configuration.
//!
//! Layered, lowest precedence first: built-in defaults, an optional TOML file
//! (`<config dir>/pillar-rewards/config.toml` unless a path is given), then
//! `PILLAR_*` environment variables. Command-line flags are applied on top by
//! the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, ConfigError, Environment, File};
use pillar_core::constants::{
    DEFAULT_HOLDER_BALANCE, DEFAULT_PAGE_SIZE, DEFAULT_REPORT_PATH, DEFAULT_RPC_ENDPOINT,
    DEFAULT_SIMULATION_DAYS,
};
use serde::{Deserialize, Serialize};

/// Everything the calculator reads from its environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Node JSON-RPC endpoint.
    pub rpc_endpoint: String,
    /// Pillars requested per RPC page.
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Balance to estimate rewards for, in whole ZNN.
    pub holder_balance: f64,
    /// Pillar the holder already delegates to; empty if none.
    pub current_pillar: String,
    pub simulation_days: f64,
    pub seed: Option<u64>,
    /// Delimited report output.
    pub report_path: PathBuf,
    /// JSON array of per-period daily emission, replacing the built-in table.
    pub schedule_path: Option<PathBuf>,
    /// Log level filter string (e.g. "info", "debug", "pillar_rewards=trace").
    pub log_level: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            holder_balance: DEFAULT_HOLDER_BALANCE,
            current_pillar: String::new(),
            simulation_days: DEFAULT_SIMULATION_DAYS,
            seed: None,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            schedule_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl CalculatorConfig {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pillar-rewards").join("config.toml"))
    }

    /// Load defaults, then `file` (required if given, optional otherwise),
    /// then `PILLAR_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => match Self::default_path() {
                Some(path) => builder.add_source(File::from(path).required(false)),
                None => builder,
            },
        };

        builder
            .add_source(Environment::with_prefix("PILLAR").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
