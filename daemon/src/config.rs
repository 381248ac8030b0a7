//! Deployment configuration, loaded from TOML.

use flightsurety_types::{Address, GovernanceParams, TypesError, Wei};
use flightsurety_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {source}")]
    Invalid {
        field: &'static str,
        source: TypesError,
    },
}

/// Deployment-time constants and local settings.
///
/// Addresses and amounts are kept as text so the file stays readable:
/// `owner = "0x…"`, `minimum_funding_ante = "10 ether"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Account allowed to pause the system and manage authorized callers.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Identity of the governance engine, authorized on the registry at deploy.
    #[serde(default = "default_governance_address")]
    pub governance_address: String,

    /// The airline registered at deployment.
    #[serde(default = "default_genesis_airline")]
    pub genesis_airline: String,

    /// Minimum funding per call to activate an airline.
    #[serde(default = "default_minimum_funding_ante")]
    pub minimum_funding_ante: String,

    /// Airlines admitted without a vote, genesis included.
    #[serde(default = "default_auto_approved_airline_count")]
    pub auto_approved_airline_count: u32,

    /// Where the deployment state is persisted between invocations.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> String {
    Address::from_low_u64(1).to_string()
}

fn default_governance_address() -> String {
    Address::from_low_u64(2).to_string()
}

fn default_genesis_airline() -> String {
    Address::from_low_u64(0x100).to_string()
}

fn default_minimum_funding_ante() -> String {
    format!("{} ether", GovernanceParams::DEFAULT_ANTE_ETHER)
}

fn default_auto_approved_airline_count() -> u32 {
    GovernanceParams::DEFAULT_AUTO_APPROVED
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./flightsurety_state.bin")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DeploymentConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn owner(&self) -> Result<Address, ConfigError> {
        parse_field("owner", &self.owner)
    }

    pub fn governance_address(&self) -> Result<Address, ConfigError> {
        parse_field("governance_address", &self.governance_address)
    }

    pub fn genesis_airline(&self) -> Result<Address, ConfigError> {
        parse_field("genesis_airline", &self.genesis_airline)
    }

    pub fn params(&self) -> Result<GovernanceParams, ConfigError> {
        let ante: Wei = parse_field("minimum_funding_ante", &self.minimum_funding_ante)?;
        Ok(GovernanceParams::new(ante, self.auto_approved_airline_count))
    }
}

fn parse_field<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = TypesError>,
{
    value
        .parse()
        .map_err(|source| ConfigError::Invalid { field, source })
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            governance_address: default_governance_address(),
            genesis_airline: default_genesis_airline(),
            minimum_funding_ante: default_minimum_funding_ante(),
            auto_approved_airline_count: default_auto_approved_airline_count(),
            state_file: default_state_file(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
