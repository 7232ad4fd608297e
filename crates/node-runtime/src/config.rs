//! # Node Configuration
//!
//! Configuration is layered:
//!
//! 1. Built-in defaults
//! 2. A JSON file named by `MC_CONFIG` (optional)
//! 3. `MC_*` environment variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MC_DATA_DIR` | `store.data_dir` |
//! | `MC_NODE_ID` | `store.node_id` |
//! | `MC_BITS` | `pow.bits` (hex with `0x`, or decimal) |
//! | `MC_COMMAND` | `command` (`init`, `append`, `print`) |
//! | `MC_ADDRESS` | `address` |
//! | `MC_DATA` | `data` |
//! | `MC_BACKEND` | `backend` (`file`, `rocksdb`) |

use std::path::PathBuf;
use std::str::FromStr;

use mc_01_block_production::PoWConfig;
use mc_02_block_storage::StoreConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_FILE_VAR: &str = "MC_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON config file could not be read.
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The JSON config file is not valid.
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An environment variable holds an unusable value.
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// What the node does this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Create the chain with a genesis block paying `address`.
    Init,
    /// Mine one block on top of the tip.
    Append,
    /// Print every block from tip to genesis.
    #[default]
    Print,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "init" => Ok(Command::Init),
            "append" => Ok(Command::Append),
            "print" => Ok(Command::Print),
            _ => Err("expected init, append or print".to_string()),
        }
    }
}

/// Key-value backend for the chain store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Single data file plus lock file.
    #[default]
    File,
    /// RocksDB directory (needs the `rocksdb` feature).
    RocksDb,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "rocksdb" => Ok(Backend::RocksDb),
            _ => Err("expected file or rocksdb".to_string()),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Store location.
    pub store: StoreConfig,
    /// Mining parameters.
    pub pow: PoWConfig,
    /// Command to run.
    pub command: Command,
    /// Reward address for `init` and `append`.
    pub address: String,
    /// Coinbase data for `append`; empty means the default reward text.
    pub data: String,
    /// Storage backend.
    pub backend: Backend,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            pow: PoWConfig::default(),
            command: Command::default(),
            address: "genesis".to_string(),
            data: String::new(),
            backend: Backend::default(),
        }
    }
}

impl NodeConfig {
    /// Build a config from a variable lookup.
    ///
    /// `lookup` stands in for `std::env::var` so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Some(dir) = lookup("MC_DATA_DIR") {
            config.store.data_dir = PathBuf::from(dir);
        }
        if let Some(id) = lookup("MC_NODE_ID") {
            config.store.node_id = id;
        }
        if let Some(bits) = lookup("MC_BITS") {
            config.pow.bits = parse_bits(&bits).ok_or_else(|| ConfigError::InvalidVar {
                var: "MC_BITS",
                value: bits.clone(),
                reason: "expected a 32-bit integer".to_string(),
            })?;
        }
        if let Some(command) = lookup("MC_COMMAND") {
            config.command = parse_var("MC_COMMAND", command)?;
        }
        if let Some(address) = lookup("MC_ADDRESS") {
            config.address = address;
        }
        if let Some(data) = lookup("MC_DATA") {
            config.data = data;
        }
        if let Some(backend) = lookup("MC_BACKEND") {
            config.backend = parse_var("MC_BACKEND", backend)?;
        }

        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    NodeConfig::from_lookup(|var| std::env::var(var).ok())
}

fn parse_bits(value: &str) -> Option<u32> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn parse_var<T: FromStr<Err = String>>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|reason| ConfigError::InvalidVar { var, value, reason })
}
