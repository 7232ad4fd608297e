//! # Mini-Chain Node Runtime
//!
//! Library half of the `minichain-node` binary, split out so the commands
//! can be driven from tests.
//!
//! - `config` - layered `NodeConfig` (defaults, JSON file, `MC_*` env)
//! - `commands` - `init`, `append` and `print` against a chain store

pub mod commands;
pub mod config;

pub use commands::{format_block, print_chain, run};
pub use config::{load_config, Backend, Command, ConfigError, NodeConfig};
