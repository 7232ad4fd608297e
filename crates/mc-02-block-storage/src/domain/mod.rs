//! Domain layer: errors and configuration

pub mod config;
pub mod errors;

pub use config::StoreConfig;
pub use errors::{KVStoreError, Result, StorageError};
