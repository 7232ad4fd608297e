//! # Domain Errors
//!
//! Error types for the Block Storage subsystem.
//!
//! ## Design Principles
//!
//! - Each error maps to a specific lifecycle misuse or failure mode
//! - Backend failures abort the enclosing write; nothing partial is committed
//! - No panics in domain logic (use Result instead)

use std::path::PathBuf;

use mc_01_block_production::BlockProductionError;
use shared_types::{CodecError, Hash};
use thiserror::Error;

/// Result alias for chain store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during chain store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// `initialize` found existing data at the location.
    #[error("Blockchain already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// `open` found no store at the location.
    #[error("No blockchain found at {}. Create one first.", path.display())]
    NotFound { path: PathBuf },

    /// A store that should hold a chain has no tip pointer.
    #[error("Tip pointer missing from store")]
    TipMissing,

    /// A referenced block is not in the store.
    #[error("Block not found: {}", hex::encode(hash))]
    BlockNotFound { hash: Hash },

    /// The block handed to `initialize` cannot start a chain.
    #[error("Invalid genesis block: {reason}")]
    InvalidGenesis { reason: String },

    /// Walking parent links reached height 0 on a block that is not genesis.
    #[error("Chain link broken below block {}", hex::encode(hash))]
    BrokenLink { hash: Hash },

    /// Database lock could not be acquired (process already running).
    #[error("Database locked: {message}")]
    DatabaseLocked { message: String },

    /// Backend read or write failure.
    #[error("Database error: {0}")]
    Database(KVStoreError),

    /// A stored record failed to decode.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Assembling or mining the next block failed.
    #[error("Block production failed: {0}")]
    Production(#[from] BlockProductionError),
}

/// Errors from the key-value store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error.
    #[error("I/O error: {message}")]
    IOError { message: String },

    /// Persisted data could not be parsed.
    #[error("Corruption: {message}")]
    CorruptionError { message: String },

    /// Another handle holds the store exclusively.
    #[error("Store locked: {message}")]
    Locked { message: String },
}

impl From<KVStoreError> for StorageError {
    fn from(err: KVStoreError) -> Self {
        match err {
            KVStoreError::Locked { message } => StorageError::DatabaseLocked { message },
            other => StorageError::Database(other),
        }
    }
}

impl From<std::io::Error> for KVStoreError {
    fn from(err: std::io::Error) -> Self {
        KVStoreError::IOError {
            message: err.to_string(),
        }
    }
}
