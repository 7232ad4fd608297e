//! # Mini-Chain - Block Storage Engine (Subsystem 02)
//!
//! Persists mined blocks keyed by header hash and keeps a movable tip
//! pointer under the reserved key `"l"`.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Hash Linkage | Every non-genesis block's parent is the previous tip |
//! | 2 | Atomic Append | Block and tip pointer are written in one batch |
//! | 3 | Tip After Commit | The in-memory tip moves only after the batch commits |
//! | 4 | Snapshot Reads | Iteration never observes a half-committed append |
//! | 5 | Exclusive Open | One handle per location at a time |
//! | 6 | Wire Exact | Stored values are exactly `Block::serialize()` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - errors and configuration
//! - `ports/` - `KeyValueStore` and `StoreBackend` traits
//! - `adapters/` - in-memory, file-backed and RocksDB stores, process lock
//! - `service/` - `ChainStore` and `ChainIterator`
//!
//! ## Usage
//!
//! ```ignore
//! use mc_02_block_storage::{ChainStore, FileBackedKVStore, StoreConfig};
//! use mc_01_block_production::{BlockAssembler, PoWConfig, SystemTimeSource};
//!
//! let config = StoreConfig::default();
//! let assembler = BlockAssembler::new(PoWConfig::default(), SystemTimeSource);
//! let mut chain: ChainStore<FileBackedKVStore, _> =
//!     ChainStore::initialize_with_address(&config.path(), "alice", assembler)?;
//!
//! let block = chain.append_block(transactions)?;
//! for block in chain.iterate() {
//!     println!("{}", hex::encode(block?.hash()));
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::storage::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use adapters::storage::{RocksDbConfig, RocksDbStore};
pub use domain::{KVStoreError, Result, StorageError, StoreConfig};
pub use ports::outbound::{BatchOperation, KeyValueStore, ReadView, StoreBackend};
pub use service::{ChainIterator, ChainStore, ChainTip, IN_MEMORY_LOCATION, TIP_KEY};
