//! # RocksDB Storage Adapter
//!
//! RocksDB implementation of the KeyValueStore trait.
//!
//! ## Features
//!
//! - Atomic batch writes (WriteBatch)
//! - Native snapshots for iteration
//! - Snappy compression
//! - Bloom filters for read optimization
//! - Exclusive open through RocksDB's own `LOCK` file

use std::path::{Path, PathBuf};

use rocksdb::{Options, WriteBatch, WriteOptions, DB};

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ReadView, StoreBackend};

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    /// Default tuning for the database at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 64 * 1024 * 1024, // 64MB
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            sync_writes: true,
        }
    }

    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store implementing the KeyValueStore trait
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
}

/// Point-in-time RocksDB view.
pub struct RocksDbSnapshot<'a>(rocksdb::Snapshot<'a>);

impl ReadView for RocksDbSnapshot<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.0.get(key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB snapshot get failed: {}", e),
        })
    }
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| {
            let message = format!("Failed to open RocksDB at {}: {}", config.path.display(), e);
            if message.to_ascii_lowercase().contains("lock") {
                KVStoreError::Locked { message }
            } else {
                KVStoreError::IOError { message }
            }
        })?;

        tracing::info!("[mc-02] 💾 Opened RocksDB at {}", config.path.display());
        Ok(Self { db, config })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

impl KeyValueStore for RocksDbStore {
    type Snapshot<'a> = RocksDbSnapshot<'a>;

    fn snapshot(&self) -> RocksDbSnapshot<'_> {
        RocksDbSnapshot(self.db.snapshot())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.get(key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }

        self.db
            .write_opt(batch, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB batch write failed: {}", e),
            })
    }
}

impl StoreBackend for RocksDbStore {
    fn exists_at(path: &Path) -> bool {
        path.join("CURRENT").is_file()
    }

    fn open_at(path: &Path) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig::new(path))
    }
}
