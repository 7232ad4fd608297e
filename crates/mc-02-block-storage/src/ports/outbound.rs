//! # Outbound Ports (Driven Side)
//!
//! What the chain store needs from its key-value backend:
//!
//! - consistent point-in-time reads (`snapshot`)
//! - all-or-nothing multi-key writes (`atomic_batch_write`)
//! - an existence check for a storage location (`StoreBackend::exists_at`)
//! - exclusive open of that location (`StoreBackend::open_at`)

use std::path::Path;

use crate::domain::errors::KVStoreError;

/// Read access to a consistent view of the store.
pub trait ReadView {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;
}

/// Key-value store with snapshot reads and atomic batch writes.
pub trait KeyValueStore: Send {
    /// A read view unaffected by writes committed after it was taken.
    type Snapshot<'a>: ReadView
    where
        Self: 'a;

    /// Take a snapshot of the current committed state.
    fn snapshot(&self) -> Self::Snapshot<'_>;

    /// Get a value from the latest committed state.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Execute a batch of operations atomically.
    ///
    /// Either every operation is applied or none is.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.get(key).map(|value| value.is_some())
    }
}

/// A store that lives at a filesystem location.
pub trait StoreBackend: KeyValueStore + Sized {
    /// Whether a store has already been created at `path`.
    fn exists_at(path: &Path) -> bool;

    /// Open `path` exclusively, creating an empty store if none is there.
    fn open_at(path: &Path) -> Result<Self, KVStoreError>;
}

/// A single operation in an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}
