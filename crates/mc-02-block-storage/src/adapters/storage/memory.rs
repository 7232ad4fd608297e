use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ReadView};

pub(crate) type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// Frozen view over a committed table.
///
/// Shares storage with the store until the next write replaces it.
#[derive(Clone, Debug)]
pub struct TableSnapshot(pub(crate) Arc<Table>);

impl ReadView for TableSnapshot {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.0.get(key).cloned())
    }
}

/// Apply `operations` to a private copy of `table`.
///
/// The committed table is untouched, so readers holding a snapshot keep
/// seeing the old state.
pub(crate) fn apply_batch(table: &Table, operations: Vec<BatchOperation>) -> Table {
    let mut next = table.clone();
    for op in operations {
        match op {
            BatchOperation::Put { key, value } => {
                next.insert(key, value);
            }
            BatchOperation::Delete { key } => {
                next.remove(&key);
            }
        }
    }
    next
}

/// In-memory key-value store for unit tests.
///
/// Writes build a new table and swap it in, giving snapshot reads for free.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: Arc<Table>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    type Snapshot<'a> = TableSnapshot;

    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot(Arc::clone(&self.data))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.data = Arc::new(apply_batch(&self.data, operations));
        Ok(())
    }
}
