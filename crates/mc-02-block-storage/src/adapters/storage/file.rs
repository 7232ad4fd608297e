use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared_types::ByteReader;

#[cfg(feature = "locking")]
use crate::adapters::lock::DatabaseLock;
use crate::adapters::storage::memory::{apply_batch, Table, TableSnapshot};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, StoreBackend};

/// File-backed key-value store for production without RocksDB.
///
/// The store is a directory holding one data file and, with the `locking`
/// feature, a `LOCK` file held for the life of the handle. Every batch is
/// applied to a copy of the table, written to a temp file, renamed over the
/// data file and only then made visible to readers.
pub struct FileBackedKVStore {
    data: Arc<Table>,
    file: PathBuf,
    #[cfg(feature = "locking")]
    _lock: DatabaseLock,
}

impl FileBackedKVStore {
    /// Data file name inside the store directory.
    pub const DATA_FILE: &'static str = "blocks.db";

    /// Open the store in `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, KVStoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        #[cfg(feature = "locking")]
        let lock = DatabaseLock::acquire(dir)?;

        let file = dir.join(Self::DATA_FILE);
        let data = match std::fs::read(&file) {
            Ok(bytes) => {
                let table = decode_table(&bytes)?;
                tracing::info!(
                    "[mc-02] 💾 Loaded {} keys from {} ({} bytes)",
                    table.len(),
                    file.display(),
                    bytes.len()
                );
                table
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("[mc-02] 📁 No existing storage file at {}", file.display());
                Table::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            data: Arc::new(data),
            file,
            #[cfg(feature = "locking")]
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    fn save_to_file(&self, table: &Table) -> Result<(), KVStoreError> {
        let bytes = encode_table(table);

        // Write atomically via temp file
        let temp_path = self.file.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &self.file)?;

        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    type Snapshot<'a> = TableSnapshot;

    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot(Arc::clone(&self.data))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let next = apply_batch(&self.data, operations);
        self.save_to_file(&next)?;
        self.data = Arc::new(next);
        Ok(())
    }
}

impl StoreBackend for FileBackedKVStore {
    fn exists_at(path: &Path) -> bool {
        path.join(Self::DATA_FILE).is_file()
    }

    fn open_at(path: &Path) -> Result<Self, KVStoreError> {
        Self::open(path)
    }
}

/// `[key_len u32][key][value_len u32][value]...`, little endian.
fn encode_table(table: &Table) -> Vec<u8> {
    let size: usize = table.iter().map(|(k, v)| 8 + k.len() + v.len()).sum();
    let mut bytes = Vec::with_capacity(size);
    for (key, value) in table {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn decode_table(bytes: &[u8]) -> Result<Table, KVStoreError> {
    let corrupt = |e: shared_types::CodecError| KVStoreError::CorruptionError {
        message: format!("storage file: {}", e),
    };

    let mut reader = ByteReader::new(bytes);
    let mut table = Table::new();
    while !reader.is_empty() {
        let key_len = reader.read_u32_le().map_err(corrupt)? as usize;
        let key = reader.read_bytes(key_len).map_err(corrupt)?.to_vec();
        let value_len = reader.read_u32_le().map_err(corrupt)? as usize;
        let value = reader.read_bytes(value_len).map_err(corrupt)?.to_vec();
        table.insert(key, value);
    }
    Ok(table)
}
