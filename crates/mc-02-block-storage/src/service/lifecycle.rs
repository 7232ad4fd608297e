//! Creating and opening chains.

use std::path::{Path, PathBuf};

use mc_01_block_production::domain::genesis_coinbase_tx;
use mc_01_block_production::{BlockAssembler, TimeSource};
use shared_types::{Block, BlockHeader, Hash, ZERO_HASH};

use super::{ensure_filed_under, ChainStore, ChainTip, IN_MEMORY_LOCATION, TIP_KEY};
use crate::domain::errors::{KVStoreError, Result, StorageError};
use crate::ports::outbound::{BatchOperation, KeyValueStore, ReadView, StoreBackend};

impl<KV: StoreBackend, TS: TimeSource> ChainStore<KV, TS> {
    /// Create a chain at `path` starting from `genesis`.
    ///
    /// Fails with `AlreadyExists` if a store is already there. A rejected
    /// genesis fails before anything is created at `path`.
    pub fn initialize(path: &Path, genesis: Block, assembler: BlockAssembler<TS>) -> Result<Self> {
        check_genesis(&genesis)?;
        if KV::exists_at(path) {
            return Err(StorageError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let kv = KV::open_at(path)?;
        Self::create(kv, path.to_path_buf(), genesis, assembler)
    }

    /// Mine a genesis block paying `address` and create a chain at `path`.
    pub fn initialize_with_address(
        path: &Path,
        address: &str,
        assembler: BlockAssembler<TS>,
    ) -> Result<Self> {
        if KV::exists_at(path) {
            return Err(StorageError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let genesis = assembler.assemble_genesis(genesis_coinbase_tx(address), assembler.bits())?;
        tracing::info!(
            "[mc-02] Genesis mined for {}: 0x{}",
            address,
            hex::encode(genesis.hash())
        );
        Self::initialize(path, genesis, assembler)
    }

    /// Open the chain at `path`.
    ///
    /// Fails with `NotFound` if nothing was ever created there.
    pub fn open(path: &Path, assembler: BlockAssembler<TS>) -> Result<Self> {
        if !KV::exists_at(path) {
            return Err(StorageError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let kv = KV::open_at(path)?;
        Self::load(kv, path.to_path_buf(), assembler)
    }
}

impl<KV: KeyValueStore, TS: TimeSource> ChainStore<KV, TS> {
    /// Create a chain inside an already opened store.
    pub fn initialize_in(kv: KV, genesis: Block, assembler: BlockAssembler<TS>) -> Result<Self> {
        Self::create(kv, PathBuf::from(IN_MEMORY_LOCATION), genesis, assembler)
    }

    /// Open the chain held by an already opened store.
    pub fn open_in(kv: KV, assembler: BlockAssembler<TS>) -> Result<Self> {
        Self::load(kv, PathBuf::from(IN_MEMORY_LOCATION), assembler)
    }

    fn create(
        mut kv: KV,
        location: PathBuf,
        genesis: Block,
        assembler: BlockAssembler<TS>,
    ) -> Result<Self> {
        if kv.exists(TIP_KEY)? {
            return Err(StorageError::AlreadyExists { path: location });
        }
        check_genesis(&genesis)?;

        let hash = genesis.hash();
        kv.atomic_batch_write(vec![
            BatchOperation::put(hash.to_vec(), genesis.serialize()),
            BatchOperation::put(TIP_KEY, hash.to_vec()),
        ])?;

        tracing::info!(
            "[mc-02] 📦 Chain created at {} with genesis 0x{}",
            location.display(),
            hex::encode(&hash[..8])
        );
        Ok(Self {
            kv,
            assembler,
            tip: ChainTip { hash, height: 0 },
            location,
        })
    }

    fn load(kv: KV, location: PathBuf, assembler: BlockAssembler<TS>) -> Result<Self> {
        let raw = kv.get(TIP_KEY)?.ok_or(StorageError::TipMissing)?;
        let hash: Hash = raw.as_slice().try_into().map_err(|_| KVStoreError::CorruptionError {
            message: format!("tip pointer is {} bytes, expected 32", raw.len()),
        })?;
        let height = recover_height(&kv.snapshot(), hash)?;

        tracing::info!(
            "[mc-02] 💾 Opened chain at {}: height {}, tip 0x{}",
            location.display(),
            height,
            hex::encode(&hash[..8])
        );
        Ok(Self {
            kv,
            assembler,
            tip: ChainTip { hash, height },
            location,
        })
    }
}

fn check_genesis(genesis: &Block) -> Result<()> {
    if !genesis.is_genesis() {
        return Err(StorageError::InvalidGenesis {
            reason: "previous block hash is not all zero".to_string(),
        });
    }
    if genesis.height != 0 {
        return Err(StorageError::InvalidGenesis {
            reason: format!("height is {}, expected 0", genesis.height),
        });
    }
    Ok(())
}

/// Count parent links from `tip` down to genesis.
///
/// Only headers are decoded. Each header must hash to the key it was read
/// from, so a parent cycle ends in a corruption error.
fn recover_height(view: &impl ReadView, tip: Hash) -> Result<u64> {
    let mut height = 0u64;
    let mut cursor = tip;
    loop {
        let bytes = view
            .get(&cursor)?
            .ok_or(StorageError::BlockNotFound { hash: cursor })?;
        let header = BlockHeader::deserialize(&bytes)?;
        ensure_filed_under(cursor, header.hash())?;
        if header.prev_block_hash == ZERO_HASH {
            return Ok(height);
        }
        cursor = header.prev_block_hash;
        height += 1;
    }
}
