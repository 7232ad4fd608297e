//! # Chain Store Service
//!
//! Turns a key-value store into an append-only, hash-linked chain.
//!
//! ## Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | 32-byte header hash | `Block::serialize()` |
//! | `"l"` | 32-byte hash of the current tip |
//!
//! Height is never persisted. `open` recovers it by walking the chain once,
//! after which the in-memory [`ChainTip`] is the only mutable state and is
//! advanced only after a commit succeeds.

mod iterator;
mod lifecycle;

pub use iterator::ChainIterator;

use std::path::{Path, PathBuf};

use mc_01_block_production::{BlockAssembler, NeverStop, StopSignal, TimeSource};
use shared_types::{Block, Hash, Transaction};

use crate::domain::errors::{KVStoreError, Result, StorageError};
use crate::ports::outbound::{BatchOperation, KeyValueStore, ReadView};

/// Reserved key holding the tip hash.
pub const TIP_KEY: &[u8] = b"l";

/// Location reported for stores opened without a filesystem path.
pub const IN_MEMORY_LOCATION: &str = ":memory:";

/// Hash and height of the newest block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTip {
    pub hash: Hash,
    pub height: u64,
}

/// Single-writer handle over a persisted chain.
pub struct ChainStore<KV: KeyValueStore, TS: TimeSource> {
    pub(crate) kv: KV,
    pub(crate) assembler: BlockAssembler<TS>,
    pub(crate) tip: ChainTip,
    pub(crate) location: PathBuf,
}

impl<KV: KeyValueStore, TS: TimeSource> ChainStore<KV, TS> {
    /// Current tip.
    pub fn tip(&self) -> ChainTip {
        self.tip
    }

    /// Height of the tip block.
    pub fn height(&self) -> u64 {
        self.tip.height
    }

    /// Where the store lives.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Assembler used for new blocks.
    pub fn assembler(&self) -> &BlockAssembler<TS> {
        &self.assembler
    }

    /// Walk from the tip to genesis over one snapshot.
    pub fn iterate(&self) -> ChainIterator<'_, KV> {
        ChainIterator::new(self.kv.snapshot(), self.tip)
    }

    /// Look a block up by header hash.
    ///
    /// Scans back from the tip, since the height of a block is only known
    /// from its distance to the tip. There is no height index, so every
    /// lookup decodes blocks one by one and costs O(height).
    pub fn get_block(&self, hash: &Hash) -> Result<Block> {
        for block in self.iterate() {
            let block = block?;
            if block.hash() == *hash {
                return Ok(block);
            }
        }
        Err(StorageError::BlockNotFound { hash: *hash })
    }

    /// Mine `transactions` on top of the tip and commit the result.
    pub fn append_block(&mut self, transactions: Vec<Transaction>) -> Result<Block> {
        self.append_block_with(transactions, &NeverStop)
    }

    /// [`append_block`](Self::append_block) with a bound on the nonce search.
    ///
    /// A cancelled search leaves the store and the tip untouched.
    #[tracing::instrument(
        skip(self, transactions, stop),
        fields(height = self.tip.height + 1, tx_count = transactions.len())
    )]
    pub fn append_block_with(
        &mut self,
        transactions: Vec<Transaction>,
        stop: &dyn StopSignal,
    ) -> Result<Block> {
        let parent = self.read_tip_block()?;
        let height = parent.height + 1;
        let bits = self.assembler.bits();

        let block = self
            .assembler
            .assemble(transactions, self.tip.hash, height, bits, stop)?;
        let hash = block.hash();

        self.kv.atomic_batch_write(vec![
            BatchOperation::put(hash.to_vec(), block.serialize()),
            BatchOperation::put(TIP_KEY, hash.to_vec()),
        ])?;
        self.tip = ChainTip { hash, height };

        tracing::info!(
            "[mc-02] ✓ Block #{} appended! Hash: 0x{}, Txs: {}",
            height,
            hex::encode(&hash[..8]),
            block.transactions.len()
        );
        Ok(block)
    }

    /// Release the backend, and with it any lock on the location.
    pub fn close(self) -> KV {
        tracing::debug!("[mc-02] Closing chain store at {}", self.location.display());
        self.kv
    }

    /// Stored tip block, checked against the hash it is filed under.
    fn read_tip_block(&self) -> Result<Block> {
        let snapshot = self.kv.snapshot();
        let bytes = snapshot
            .get(&self.tip.hash)?
            .ok_or(StorageError::BlockNotFound { hash: self.tip.hash })?;
        let block = Block::deserialize(&bytes, self.tip.height)?;
        ensure_filed_under(self.tip.hash, block.hash())?;
        Ok(block)
    }
}

/// A stored value must hash to the key it is filed under.
pub(crate) fn ensure_filed_under(key: Hash, actual: Hash) -> Result<()> {
    if key == actual {
        return Ok(());
    }
    Err(KVStoreError::CorruptionError {
        message: format!(
            "block filed under {} hashes to {}",
            hex::encode(key),
            hex::encode(actual)
        ),
    }
    .into())
}
