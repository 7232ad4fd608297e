//! Backward iteration from tip to genesis.

use shared_types::{Block, Hash};

use super::{ensure_filed_under, ChainTip};
use crate::domain::errors::{Result, StorageError};
use crate::ports::outbound::{KeyValueStore, ReadView};

/// Blocks from the tip back to genesis, read from one snapshot.
///
/// Appends committed after the iterator was created are not seen. The
/// iterator ends after genesis or after the first error.
pub struct ChainIterator<'a, KV: KeyValueStore + 'a> {
    snapshot: KV::Snapshot<'a>,
    next: Option<Hash>,
    height: u64,
}

impl<'a, KV: KeyValueStore + 'a> ChainIterator<'a, KV> {
    pub(crate) fn new(snapshot: KV::Snapshot<'a>, tip: ChainTip) -> Self {
        Self {
            snapshot,
            next: Some(tip.hash),
            height: tip.height,
        }
    }

    fn read(&self, hash: Hash) -> Result<Block> {
        let bytes = self
            .snapshot
            .get(&hash)?
            .ok_or(StorageError::BlockNotFound { hash })?;
        let block = Block::deserialize(&bytes, self.height)?;
        ensure_filed_under(hash, block.hash())?;
        Ok(block)
    }
}

impl<'a, KV: KeyValueStore + 'a> Iterator for ChainIterator<'a, KV> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.next.take()?;
        let block = match self.read(hash) {
            Ok(block) => block,
            Err(err) => return Some(Err(err)),
        };

        if !block.is_genesis() {
            if self.height == 0 {
                return Some(Err(StorageError::BrokenLink { hash }));
            }
            self.height -= 1;
            self.next = Some(block.header.prev_block_hash);
        }
        Some(Ok(block))
    }
}
