//! Block assembly
//!
//! Combines merkle aggregation, header construction and mining into a
//! finished `Block`.

use shared_types::{build_merkle_root, Block, BlockHeader, Hash, Transaction, ZERO_HASH};

use crate::adapters::NeverStop;
use crate::config::PoWConfig;
use crate::domain::services::PoWMiner;
use crate::error::{BlockProductionError, Result};
use crate::ports::outbound::{StopSignal, TimeSource};

/// Builds and mines genesis and successor blocks
pub struct BlockAssembler<TS: TimeSource> {
    miner: PoWMiner,
    time_source: TS,
}

impl<TS: TimeSource> BlockAssembler<TS> {
    /// Assembler mining with `config` and stamping headers from `time_source`
    pub fn new(config: PoWConfig, time_source: TS) -> Self {
        Self {
            miner: PoWMiner::new(config),
            time_source,
        }
    }

    /// Compact target used when the caller does not pick one
    pub fn bits(&self) -> u32 {
        self.miner.config().bits
    }

    /// The underlying miner
    pub fn miner(&self) -> &PoWMiner {
        &self.miner
    }

    /// Height 0, zero parent, merkle root over `[coinbase]`
    pub fn assemble_genesis(&self, coinbase: Transaction, bits: u32) -> Result<Block> {
        self.assemble(vec![coinbase], ZERO_HASH, 0, bits, &NeverStop)
    }

    /// Successor of `prev_hash` at `height`
    pub fn assemble_next(
        &self,
        transactions: Vec<Transaction>,
        prev_hash: Hash,
        height: u64,
        bits: u32,
    ) -> Result<Block> {
        self.assemble(transactions, prev_hash, height, bits, &NeverStop)
    }

    /// Build a header over `transactions` and mine it until `stop` fires.
    #[tracing::instrument(
        skip(self, transactions, prev_hash, stop),
        fields(tx_count = transactions.len())
    )]
    pub fn assemble(
        &self,
        transactions: Vec<Transaction>,
        prev_hash: Hash,
        height: u64,
        bits: u32,
        stop: &dyn StopSignal,
    ) -> Result<Block> {
        let ids: Vec<Hash> = transactions.iter().map(Transaction::id).collect();
        let merkle_root = build_merkle_root(&ids).ok_or(BlockProductionError::EmptyBlock)?;

        let seconds = self.time_source.now();
        let timestamp = u32::try_from(seconds)
            .map_err(|_| BlockProductionError::TimestampOutOfRange { seconds })?;

        let template = BlockHeader {
            version: crate::BLOCK_VERSION,
            prev_block_hash: prev_hash,
            merkle_root,
            timestamp,
            bits,
            nonce: 0,
        };
        let mined = self.miner.mine(&template, stop)?;

        tracing::info!(
            height,
            hash = %hex::encode(mined.hash),
            "[mc-01] Block assembled"
        );

        Ok(Block {
            header: mined.header,
            transactions,
            height,
        })
    }
}
