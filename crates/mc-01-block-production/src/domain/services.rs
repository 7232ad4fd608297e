//! Proof-of-work search and validation

use std::ops::RangeInclusive;
use std::time::Instant;

use shared_types::{sha256d, BlockHeader, Hash, NONCE_OFFSET};

use crate::config::PoWConfig;
use crate::domain::difficulty::Target;
use crate::error::{BlockProductionError, Result};
use crate::ports::outbound::StopSignal;

/// A header whose nonce satisfies its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinedHeader {
    /// Header with the winning nonce filled in
    pub header: BlockHeader,
    /// Its double SHA-256
    pub hash: Hash,
    /// Nonces hashed, including the winning one
    pub attempts: u64,
}

/// Single-threaded nonce search over an 80-byte header
#[derive(Clone, Debug, Default)]
pub struct PoWMiner {
    config: PoWConfig,
}

impl PoWMiner {
    /// Create a miner with the given polling configuration
    pub fn new(config: PoWConfig) -> Self {
        Self { config }
    }

    /// The miner's configuration
    pub fn config(&self) -> &PoWConfig {
        &self.config
    }

    /// Search the full nonce range starting at zero.
    ///
    /// Every field except the nonce is held fixed. Fails with
    /// `NonceSpaceExhausted` when all 2^32 nonces miss, or `Cancelled` when
    /// `stop` fires first.
    pub fn mine(&self, header: &BlockHeader, stop: &dyn StopSignal) -> Result<MinedHeader> {
        self.mine_range(header, 0..=u32::MAX, stop)
    }

    /// Search `nonces` in ascending order.
    #[tracing::instrument(
        skip(self, header, stop),
        fields(bits = header.bits, start = *nonces.start(), end = *nonces.end())
    )]
    pub fn mine_range(
        &self,
        header: &BlockHeader,
        nonces: RangeInclusive<u32>,
        stop: &dyn StopSignal,
    ) -> Result<MinedHeader> {
        let target = Target::from_bits(header.bits)?;
        let interval = self.config.check_interval.max(1);
        let mut bytes = header.serialize();
        let started = Instant::now();
        let mut attempts: u64 = 0;

        tracing::debug!("[mc-01] Starting PoW search");

        for nonce in nonces {
            if attempts % interval == 0 {
                if stop.should_stop(attempts) {
                    tracing::warn!(attempts, "[mc-01] PoW search cancelled");
                    return Err(BlockProductionError::Cancelled { attempts });
                }
                if attempts > 0 {
                    tracing::debug!(attempts, nonce, "[mc-01] PoW search progress");
                }
            }

            bytes[NONCE_OFFSET..].copy_from_slice(&nonce.to_le_bytes());
            let hash = sha256d(&bytes);
            attempts += 1;

            if target.is_met_by(&hash) {
                let elapsed = started.elapsed();
                tracing::info!(
                    nonce,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    hash = %hex::encode(hash),
                    "[mc-01] PoW mining successful"
                );
                return Ok(MinedHeader {
                    header: BlockHeader { nonce, ..*header },
                    hash,
                    attempts,
                });
            }
        }

        tracing::warn!(attempts, "[mc-01] PoW mining failed: no valid nonce found");
        Err(BlockProductionError::NonceSpaceExhausted {
            bits: header.bits,
            attempts,
        })
    }
}

/// Recompute the header hash and check it against the header's own target.
///
/// Headers whose bits do not decode are never valid.
pub fn validate(header: &BlockHeader) -> bool {
    match Target::from_bits(header.bits) {
        Ok(target) => target.is_met_by(&header.hash()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AttemptBudget, CancelFlag, NeverStop};
    use crate::domain::difficulty::hash_to_integer;
    use crate::EASY_BITS;

    fn template(bits: u32) -> BlockHeader {
        BlockHeader {
            version: 1,
            prev_block_hash: [0x11; 32],
            merkle_root: [0x22; 32],
            timestamp: 1_700_000_000,
            bits,
            nonce: 0xdead_beef,
        }
    }

    fn small_interval_miner() -> PoWMiner {
        PoWMiner::new(PoWConfig {
            bits: EASY_BITS,
            check_interval: 4,
        })
    }

    #[test]
    fn test_mined_header_validates() {
        let miner = PoWMiner::default();
        let mined = miner.mine(&template(EASY_BITS), &NeverStop).unwrap();

        assert!(validate(&mined.header));
        assert_eq!(mined.hash, mined.header.hash());
        assert_eq!(mined.attempts, u64::from(mined.header.nonce) + 1);
        let target = Target::from_bits(EASY_BITS).unwrap();
        assert!(hash_to_integer(&mined.hash) < *target.value());
    }

    #[test]
    fn test_mining_keeps_other_fields() {
        let header = template(0x1f00_ffff);
        let mined = PoWMiner::default().mine(&header, &NeverStop).unwrap();
        assert_eq!(
            BlockHeader {
                nonce: header.nonce,
                ..mined.header
            },
            header
        );
    }

    #[test]
    fn test_mining_returns_first_valid_nonce() {
        let header = template(0x1f00_ffff);
        let mined = PoWMiner::default().mine(&header, &NeverStop).unwrap();
        for nonce in 0..mined.header.nonce {
            assert!(!validate(&BlockHeader { nonce, ..header }));
        }
    }

    #[test]
    fn test_invalid_bits_rejected_before_search() {
        let err = PoWMiner::default()
            .mine(&template(0x1d00_0000), &NeverStop)
            .unwrap_err();
        assert_eq!(err, BlockProductionError::InvalidDifficulty { bits: 0x1d00_0000 });
        assert!(!validate(&template(0x1d00_0000)));
    }

    #[test]
    fn test_exhausted_range() {
        // target = 1: only an all-zero hash would do
        let err = PoWMiner::default()
            .mine_range(&template(0x0300_0001), 0..=99, &NeverStop)
            .unwrap_err();
        assert_eq!(
            err,
            BlockProductionError::NonceSpaceExhausted {
                bits: 0x0300_0001,
                attempts: 100
            }
        );
    }

    #[test]
    fn test_cancel_flag_stops_search() {
        let flag = CancelFlag::new();
        flag.cancel();
        let err = small_interval_miner()
            .mine(&template(0x0300_0001), &flag)
            .unwrap_err();
        assert_eq!(err, BlockProductionError::Cancelled { attempts: 0 });
    }

    #[test]
    fn test_attempt_budget_bounds_search() {
        let err = small_interval_miner()
            .mine(&template(0x0300_0001), &AttemptBudget(10))
            .unwrap_err();
        // checks happen every 4 hashes: 4, 8, 12
        assert_eq!(err, BlockProductionError::Cancelled { attempts: 12 });
    }

    #[test]
    fn test_validate_unmined_header() {
        assert!(!validate(&template(0x0300_0001)));
        // 0x2300_0001 decodes to 2^256, above every digest
        assert!(validate(&template(0x2300_0001)));
    }

    #[test]
    #[ignore = "expects about 2^32 double hashes at genesis difficulty"]
    fn test_mine_genesis_difficulty() {
        let mined = PoWMiner::default()
            .mine(&template(crate::DEFAULT_BITS), &NeverStop)
            .unwrap();
        let target = Target::from_bits(crate::DEFAULT_BITS).unwrap();
        assert!(hash_to_integer(&mined.hash) < *target.value());
    }
}
