//! Configuration types for block production

use serde::Deserialize;

use crate::domain::difficulty::Target;
use crate::error::{BlockProductionError, Result};

/// PoW configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoWConfig {
    /// Compact target for new blocks (default: 0x1d00ffff)
    pub bits: u32,

    /// Nonces hashed between stop-signal checks (default: 65_536).
    /// Lower values react to cancellation sooner at a small cost per check.
    pub check_interval: u64,
}

impl Default for PoWConfig {
    fn default() -> Self {
        Self {
            bits: crate::DEFAULT_BITS,
            check_interval: crate::DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl PoWConfig {
    /// Config with the given bits and default polling
    pub fn with_bits(bits: u32) -> Self {
        Self {
            bits,
            ..Self::default()
        }
    }

    /// Reject settings the miner cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.check_interval == 0 {
            return Err(BlockProductionError::InvalidConfig(
                "check_interval must be at least 1".to_string(),
            ));
        }
        Target::from_bits(self.bits).map_err(|_| {
            BlockProductionError::InvalidConfig(format!(
                "bits {:#010x} do not decode to a target",
                self.bits
            ))
        })?;
        Ok(())
    }
}
