//! Error types for block production subsystem

use thiserror::Error;

/// Result type alias for block production operations
pub type Result<T> = std::result::Result<T, BlockProductionError>;

/// Errors that can occur during block production
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockProductionError {
    /// Compact bits decode to a zero mantissa or an exponent below 3
    #[error("Invalid difficulty bits: {bits:#010x}")]
    InvalidDifficulty {
        /// Offending compact encoding
        bits: u32,
    },

    /// Every nonce in the searched range missed the target
    #[error("Nonce space exhausted after {attempts} attempts at bits {bits:#010x}")]
    NonceSpaceExhausted {
        /// Compact target that was searched
        bits: u32,
        /// Hashes computed
        attempts: u64,
    },

    /// The stop signal fired before a valid nonce was found
    #[error("Mining cancelled after {attempts} attempts")]
    Cancelled {
        /// Hashes computed before stopping
        attempts: u64,
    },

    /// A block needs at least one transaction for its merkle root
    #[error("Cannot assemble a block without transactions")]
    EmptyBlock,

    /// The clock reading does not fit the 32-bit header timestamp
    #[error("Timestamp {seconds} does not fit in a header")]
    TimestampOutOfRange {
        /// Seconds since the epoch reported by the time source
        seconds: u64,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BlockProductionError {
    /// Check if error is recoverable (caller may retry with a fresh header)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NonceSpaceExhausted { .. } | Self::Cancelled { .. }
        )
    }

    /// Check if error is critical (retrying with the same inputs cannot succeed)
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::InvalidDifficulty { .. }
                | Self::InvalidConfig(_)
                | Self::EmptyBlock
                | Self::TimestampOutOfRange { .. }
        )
    }
}
