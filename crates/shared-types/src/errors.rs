//! # Error Types
//!
//! Errors raised by the wire codecs and the transaction arithmetic. They are
//! always handed back to the caller; nothing here pads, defaults or retries.

use crate::entities::Hash;
use thiserror::Error;

/// Result alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors produced while encoding, decoding or evaluating wire records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The decoder ran out of bytes before the record was complete.
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// A header field has the wrong shape.
    #[error("Malformed header: {reason}")]
    MalformedHeader { reason: String },

    /// Fee calculation was handed a mapping without the referenced transaction.
    #[error("Missing resolution for previous transaction {}", hex::encode(tx_id))]
    MissingResolution { tx_id: Hash },

    /// A resolved transaction has no output at the referenced index.
    #[error("Transaction {} has no output {index}", hex::encode(tx_id))]
    OutputIndexOutOfRange { tx_id: Hash, index: u32 },

    /// Summing output values overflowed a signed 64-bit integer.
    #[error("Value overflow while summing amounts")]
    ValueOverflow,

    /// A length prefix does not fit in addressable memory.
    #[error("Length prefix {length} exceeds platform limits")]
    LengthOverflow { length: u64 },

    /// A record decoded cleanly but left bytes behind.
    #[error("Trailing bytes after record: {remaining}")]
    TrailingBytes { remaining: usize },

    /// Input to the Base58 decoder contains a character outside the alphabet.
    #[error("Invalid Base58 character {character:?} at position {position}")]
    InvalidBase58Character { character: char, position: usize },
}

impl CodecError {
    /// True for errors caused by malformed bytes rather than caller input.
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            Self::TruncatedInput { .. }
                | Self::MalformedHeader { .. }
                | Self::LengthOverflow { .. }
                | Self::TrailingBytes { .. }
        )
    }
}
