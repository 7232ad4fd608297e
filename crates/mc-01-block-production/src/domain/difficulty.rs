//! Compact difficulty targets
//!
//! The header `bits` field packs a large integer as an 8-bit exponent and a
//! 24-bit mantissa:
//!
//! ```text
//! target = mantissa << 8 * (exponent - 3)
//! ```
//!
//! A header is valid when its hash, read as a big-endian integer, is strictly
//! below the target. A higher target is easier.

use num_bigint::BigUint;
use primitive_types::U256;
use shared_types::Hash;

use crate::error::{BlockProductionError, Result};

/// Decoded difficulty target.
///
/// Holds the exact value plus a 256-bit threshold used on the mining hot
/// path. Targets at or above 2^256 have no threshold: every hash meets them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    value: BigUint,
    threshold: Option<U256>,
}

impl Target {
    /// Decode compact `bits` into a target
    pub fn from_bits(bits: u32) -> Result<Self> {
        let exponent = bits >> 24;
        let mantissa = bits & 0x00ff_ffff;
        if mantissa == 0 || exponent < 3 {
            return Err(BlockProductionError::InvalidDifficulty { bits });
        }

        let shift = 8 * (exponent - 3) as usize;
        let value = BigUint::from(mantissa) << shift;
        let threshold = if value.bits() <= 256 {
            Some(U256::from_big_endian(&value.to_bytes_be()))
        } else {
            None
        };
        Ok(Self { value, threshold })
    }

    /// Exact target value
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Target as a 256-bit integer, `None` when it exceeds the hash space
    pub fn as_u256(&self) -> Option<U256> {
        self.threshold
    }

    /// True iff `hash` read as a big-endian integer is strictly below the target
    #[inline]
    pub fn is_met_by(&self, hash: &Hash) -> bool {
        match self.threshold {
            Some(threshold) => U256::from_big_endian(hash) < threshold,
            None => true,
        }
    }
}

/// Decode compact `bits` into the exact target value
pub fn bits_to_target(bits: u32) -> Result<BigUint> {
    Target::from_bits(bits).map(|target| target.value)
}

/// Interpret a digest as an unsigned big-endian integer
pub fn hash_to_integer(hash: &Hash) -> BigUint {
    BigUint::from_bytes_be(hash)
}
