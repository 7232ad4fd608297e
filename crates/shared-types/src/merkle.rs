//! # Merkle Builder
//!
//! Reduces an ordered list of transaction ids to one root.
//!
//! ## Algorithm
//!
//! 1. Pair adjacent nodes left to right; an odd last node pairs with itself
//! 2. Parent = sha256d(left || right)
//! 3. Repeat until one node remains
//!
//! At least one pairing round always runs, so a single leaf `h` yields
//! `hash_pair(h, h)` rather than `h`.

use crate::entities::Hash;
use crate::hashing::sha256d;

/// Double-hash the concatenation of two nodes.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    sha256d(&buf)
}

/// Build the merkle root of `leaves`.
///
/// Returns `None` for an empty list. Every block carries at least a coinbase,
/// so callers treat `None` as a block with no transactions.
pub fn build_merkle_root(leaves: &[Hash]) -> Option<Hash> {
    if leaves.is_empty() {
        return None;
    }

    let mut level = leaves.to_vec();
    loop {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                hash_pair(left, pair.get(1).unwrap_or(left))
            })
            .collect();
        if level.len() == 1 {
            return Some(level[0]);
        }
    }
}
