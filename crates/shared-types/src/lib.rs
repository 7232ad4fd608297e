//! # Shared Types Crate
//!
//! Wire-level building blocks used by every Mini-Chain subsystem:
//!
//! - `codec` - VarInt and length-prefixed byte strings, `ByteReader` cursor
//! - `hashing` - SHA-256 and double SHA-256
//! - `merkle` - pairwise double-hash merkle root
//! - `entities` - `Transaction`, `BlockHeader`, `Block` and their encodings
//! - `base58` - Base58 text encoding
//! - `errors` - `CodecError`
//!
//! ## Design Principles
//!
//! - **Single encoding**: each type has exactly one canonical byte form, and
//!   identities are always derived from it.
//! - **No panics**: malformed input surfaces as a `CodecError`.

pub mod base58;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod merkle;

pub use codec::{
    decode_var_bytes, decode_var_int, encode_var_bytes, encode_var_int, ByteReader,
};
pub use entities::*;
pub use errors::*;
pub use hashing::{sha256, sha256d};
pub use merkle::{build_merkle_root, hash_pair};
