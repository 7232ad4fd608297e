//! # Mini-Chain - Block Production Engine (Subsystem 01)
//!
//! **Bounded Context:** Proof of Work & Block Assembly
//!
//! ## Purpose
//!
//! Turns a transaction list into a finished, mined block:
//! - Decodes compact difficulty `bits` into an exact target
//! - Searches the 32-bit nonce space for a header hash below that target
//! - Validates existing headers against their own target
//! - Assembles genesis and successor blocks over the merkle root of their
//!   transaction ids
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - SystemTimeSource, FixedTimeSource                │
//! │  - NeverStop, CancelFlag, Deadline, AttemptBudget   │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Outbound: TimeSource, StopSignal                 │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Target / bits_to_target                          │
//! │  - PoWMiner, validate                               │
//! │  - BlockAssembler, coinbase helpers                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Strict target**: a header is valid iff `hash < target`
//! 2. **One byte order**: hashes compare as big-endian integers in both
//!    mining and validation
//! 3. **Bounded search**: mining ends on success, exhaustion or a stop signal
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use mc_01_block_production::{BlockAssembler, PoWConfig, SystemTimeSource};
//! use mc_01_block_production::domain::genesis_coinbase_tx;
//!
//! let assembler = BlockAssembler::new(PoWConfig::default(), SystemTimeSource);
//! let genesis = assembler.assemble_genesis(genesis_coinbase_tx("alice"), assembler.bits())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Clock and stop-signal adapters
pub mod adapters;
/// Configuration types
pub mod config;
/// Domain models and business logic
pub mod domain;
/// Error types
pub mod error;
/// Hexagonal ports
pub mod ports;

pub use adapters::{AttemptBudget, CancelFlag, Deadline, FixedTimeSource, NeverStop, SystemTimeSource};
pub use config::PoWConfig;
pub use domain::{bits_to_target, validate, BlockAssembler, MinedHeader, PoWMiner, Target};
pub use error::{BlockProductionError, Result};
pub use ports::outbound::{StopSignal, TimeSource};

/// Compact target used by the reference chain (exponent 0x1d, mantissa 0x00ffff)
pub const DEFAULT_BITS: u32 = 0x1d00_ffff;

/// Near-maximal target where roughly every other hash qualifies (regtest-style)
pub const EASY_BITS: u32 = 0x207f_ffff;

/// Header version written into new blocks
pub const BLOCK_VERSION: u32 = 1;

/// Nonces between stop-signal polls
pub const DEFAULT_CHECK_INTERVAL: u64 = 65_536;
