//! # Mini-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── core_benchmarks.rs  # hashing, merkle, mining, append
//! └── src/integration/
//!     ├── chain_flows.rs      # assemble → store → reopen → iterate
//!     └── wire_format.rs      # persisted bytes match the block layout
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mc-tests
//!
//! # Benchmarks
//! cargo bench -p mc-tests
//! ```

pub mod integration;
