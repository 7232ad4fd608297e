//! Hexagonal ports for block production
//!
//! Outbound (SPI): clock and mining stop conditions the host supplies.

pub mod outbound;
