//! Port traits (outbound SPI)

pub mod outbound;
