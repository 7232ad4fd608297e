//! Cross-crate integration flows

pub mod chain_flows;
pub mod wire_format;
