//! Domain models and business logic

pub mod assembler;
pub mod difficulty;
pub mod genesis;
pub mod services;

pub use assembler::BlockAssembler;
pub use difficulty::{bits_to_target, hash_to_integer, Target};
pub use genesis::{
    genesis_coinbase_tx, new_coinbase_tx, COINBASE_REWARD, GENESIS_COINBASE_DATA, TX_VERSION,
};
pub use services::{validate, MinedHeader, PoWMiner};
