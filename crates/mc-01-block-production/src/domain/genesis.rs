//! Coinbase and genesis inputs
//!
//! The chain starts from a single coinbase paying `COINBASE_REWARD` to the
//! supplied address commitment. Address format is the caller's concern.

use shared_types::{Transaction, TxIn, TxOut};

/// Coinbase data embedded in the genesis block
pub const GENESIS_COINBASE_DATA: &str =
    "The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";

/// Value credited by every coinbase
pub const COINBASE_REWARD: i64 = 10;

/// Transaction format version
pub const TX_VERSION: i32 = 1;

/// Creates a coinbase transaction for block mining reward
///
/// An empty `data` is replaced with `Reward to '<to>'`.
pub fn new_coinbase_tx(to: &str, data: &str) -> Transaction {
    let data = if data.is_empty() {
        format!("Reward to '{}'", to)
    } else {
        data.to_string()
    };

    Transaction::new(
        TX_VERSION,
        vec![TxIn::coinbase(data.into_bytes())],
        vec![TxOut::new(COINBASE_REWARD, to.as_bytes().to_vec())],
        0,
    )
}

/// The coinbase carried by a genesis block for `to`
pub fn genesis_coinbase_tx(to: &str) -> Transaction {
    new_coinbase_tx(to, GENESIS_COINBASE_DATA)
}
