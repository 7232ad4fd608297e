//! Outbound ports (driven side - SPI)

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> u64;
}

/// Polled by the miner to bound a nonce search.
///
/// Checked once every `check_interval` nonces with the number of hashes
/// computed so far.
pub trait StopSignal: Send + Sync {
    /// Return true to abandon the search.
    fn should_stop(&self, attempts: u64) -> bool;
}
