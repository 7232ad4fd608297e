//! # Stop Signals
//!
//! Ways to bound a nonce search: never, on a shared flag, at a wall-clock
//! deadline, or after a fixed number of hashes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ports::outbound::StopSignal;

/// Search the whole range.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverStop;

impl StopSignal for NeverStop {
    fn should_stop(&self, _attempts: u64) -> bool {
        false
    }
}

/// Cancellation flag shared between the miner and whoever may abort it.
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// New, not yet cancelled flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this flag to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether `cancel` has been called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl StopSignal for CancelFlag {
    fn should_stop(&self, _attempts: u64) -> bool {
        self.is_cancelled()
    }
}

/// Stop once a wall-clock instant has passed.
#[derive(Clone, Copy, Debug)]
pub struct Deadline(pub Instant);

impl Deadline {
    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }
}

impl StopSignal for Deadline {
    fn should_stop(&self, _attempts: u64) -> bool {
        Instant::now() >= self.0
    }
}

/// Stop after a fixed number of hashes.
///
/// Granularity is the miner's check interval.
#[derive(Clone, Copy, Debug)]
pub struct AttemptBudget(pub u64);

impl StopSignal for AttemptBudget {
    fn should_stop(&self, attempts: u64) -> bool {
        attempts >= self.0
    }
}
