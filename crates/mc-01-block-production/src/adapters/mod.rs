//! Adapters for the outbound ports

pub mod stop;
pub mod time;

pub use stop::{AttemptBudget, CancelFlag, Deadline, NeverStop};
pub use time::{FixedTimeSource, SystemTimeSource};
