//! Process-level exclusive locking of store directories

mod flock;

pub use flock::{DatabaseLock, LockError};
