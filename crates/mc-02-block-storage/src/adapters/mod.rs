//! Concrete implementations of the outbound ports

#[cfg(feature = "locking")]
pub mod lock;
pub mod storage;
