//! Credo Infrastructure - Adapters for the application ports
//!
//! Concrete implementations of the clock and storage ports: a tokio-backed
//! system clock and file or in-memory token stores.

pub mod adapters;
pub mod persistence;

pub use adapters::SystemClock;
pub use persistence::{FileTokenStorage, MemoryTokenStorage};
