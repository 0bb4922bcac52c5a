//! Bounded, time-ordered window of entries.
//!
//! The window keeps at most `capacity` entries sorted by timestamp and
//! evicts the oldest ones when it overflows. Readers only ever see copies.

mod store;

pub use store::WindowStore;
