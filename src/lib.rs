//! # Feed Window
//!
//! A bounded, time-ordered window of short text values with regex search
//! and long-poll subscribers.
//!
//! ## Core Concepts
//!
//! - **Window**: the newest `capacity` entries (10 by default), oldest evicted first
//! - **Snapshots**: immutable copies of the window handed to readers
//! - **Search**: regex filtering over a snapshot, no locks held
//! - **Subscriptions**: long-poll waiters with a single-slot mailbox,
//!   unregistered on every exit path
//!
//! ## Example
//!
//! ```ignore
//! use feedwindow::{Feed, FeedConfig};
//!
//! let feed = Arc::new(Feed::new(FeedConfig::default()));
//!
//! feed.put("hello");
//! feed.put("world");
//!
//! let hits = feed.search("^h")?;
//!
//! // In another request handler:
//! let snapshot = feed.long_poll()?; // blocks until the next put, or 30s
//! ```

pub mod api;
pub mod error;
pub mod search;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod window;

// Re-exports
pub use api::{Method, Reply, Status};
pub use error::{FeedError, Result};
pub use search::{query, Pattern};
pub use store::{Feed, FeedConfig, DEFAULT_CAPACITY, DEFAULT_LONG_POLL_TIMEOUT};
pub use subscriptions::{Broadcaster, NotifyStats, SubscriberId, Subscription};
pub use types::{Entry, Snapshot, Timestamp};
pub use window::WindowStore;
