//! Long-poll subscriptions.
//!
//! A subscriber registers with the [`Broadcaster`], receives a single-slot
//! mailbox, and blocks in [`Subscription::wait`] until the next snapshot is
//! pushed or its deadline passes:
//! - Delivery is best effort: if the mailbox still holds an undelivered
//!   snapshot, the newer one is dropped for that subscriber.
//! - Subscriber IDs come from a counter, never from addresses.
//! - Dropping a [`Subscription`] unregisters it, so delivery, timeout and
//!   cancellation all leave the registry clean.
//!
//! # Example
//!
//! ```ignore
//! let broadcaster = Broadcaster::new();
//! let sub = broadcaster.subscribe();
//!
//! match sub.wait(Duration::from_secs(30)) {
//!     Ok(snapshot) => println!("{} entries", snapshot.len()),
//!     Err(FeedError::Timeout(_)) => println!("nothing new"),
//!     Err(e) => return Err(e),
//! }
//! // `sub` is unregistered here.
//! ```

mod manager;
mod types;

pub use manager::Broadcaster;
pub use types::{NotifyStats, SubscriberId, Subscription};
