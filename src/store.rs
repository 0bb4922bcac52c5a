//! Main Feed struct tying the window and the broadcaster together.

use crate::error::Result;
use crate::search;
use crate::subscriptions::{Broadcaster, NotifyStats, Subscription};
use crate::types::{Entry, Snapshot};
use crate::window::WindowStore;
use crossbeam_channel::Receiver;
use std::time::Duration;
use tracing::{debug, info};

/// Default number of entries retained in the window.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default server-side deadline for a long-poll request.
pub const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Feed configuration.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Maximum number of retained entries. Clamped to at least 1.
    pub capacity: usize,

    /// How long a long-poll waits for a change before timing out.
    pub long_poll_timeout: Duration,
}

impl FeedConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_long_poll_timeout(mut self, timeout: Duration) -> Self {
        self.long_poll_timeout = timeout;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            long_poll_timeout: DEFAULT_LONG_POLL_TIMEOUT,
        }
    }
}

/// The feed.
///
/// Provides a unified interface for:
/// - Appending values to the bounded window
/// - Reading and searching snapshots of the window
/// - Long-polling for the next change
///
/// Share it between request handlers behind an `Arc`; there is no global
/// instance.
pub struct Feed {
    config: FeedConfig,
    window: WindowStore,
    broadcaster: Broadcaster,
}

impl Feed {
    pub fn new(config: FeedConfig) -> Self {
        info!(
            capacity = config.capacity,
            long_poll_timeout = ?config.long_poll_timeout,
            "feed created"
        );
        Self {
            window: WindowStore::new(config.capacity),
            broadcaster: Broadcaster::new(),
            config,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    // --- Writes ---

    /// Append `value` and push the resulting window to every subscriber.
    ///
    /// The window lock is released before subscribers are notified; the two
    /// locks are never held together.
    pub fn put(&self, value: impl Into<String>) -> Entry {
        let entry = self.window.append(value);
        debug!(timestamp = %entry.timestamp(), "appended entry");

        self.notify();
        entry
    }

    /// Push the current window to every subscriber.
    pub fn notify(&self) -> NotifyStats {
        let snapshot = self.window.snapshot();
        self.broadcaster.notify(&snapshot)
    }

    // --- Reads ---

    /// Current window, oldest first.
    pub fn get(&self) -> Snapshot {
        self.window.snapshot()
    }

    /// Entries whose value matches the regular expression `pattern`.
    pub fn search(&self, pattern: &str) -> Result<Vec<Entry>> {
        let pattern = search::Pattern::new(pattern)?;
        Ok(pattern.filter(&self.window.snapshot()))
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    // --- Long-poll ---

    /// Register a subscriber. It stays registered until the handle is dropped.
    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    /// Wait for the next change, up to the configured long-poll timeout.
    pub fn long_poll(&self) -> Result<Snapshot> {
        let subscription = self.broadcaster.subscribe();
        let result = self
            .broadcaster
            .wait(&subscription, self.config.long_poll_timeout);
        self.broadcaster.unsubscribe(subscription);
        result
    }

    /// Like [`long_poll`](Self::long_poll), but also returns early with
    /// `Cancelled` when the client goes away.
    pub fn long_poll_cancellable(&self, cancel: &Receiver<()>) -> Result<Snapshot> {
        let subscription = self.broadcaster.subscribe();
        let result = subscription.wait_cancellable(self.config.long_poll_timeout, cancel);
        self.broadcaster.unsubscribe(subscription);
        result
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.subscriber_count()
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}
