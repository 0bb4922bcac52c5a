//! Subscription types for long-poll waiters.

use crate::error::{FeedError, Result};
use crate::types::Snapshot;
use crossbeam_channel::{select, Receiver, RecvTimeoutError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::manager::Registry;

/// Unique identifier for a subscriber, issued from a counter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub u64);

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one `notify` pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NotifyStats {
    /// Mailboxes that accepted the snapshot.
    pub delivered: usize,
    /// Mailboxes that already held a pending snapshot.
    pub dropped: usize,
}

/// A registered long-poll waiter.
///
/// The subscriber owns a single-slot mailbox. It stays registered until the
/// handle is dropped or passed to
/// [`Broadcaster::unsubscribe`](super::Broadcaster::unsubscribe), so
/// deregistration happens exactly once on every exit path, including unwinds.
pub struct Subscription {
    id: SubscriberId,
    receiver: Receiver<Snapshot>,
    registry: Arc<Registry>,
}

impl Subscription {
    pub(super) fn new(id: SubscriberId, receiver: Receiver<Snapshot>, registry: Arc<Registry>) -> Self {
        Self {
            id,
            receiver,
            registry,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Take a pending snapshot without blocking.
    pub fn try_recv(&self) -> Option<Snapshot> {
        self.receiver.try_recv().ok()
    }

    /// Block until a snapshot arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Result<Snapshot> {
        match self.receiver.recv_timeout(timeout) {
            Ok(snapshot) => Ok(snapshot),
            Err(RecvTimeoutError::Timeout) => {
                debug!(subscriber = %self.id, ?timeout, "long-poll timed out");
                Err(FeedError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(FeedError::Cancelled),
        }
    }

    /// Like [`wait`](Self::wait), but also gives up when `cancel` receives a
    /// message or its sender is dropped.
    pub fn wait_cancellable(&self, timeout: Duration, cancel: &Receiver<()>) -> Result<Snapshot> {
        select! {
            recv(self.receiver) -> msg => msg.map_err(|_| FeedError::Cancelled),
            recv(cancel) -> _ => {
                debug!(subscriber = %self.id, "long-poll cancelled");
                Err(FeedError::Cancelled)
            }
            default(timeout) => {
                debug!(subscriber = %self.id, ?timeout, "long-poll timed out");
                Err(FeedError::Timeout(timeout))
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pending", &!self.receiver.is_empty())
            .finish()
    }
}
