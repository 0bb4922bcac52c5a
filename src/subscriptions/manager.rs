//! Broadcaster fanning snapshots out to long-poll subscribers.

use crate::error::Result;
use crate::types::Snapshot;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use super::types::{NotifyStats, SubscriberId, Subscription};

/// Each subscriber holds at most one undelivered snapshot.
const MAILBOX_SLOTS: usize = 1;

/// Shared subscriber registry. Subscriptions keep an `Arc` to it so they can
/// deregister themselves on drop.
pub(crate) struct Registry {
    /// Mailbox senders by subscriber ID.
    mailboxes: Mutex<HashMap<SubscriberId, Sender<Snapshot>>>,
    /// Counter for generating subscriber IDs.
    next_id: AtomicU64,
}

impl Registry {
    pub(super) fn remove(&self, id: SubscriberId) {
        if self.mailboxes.lock().remove(&id).is_some() {
            debug!(subscriber = %id, "unsubscribed");
        }
    }
}

/// Registers long-poll subscribers and pushes snapshots to them.
///
/// Clones share the same registry.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                mailboxes: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a new subscriber with an empty mailbox.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.registry.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver): (Sender<Snapshot>, Receiver<Snapshot>) = bounded(MAILBOX_SLOTS);

        self.registry.mailboxes.lock().insert(id, sender);
        debug!(subscriber = %id, "subscribed");

        Subscription::new(id, receiver, Arc::clone(&self.registry))
    }

    /// Offer `snapshot` to every subscriber without blocking.
    ///
    /// A subscriber whose mailbox is still full keeps its older snapshot and
    /// misses this one.
    pub fn notify(&self, snapshot: &Snapshot) -> NotifyStats {
        let mut stats = NotifyStats::default();

        let mailboxes = self.registry.mailboxes.lock();
        for (id, sender) in mailboxes.iter() {
            match sender.try_send(snapshot.clone()) {
                Ok(()) => stats.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    trace!(subscriber = %id, "mailbox full, snapshot dropped");
                    stats.dropped += 1;
                }
                // Receiver is mid-drop; its guard removes the entry.
                Err(TrySendError::Disconnected(_)) => {}
            }
        }
        drop(mailboxes);

        debug!(
            delivered = stats.delivered,
            dropped = stats.dropped,
            entries = snapshot.len(),
            "notified subscribers"
        );
        stats
    }

    /// Block until `subscription` receives a snapshot or `timeout` elapses.
    pub fn wait(&self, subscription: &Subscription, timeout: Duration) -> Result<Snapshot> {
        subscription.wait(timeout)
    }

    /// Remove a subscriber from the registry.
    pub fn unsubscribe(&self, subscription: Subscription) {
        drop(subscription);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.mailboxes.lock().len()
    }

    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.registry.mailboxes.lock().contains_key(&id)
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
