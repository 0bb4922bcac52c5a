//! The window store.

use crate::types::{Entry, Snapshot, Timestamp};
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Ordered, capacity-bounded sequence of entries.
///
/// All mutation happens under one mutex; the lock is held only for the
/// insert/evict or the copy, never while notifying anyone.
pub struct WindowStore {
    /// Entries sorted ascending by timestamp.
    entries: Mutex<Vec<Entry>>,
    /// Maximum number of retained entries (at least 1).
    capacity: usize,
}

impl WindowStore {
    /// Create an empty window. A capacity of zero is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(Vec::with_capacity(capacity + 1)),
            capacity,
        }
    }

    /// Append a value stamped with the current time.
    ///
    /// The timestamp is taken while the lock is held, so concurrent appends
    /// are stamped in the order they land in the window.
    pub fn append(&self, value: impl Into<String>) -> Entry {
        let mut entries = self.entries.lock();
        let entry = Entry::new(Timestamp::now(), value);
        self.insert_locked(&mut entries, entry.clone());
        entry
    }

    /// Insert an entry that already carries its timestamp.
    pub fn insert(&self, entry: Entry) {
        let mut entries = self.entries.lock();
        self.insert_locked(&mut entries, entry);
    }

    fn insert_locked(&self, entries: &mut Vec<Entry>, entry: Entry) {
        // Equal timestamps land after existing ones.
        let at = entries.partition_point(|e| e.timestamp() <= entry.timestamp());
        trace!(timestamp = %entry.timestamp(), position = at, "inserting entry");
        entries.insert(at, entry);

        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
            debug!(evicted = excess, capacity = self.capacity, "evicted oldest entries");
        }
    }

    /// Independent copy of the current window.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self.entries.lock();
        Snapshot::from(entries.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(ts: i64, value: &str) -> Entry {
        Entry::new(Timestamp(ts), value)
    }

    fn is_sorted(snapshot: &Snapshot) -> bool {
        snapshot
            .windows(2)
            .all(|w| w[0].timestamp() <= w[1].timestamp())
    }

    #[test]
    fn test_append_to_empty() {
        let store = WindowStore::new(10);
        assert!(store.is_empty());

        let entry = store.append("hello");
        assert_eq!(entry.value(), "hello");
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().values(), vec!["hello"]);
    }

    #[test]
    fn test_eleventh_entry_evicts_oldest() {
        let store = WindowStore::new(10);
        for i in 1..=11 {
            store.insert(entry(i, &format!("v{}", i)));
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 10);
        let expected: Vec<String> = (2..=11).map(|i| format!("v{}", i)).collect();
        assert_eq!(snapshot.values(), expected);
        assert!(is_sorted(&snapshot));
    }

    #[test]
    fn test_out_of_order_insert_is_sorted() {
        let store = WindowStore::new(10);
        store.insert(entry(30, "c"));
        store.insert(entry(10, "a"));
        store.insert(entry(20, "b"));

        assert_eq!(store.snapshot().values(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_late_old_entry_is_evicted_when_full() {
        let store = WindowStore::new(3);
        for i in 10..13 {
            store.insert(entry(i, "new"));
        }
        store.insert(entry(1, "stale"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.iter().all(|e| e.value() == "new"));
    }

    #[test]
    fn test_equal_timestamps_keep_arrival_order() {
        let store = WindowStore::new(10);
        store.insert(entry(5, "first"));
        store.insert(entry(5, "second"));

        assert_eq!(store.snapshot().values(), vec!["first", "second"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = WindowStore::new(10);
        store.append("one");
        let before = store.snapshot();
        store.append("two");

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let store = WindowStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.append("a");
        store.append("b");
        assert_eq!(store.snapshot().values(), vec!["b"]);
    }

    proptest! {
        #[test]
        fn prop_length_is_min_of_appends_and_capacity(
            stamps in proptest::collection::hash_set(0i64..1_000_000, 0..40)
        ) {
            let store = WindowStore::new(10);
            let n = stamps.len();
            for ts in stamps {
                store.insert(entry(ts, "x"));
            }
            prop_assert_eq!(store.snapshot().len(), n.min(10));
        }

        #[test]
        fn prop_snapshot_is_sorted_and_keeps_newest(
            stamps in proptest::collection::vec(any::<i64>(), 0..60),
            capacity in 1usize..16,
        ) {
            let store = WindowStore::new(capacity);
            for ts in &stamps {
                store.insert(entry(*ts, "x"));
                let snapshot = store.snapshot();
                prop_assert!(snapshot.len() <= capacity);
                prop_assert!(is_sorted(&snapshot));
            }

            let mut sorted = stamps.clone();
            sorted.sort();
            let keep = sorted.len().saturating_sub(capacity);
            let expected: Vec<Timestamp> = sorted[keep..].iter().map(|t| Timestamp(*t)).collect();
            let actual: Vec<Timestamp> = store.snapshot().iter().map(Entry::timestamp).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
