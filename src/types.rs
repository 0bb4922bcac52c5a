//! Core types for the feed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    ///
    /// A clock set before the epoch reads as `Timestamp(0)`.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or(0);
        Timestamp(micros)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single text value stamped with the time it was accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    timestamp: Timestamp,
    value: String,
}

impl Entry {
    /// Create an entry with an explicit timestamp.
    pub fn new(timestamp: Timestamp, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    /// Create an entry stamped with the current time.
    pub fn now(value: impl Into<String>) -> Self {
        Self::new(Timestamp::now(), value)
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Immutable point-in-time copy of the window, oldest entry first.
///
/// Cloning is cheap: every subscriber notified with the same snapshot shares
/// one allocation. The window itself is never aliased.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Arc<[Entry]>);

impl Snapshot {
    pub fn empty() -> Self {
        Snapshot(Arc::from(Vec::new()))
    }

    /// Values in timestamp order.
    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(Entry::value).collect()
    }

    /// Copy the entries out into an owned vector.
    pub fn to_vec(&self) -> Vec<Entry> {
        self.0.to_vec()
    }
}

impl From<Vec<Entry>> for Snapshot {
    fn from(entries: Vec<Entry>) -> Self {
        Snapshot(Arc::from(entries))
    }
}

impl Deref for Snapshot {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
