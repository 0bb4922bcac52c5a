//! Regular-expression search over a snapshot.
//!
//! Search never touches the window: it filters a [`Snapshot`] the caller
//! already copied, so it takes no locks and has no side effects.

use crate::error::Result;
use crate::types::{Entry, Snapshot};
use regex::Regex;

/// A compiled search pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile `pattern`, failing with `InvalidPattern` if it is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, entry: &Entry) -> bool {
        self.regex.is_match(entry.value())
    }

    /// Matching entries, in snapshot (timestamp) order.
    pub fn filter(&self, snapshot: &Snapshot) -> Vec<Entry> {
        snapshot
            .iter()
            .filter(|entry| self.is_match(entry))
            .cloned()
            .collect()
    }
}

/// Compile `pattern` and return the entries of `snapshot` whose value matches it.
pub fn query(pattern: &str, snapshot: &Snapshot) -> Result<Vec<Entry>> {
    Ok(Pattern::new(pattern)?.filter(snapshot))
}
