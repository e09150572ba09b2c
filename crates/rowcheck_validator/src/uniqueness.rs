//! Uniqueness tracking for a single validation run.
//!
//! Each registered uniqueness check owns one set of previously seen keys.
//! Keys are always ordered tuples of cell values; a single-field key is a
//! one-element tuple.

use std::collections::HashSet;

/// Seen-key sets for the uniqueness checks of one run.
///
/// Created empty at the start of a run and dropped with it, so nothing is
/// remembered between runs.
#[derive(Debug, Default)]
pub(crate) struct UniqueTracker {
    seen: Vec<HashSet<Vec<String>>>,
}

impl UniqueTracker {
    /// Creates a tracker with one empty set per check.
    pub(crate) fn new(checks: usize) -> Self {
        Self {
            seen: (0..checks).map(|_| HashSet::new()).collect(),
        }
    }

    /// Records `key` for check `slot`.
    ///
    /// Returns true if the key had already been recorded, i.e. the row is a
    /// duplicate. The first occurrence of a key is never a duplicate.
    ///
    /// `slot` must be below the number of checks the tracker was created with.
    pub(crate) fn observe(&mut self, slot: usize, key: Vec<String>) -> bool {
        !self.seen[slot].insert(key)
    }
}
