//! Change tracking across polling cycles.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The dedup core: the set of paths already seen in this run.
///
/// Owned by the agent loop and mutated by a single caller only. Membership
/// grows monotonically with each cycle's full match set; a path removed from
/// disk and later recreated is not treated as new again, since membership is
/// never evicted by the scan.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    known: BTreeSet<PathBuf>,
}

impl ChangeTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the paths in `current` not seen before, and absorb `current`
    /// into the known set.
    ///
    /// This is the only place "new" is defined. Iteration order of the
    /// returned set carries no meaning beyond stable logging.
    pub fn diff(&mut self, current: BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
        let new: BTreeSet<PathBuf> = current.difference(&self.known).cloned().collect();
        self.known.extend(current);
        new
    }

    /// Drop a single path from the known set so a later cycle reports it as
    /// new again. Supports the retry-failed delivery policy.
    ///
    /// Returns whether the path was known.
    pub fn forget(&mut self, path: &Path) -> bool {
        self.known.remove(path)
    }

    /// Whether a path has been seen this run.
    #[must_use]
    pub fn is_known(&self, path: &Path) -> bool {
        self.known.contains(path)
    }

    /// Number of known paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Whether nothing has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}
