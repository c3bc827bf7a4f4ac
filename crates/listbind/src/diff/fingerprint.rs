//! Fingerprint cache for items mutated in place.

use super::strategy::DiffStrategy;

/// Fingerprints of a snapshot, aligned positionally with it.
///
/// Entry `i` holds the fingerprint of item `i` when the strategy supports one
/// for that item, `None` otherwise. The cache is rebuilt from the new snapshot
/// after every update so it is ready for the next diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintCache {
    entries: Vec<Option<u64>>,
}

impl FingerprintCache {
    /// Creates an empty cache (aligned with an empty snapshot).
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current fingerprint of every item in `items`.
    pub fn build<T, S>(items: &[T], strategy: &S) -> Self
    where
        S: DiffStrategy<T> + ?Sized,
    {
        Self {
            entries: items.iter().map(|item| strategy.fingerprint(item)).collect(),
        }
    }

    /// Number of entries, equal to the length of the snapshot it was built from.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached fingerprint at `position`.
    pub fn get(&self, position: usize) -> Option<u64> {
        self.entries.get(position).copied().flatten()
    }

    /// Returns `true` if at least one item had a fingerprint.
    pub fn has_fingerprints(&self) -> bool {
        self.entries.iter().any(Option::is_some)
    }

    /// All entries, in snapshot order.
    pub fn as_slice(&self) -> &[Option<u64>] {
        &self.entries
    }
}

impl FromIterator<Option<u64>> for FingerprintCache {
    fn from_iter<I: IntoIterator<Item = Option<u64>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
