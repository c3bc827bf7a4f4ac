//! The list diff engine.

use listbind_core::PerfSpan;

use super::fingerprint::FingerprintCache;
use super::myers::matching_pairs;
use super::script::{DiffResult, EditOp, ScriptBuilder};
use super::strategy::DiffStrategy;

/// Computes edit scripts between two lists under a [`DiffStrategy`].
///
/// # Script shape
///
/// Operations are emitted in four groups, each relative to the list left by
/// the previous ones:
///
/// 1. removals, back to front, contiguous runs merged;
/// 2. moves (only when move detection is enabled), in order of destination;
/// 3. insertions, front to back, contiguous runs merged;
/// 4. content changes, at final positions, contiguous runs merged.
///
/// # Example
///
/// ```
/// use listbind::diff::{DiffEngine, EditOp, NaturalDiff};
///
/// let engine = DiffEngine::new(NaturalDiff);
/// let result = engine.calculate(&["a", "b", "c"], &["a", "c"], None, true);
/// assert_eq!(result.ops(), &[EditOp::Remove { position: 1, count: 1 }]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiffEngine<S> {
    strategy: S,
}

/// Partner of an old item after matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partner {
    /// Matched in order; the item stays where it is relative to other
    /// in-order items.
    InOrder(usize),
    /// Matched by identity out of order; the item moves.
    Moved(usize),
}

impl Partner {
    fn new_index(self) -> usize {
        match self {
            Partner::InOrder(j) | Partner::Moved(j) => j,
        }
    }
}

/// A matched item in the working list while moves are laid out.
#[derive(Debug, Clone, Copy)]
struct Slot {
    new_index: usize,
    settled: bool,
}

impl<S> DiffEngine<S> {
    /// Creates an engine using `strategy`.
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// The comparison strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Computes the edit script from `old` to `new`.
    ///
    /// `old_fingerprints` must be aligned with `old` when given. A matched
    /// pair whose new item yields a fingerprint is compared against the cached
    /// entry for the old position; without a cache, content falls back to
    /// [`DiffStrategy::same_content`].
    ///
    /// With `detect_moves` disabled, items whose relative order changed are
    /// reported as a removal plus an insertion.
    ///
    /// # Panics
    ///
    /// Panics if `old_fingerprints` has a different length than `old`.
    #[tracing::instrument(
        skip_all,
        target = "listbind::diff",
        level = "trace",
        fields(old = old.len(), new = new.len())
    )]
    pub fn calculate<T>(
        &self,
        old: &[T],
        new: &[T],
        old_fingerprints: Option<&FingerprintCache>,
        detect_moves: bool,
    ) -> DiffResult
    where
        S: DiffStrategy<T>,
    {
        if let Some(cache) = old_fingerprints {
            assert_eq!(
                cache.len(),
                old.len(),
                "fingerprint cache is not aligned with the previous snapshot"
            );
        }

        let _perf = PerfSpan::new("diff");

        let mut old_partner: Vec<Option<Partner>> = vec![None; old.len()];
        let mut new_matched = vec![false; new.len()];

        for (i, j) in matching_pairs(old.len(), new.len(), |i, j| {
            self.strategy.same_identity(&old[i], &new[j])
        }) {
            old_partner[i] = Some(Partner::InOrder(j));
            new_matched[j] = true;
        }

        if detect_moves {
            self.pair_moves(old, new, &mut old_partner, &mut new_matched);
        }

        let mut script = ScriptBuilder::new();

        // Removals.
        for i in (0..old.len()).rev() {
            if old_partner[i].is_none() {
                script.push(EditOp::Remove {
                    position: i,
                    count: 1,
                });
            }
        }

        // Moves.
        let mut working: Vec<Slot> = old_partner
            .iter()
            .flatten()
            .map(|partner| Slot {
                new_index: partner.new_index(),
                settled: matches!(partner, Partner::InOrder(_)),
            })
            .collect();
        let mut moved: Vec<usize> = old_partner
            .iter()
            .flatten()
            .filter_map(|partner| match partner {
                Partner::Moved(j) => Some(*j),
                Partner::InOrder(_) => None,
            })
            .collect();
        moved.sort_unstable();

        for j in moved {
            let Some(from) = working.iter().position(|slot| slot.new_index == j) else {
                continue;
            };
            let slot = working.remove(from);
            let to = working
                .iter()
                .rposition(|s| s.settled && s.new_index < j)
                .map_or(0, |p| p + 1);
            working.insert(
                to,
                Slot {
                    settled: true,
                    ..slot
                },
            );
            if from != to {
                script.push(EditOp::Move { from, to });
            }
        }

        // Insertions.
        for (j, matched) in new_matched.iter().enumerate() {
            if !matched {
                script.push(EditOp::Insert {
                    position: j,
                    count: 1,
                });
            }
        }

        // Changes.
        let mut changed: Vec<usize> = old_partner
            .iter()
            .enumerate()
            .filter_map(|(i, partner)| {
                let j = partner.as_ref()?.new_index();
                (!self.contents_equal(old, new, old_fingerprints, i, j)).then_some(j)
            })
            .collect();
        changed.sort_unstable();
        for j in changed {
            script.push(EditOp::Change {
                position: j,
                count: 1,
            });
        }

        let result = script.finish(old.len(), new.len());
        tracing::debug!(
            target: "listbind::diff",
            old = old.len(),
            new = new.len(),
            ops = result.len(),
            "diff computed"
        );
        result
    }

    /// Pairs leftover old and new items that share an identity.
    fn pair_moves<T>(
        &self,
        old: &[T],
        new: &[T],
        old_partner: &mut [Option<Partner>],
        new_matched: &mut [bool],
    ) where
        S: DiffStrategy<T>,
    {
        let mut unmatched_old: Vec<usize> = (0..old.len())
            .filter(|&i| old_partner[i].is_none())
            .collect();
        if unmatched_old.is_empty() {
            return;
        }

        for j in 0..new.len() {
            if new_matched[j] {
                continue;
            }
            if let Some(slot) = unmatched_old
                .iter()
                .position(|&i| self.strategy.same_identity(&old[i], &new[j]))
            {
                let i = unmatched_old.remove(slot);
                old_partner[i] = Some(Partner::Moved(j));
                new_matched[j] = true;
                if unmatched_old.is_empty() {
                    break;
                }
            }
        }
    }

    /// Content equality of a matched pair, fingerprint first.
    fn contents_equal<T>(
        &self,
        old: &[T],
        new: &[T],
        old_fingerprints: Option<&FingerprintCache>,
        i: usize,
        j: usize,
    ) -> bool
    where
        S: DiffStrategy<T>,
    {
        if let Some(cache) = old_fingerprints {
            if let Some(current) = self.strategy.fingerprint(&new[j]) {
                return cache.get(i) == Some(current);
            }
        }
        self.strategy.same_content(&old[i], &new[j])
    }
}
