//! Integration tests for the diff engine: documented scenarios plus
//! generated-list properties.

use listbind::diff::{DiffEngine, EditOp, FingerprintCache, FnDiff, ListUpdateCallback, NaturalDiff};
use proptest::prelude::*;

fn diff(old: &[char], new: &[char], detect_moves: bool) -> listbind::diff::DiffResult {
    DiffEngine::new(NaturalDiff).calculate(old, new, None, detect_moves)
}

fn replay(old: &[char], new: &[char], detect_moves: bool) -> Vec<char> {
    let result = diff(old, new, detect_moves);
    let mut target = old.to_vec();
    result.apply_to(&mut target, new);
    target
}

#[test]
fn test_remove_single_middle_item() {
    let result = diff(&['A', 'B', 'C'], &['A', 'C'], true);
    assert_eq!(result.ops(), &[EditOp::Remove { position: 1, count: 1 }]);
}

#[test]
fn test_insert_into_empty_list() {
    let result = diff(&[], &['X', 'Y'], true);
    assert_eq!(result.ops(), &[EditOp::Insert { position: 0, count: 2 }]);
    assert!(result.inserts_at_top());
}

#[test]
fn test_swap_with_moves_is_one_move() {
    let result = diff(&['A', 'B'], &['B', 'A'], true);
    assert_eq!(result.len(), 1);
    assert!(result.has_moves());
    assert_eq!(replay(&['A', 'B'], &['B', 'A'], true), vec!['B', 'A']);
}

#[test]
fn test_rotation_moves_last_item_to_front() {
    let old = ['A', 'B', 'C', 'D'];
    let new = ['D', 'A', 'B', 'C'];
    let result = diff(&old, &new, true);
    assert_eq!(result.ops(), &[EditOp::Move { from: 3, to: 0 }]);
}

#[test]
fn test_mixed_update_dispatch_order() {
    let old = ['A', 'B', 'C', 'D', 'E'];
    let new = ['E', 'A', 'X', 'C', 'Y'];
    let result = diff(&old, &new, true);

    let mut seen: Vec<EditOp> = Vec::new();
    result.dispatch_updates_to(&mut seen);
    assert_eq!(seen.as_slice(), result.ops());

    let first_insert = seen
        .iter()
        .position(|op| matches!(op, EditOp::Insert { .. }))
        .unwrap();
    let last_remove = seen
        .iter()
        .rposition(|op| matches!(op, EditOp::Remove { .. }))
        .unwrap();
    assert!(last_remove < first_insert);
    assert_eq!(replay(&old, &new, true), new.to_vec());
}

#[test]
fn test_fingerprint_detects_in_place_mutation() {
    #[derive(Clone)]
    struct Row {
        id: u32,
        revision: u32,
    }

    let strategy = FnDiff::new(|a: &Row, b: &Row| a.id == b.id, |_: &Row, _: &Row| true)
        .with_fingerprint(|row: &Row| Some(u64::from(row.revision)));
    let engine = DiffEngine::new(strategy);

    let old = vec![Row { id: 1, revision: 0 }, Row { id: 2, revision: 0 }];
    let cache = FingerprintCache::build(old.as_slice(), engine.strategy());
    let mut new = old.clone();
    new[1].revision = 1;

    let result = engine.calculate(old.as_slice(), new.as_slice(), Some(&cache), true);
    assert_eq!(result.ops(), &[EditOp::Change { position: 1, count: 1 }]);

    // Without the cache the content callback decides.
    let result = engine.calculate(old.as_slice(), new.as_slice(), None, true);
    assert!(result.is_empty());
}

#[derive(Default)]
struct Counting {
    inserted: usize,
    removed: usize,
    changed: usize,
}

impl ListUpdateCallback for Counting {
    fn on_inserted(&mut self, _position: usize, count: usize) {
        self.inserted += count;
    }

    fn on_removed(&mut self, _position: usize, count: usize) {
        self.removed += count;
    }

    fn on_moved(&mut self, _from: usize, _to: usize) {}

    fn on_changed(&mut self, _position: usize, count: usize) {
        self.changed += count;
    }
}

#[test]
fn test_size_accounting() {
    let old = ['A', 'B', 'C'];
    let new = ['C', 'D', 'E', 'F'];
    let result = diff(&old, &new, false);
    let mut counting = Counting::default();
    result.dispatch_updates_to(&mut counting);
    assert_eq!(old.len() + counting.inserted - counting.removed, new.len());
}

#[test]
fn test_disjoint_replacement_of_long_list() {
    let old: Vec<u32> = (0..3000).collect();
    let new: Vec<u32> = (100_000..103_000).collect();
    let result = DiffEngine::new(NaturalDiff).calculate(&old, &new, None, true);
    assert_eq!(
        result.ops(),
        &[
            EditOp::Remove { position: 0, count: 3000 },
            EditOp::Insert { position: 0, count: 3000 },
        ]
    );
}

/// `(key, value)` rows: identity on the key, content on the value.
type Keyed = (u8, u8);

fn keyed_engine() -> DiffEngine<FnDiff<Keyed>> {
    DiffEngine::new(FnDiff::new(
        |a: &Keyed, b: &Keyed| a.0 == b.0,
        |a: &Keyed, b: &Keyed| a.1 == b.1,
    ))
}

/// Rows with distinct keys in arbitrary order and a few possible values.
fn keyed_list() -> impl Strategy<Value = Vec<Keyed>> {
    prop::sample::subsequence((0u8..10).collect::<Vec<_>>(), 0..=10)
        .prop_shuffle()
        .prop_flat_map(|keys| {
            let len = keys.len();
            (Just(keys), prop::collection::vec(0u8..3, len))
        })
        .prop_map(|(keys, values)| keys.into_iter().zip(values).collect())
}

fn key_lcs(old: &[Keyed], new: &[Keyed]) -> usize {
    let mut table = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            table[i][j] = if old[i].0 == new[j].0 {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table[0][0]
}

fn list() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b', 'c', 'd', 'e', 'f']), 0..12)
}

proptest! {
    #[test]
    fn prop_diff_against_itself_is_empty(old in list(), detect_moves in any::<bool>()) {
        prop_assert!(diff(&old, &old, detect_moves).is_empty());
    }

    #[test]
    fn prop_replay_yields_new(old in list(), new in list(), detect_moves in any::<bool>()) {
        prop_assert_eq!(replay(&old, &new, detect_moves), new);
    }

    #[test]
    fn prop_no_moves_when_disabled(old in list(), new in list()) {
        prop_assert!(!diff(&old, &new, false).has_moves());
    }

    #[test]
    fn prop_equal_values_never_change(old in list(), new in list()) {
        let result = diff(&old, &new, true);
        let has_change = result.ops().iter().any(|op| matches!(op, EditOp::Change { .. }));
        prop_assert!(!has_change);
    }

    #[test]
    fn prop_keyed_rows_replay_with_changes(
        old in keyed_list(),
        new in keyed_list(),
        detect_moves in any::<bool>()
    ) {
        let result = keyed_engine().calculate(&old, &new, None, detect_moves);

        let mut target = old.clone();
        result.apply_to(&mut target, &new);
        prop_assert_eq!(&target, &new);

        // Rows kept by identity are never removed and re-inserted, so a new
        // value can only reach the list through a change.
        let kept = if detect_moves {
            old.iter().filter(|row| new.iter().any(|n| n.0 == row.0)).count()
        } else {
            key_lcs(&old, &new)
        };
        let mut counting = Counting::default();
        result.dispatch_updates_to(&mut counting);
        prop_assert_eq!(counting.removed, old.len() - kept);
        prop_assert_eq!(counting.inserted, new.len() - kept);

        let edited = old
            .iter()
            .filter(|row| new.iter().any(|n| n.0 == row.0 && n.1 != row.1))
            .count();
        if detect_moves {
            prop_assert_eq!(counting.changed, edited);
        } else {
            prop_assert!(counting.changed <= edited);
        }
    }
}
