//! Edit scripts and their dispatch.

use std::fmt;

/// A single structural operation of an edit script.
///
/// Positions are relative to the list as transformed by every operation that
/// precedes this one in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// `count` new items appear at `position`.
    Insert { position: usize, count: usize },
    /// `count` items starting at `position` disappear.
    Remove { position: usize, count: usize },
    /// The item at `from` is taken out and reinserted at `to`.
    Move { from: usize, to: usize },
    /// `count` items starting at `position` need to be re-rendered.
    Change { position: usize, count: usize },
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EditOp::Insert { position, count } => write!(f, "insert {count} at {position}"),
            EditOp::Remove { position, count } => write!(f, "remove {count} at {position}"),
            EditOp::Move { from, to } => write!(f, "move {from} -> {to}"),
            EditOp::Change { position, count } => write!(f, "change {count} at {position}"),
        }
    }
}

/// Receiver of edit script operations.
///
/// The visual list implements this to apply minimal updates; observers
/// implement it to react to specific operations.
pub trait ListUpdateCallback {
    /// `count` items were inserted at `position`.
    fn on_inserted(&mut self, position: usize, count: usize);
    /// `count` items were removed at `position`.
    fn on_removed(&mut self, position: usize, count: usize);
    /// An item moved from `from` to `to`.
    fn on_moved(&mut self, from: usize, to: usize);
    /// `count` items at `position` changed content.
    fn on_changed(&mut self, position: usize, count: usize);
}

/// Records every operation it receives.
impl ListUpdateCallback for Vec<EditOp> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        self.push(EditOp::Insert { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.push(EditOp::Remove { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.push(EditOp::Move { from, to });
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        self.push(EditOp::Change { position, count });
    }
}

/// The outcome of a diff: an ordered edit script turning the old list into
/// the new one.
///
/// A result can be dispatched any number of times; every receiver sees the
/// same operations in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    ops: Vec<EditOp>,
    old_len: usize,
    new_len: usize,
}

impl DiffResult {
    pub(crate) fn new(ops: Vec<EditOp>, old_len: usize, new_len: usize) -> Self {
        Self {
            ops,
            old_len,
            new_len,
        }
    }

    /// The operations, in dispatch order.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Returns `true` if the lists were equivalent.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Length of the list the script starts from.
    pub fn old_len(&self) -> usize {
        self.old_len
    }

    /// Length of the list the script produces.
    pub fn new_len(&self) -> usize {
        self.new_len
    }

    /// Returns `true` if the script contains at least one move.
    pub fn has_moves(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, EditOp::Move { .. }))
    }

    /// Returns `true` if an insertion happens at the top of the list.
    pub fn inserts_at_top(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, EditOp::Insert { position: 0, .. }))
    }

    /// Sends every operation, in order, to `callback`.
    pub fn dispatch_updates_to<C>(&self, callback: &mut C)
    where
        C: ListUpdateCallback + ?Sized,
    {
        for op in &self.ops {
            match *op {
                EditOp::Insert { position, count } => callback.on_inserted(position, count),
                EditOp::Remove { position, count } => callback.on_removed(position, count),
                EditOp::Move { from, to } => callback.on_moved(from, to),
                EditOp::Change { position, count } => callback.on_changed(position, count),
            }
        }
    }

    /// Replays the script on `target`, taking inserted and changed items
    /// from `new`.
    ///
    /// Starting from a copy of the old list, `target` ends up equal to `new`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not the old list this script was computed from.
    pub fn apply_to<T: Clone>(&self, target: &mut Vec<T>, new: &[T]) {
        assert_eq!(
            target.len(),
            self.old_len,
            "edit script applied to a list of the wrong length"
        );
        for op in &self.ops {
            match *op {
                EditOp::Insert { position, count } => {
                    let inserted = new[position..position + count].iter().cloned();
                    target.splice(position..position, inserted);
                }
                EditOp::Remove { position, count } => {
                    target.drain(position..position + count);
                }
                EditOp::Move { from, to } => {
                    let item = target.remove(from);
                    target.insert(to, item);
                }
                EditOp::Change { position, count } => {
                    target[position..position + count]
                        .clone_from_slice(&new[position..position + count]);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{op}")?;
        }
        write!(f, "]")
    }
}

/// Accumulates operations into runs while the engine builds a script.
#[derive(Debug, Default)]
pub(crate) struct ScriptBuilder {
    ops: Vec<EditOp>,
}

impl ScriptBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, op: EditOp) {
        if let Some(last) = self.ops.last_mut() {
            match (last, op) {
                // Removals are emitted back to front.
                (
                    EditOp::Remove { position, count },
                    EditOp::Remove {
                        position: p,
                        count: c,
                    },
                ) if p + c == *position => {
                    *position = p;
                    *count += c;
                    return;
                }
                (
                    EditOp::Insert { position, count },
                    EditOp::Insert {
                        position: p,
                        count: c,
                    },
                ) if *position + *count == p => {
                    *count += c;
                    return;
                }
                (
                    EditOp::Change { position, count },
                    EditOp::Change {
                        position: p,
                        count: c,
                    },
                ) if *position + *count == p => {
                    *count += c;
                    return;
                }
                _ => {}
            }
        }
        self.ops.push(op);
    }

    pub(crate) fn finish(self, old_len: usize, new_len: usize) -> DiffResult {
        DiffResult::new(self.ops, old_len, new_len)
    }
}
