//! List diffing.
//!
//! Given the previous and the next snapshot of a list, the diff engine
//! computes a minimal ordered [`DiffResult`] of [`EditOp`]s: insertions,
//! removals, optional moves, and content changes. Item comparison is
//! pluggable through [`DiffStrategy`]; items mutated in place are handled
//! through [`Fingerprinted`] and a [`FingerprintCache`] kept between updates.
//!
//! # Example
//!
//! ```
//! use listbind::diff::{DiffEngine, EditOp, NaturalDiff};
//!
//! let engine = DiffEngine::new(NaturalDiff);
//!
//! let old = vec!["a", "b"];
//! let new = vec!["b", "a", "c"];
//! let result = engine.calculate(&old, &new, None, true);
//!
//! // Replaying the script on the old list yields the new one.
//! let mut replay = old.clone();
//! result.apply_to(&mut replay, &new);
//! assert_eq!(replay, new);
//! assert!(result.ops().contains(&EditOp::Insert { position: 2, count: 1 }));
//! ```

mod engine;
mod fingerprint;
mod myers;
mod script;
mod strategy;

pub use engine::DiffEngine;
pub use fingerprint::FingerprintCache;
pub use script::{DiffResult, EditOp, ListUpdateCallback};
pub use strategy::{
    DiffStrategy, Diffable, Fingerprinted, FnDiff, MutableDiff, NaturalDiff, ResolverDiff, hash_of,
};
