//! Per-item comparison strategies.
//!
//! The diff engine never compares items directly. It asks a [`DiffStrategy`]
//! two questions about an old/new pair:
//!
//! - **identity**: are these the same logical row? (decides insert/remove/move)
//! - **content**: asked only when identity holds, does the row need to be
//!   re-rendered? (decides change)
//!
//! Items opt into richer comparison through two independent capabilities:
//! [`Diffable`] for identity/content, and [`Fingerprinted`] for items that are
//! mutated in place between updates.
//!
//! # Choosing a strategy
//!
//! | Item type                         | Strategy                             |
//! |-----------------------------------|--------------------------------------|
//! | `PartialEq + Hash` value          | [`NaturalDiff`]                      |
//! | implements [`Diffable`]           | [`ResolverDiff`]                     |
//! | also mutated in place             | [`MutableDiff`] over either of above |
//! | anything else, or mixed variants  | [`FnDiff`]                           |

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity and content comparison implemented by the item itself.
///
/// # Example
///
/// ```
/// use listbind::diff::Diffable;
///
/// struct Contact {
///     id: u64,
///     name: String,
/// }
///
/// impl Diffable for Contact {
///     fn equals_item(&self, other: &Self) -> bool {
///         self.id == other.id
///     }
///
///     fn are_contents_the_same(&self, other: &Self) -> bool {
///         self.name == other.name
///     }
/// }
/// ```
pub trait Diffable {
    /// Returns `true` if `other` is the same logical row as `self`.
    fn equals_item(&self, other: &Self) -> bool;

    /// Returns `true` if `other` renders the same as `self`.
    ///
    /// Only consulted when [`equals_item`](Self::equals_item) holds.
    fn are_contents_the_same(&self, other: &Self) -> bool;
}

/// Content fingerprint for items that are mutated in place.
///
/// When the old and new list hold the very same object, comparing it with
/// itself always reports equal content. The source therefore caches each
/// item's fingerprint after every update and compares the item's current
/// fingerprint against the cached one on the next update.
pub trait Fingerprinted {
    /// Hash of the item's current rendered content.
    fn fingerprint(&self) -> u64;
}

/// Pluggable identity/content comparison used by the diff engine.
pub trait DiffStrategy<T>: Send + Sync {
    /// Returns `true` if `old` and `new` are the same logical row.
    fn same_identity(&self, old: &T, new: &T) -> bool;

    /// Returns `true` if `old` and `new` render the same.
    ///
    /// Only called when [`same_identity`](Self::same_identity) holds.
    fn same_content(&self, old: &T, new: &T) -> bool;

    /// Returns the content fingerprint of `item`, if it supports one.
    ///
    /// When this returns `Some` for the new item of a matched pair, the engine
    /// compares it with the cached fingerprint of the old position instead of
    /// calling [`same_content`](Self::same_content).
    fn fingerprint(&self, _item: &T) -> Option<u64> {
        None
    }
}

/// Hashes a value with the standard library's default hasher.
///
/// Handy for implementing [`Fingerprinted`].
pub fn hash_of<H: Hash + ?Sized>(value: &H) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Natural equality: identity is `==`, content is hash equality.
///
/// Used for plain values that do not implement [`Diffable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalDiff;

impl<T: PartialEq + Hash> DiffStrategy<T> for NaturalDiff {
    fn same_identity(&self, old: &T, new: &T) -> bool {
        old == new
    }

    fn same_content(&self, old: &T, new: &T) -> bool {
        hash_of(old) == hash_of(new)
    }
}

/// Delegates both questions to the item's [`Diffable`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverDiff;

impl<T: Diffable> DiffStrategy<T> for ResolverDiff {
    fn same_identity(&self, old: &T, new: &T) -> bool {
        old.equals_item(new)
    }

    fn same_content(&self, old: &T, new: &T) -> bool {
        old.are_contents_the_same(new)
    }
}

/// Adds [`Fingerprinted`] support on top of another strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutableDiff<S> {
    inner: S,
}

impl<S> MutableDiff<S> {
    /// Wraps `inner`, which keeps answering identity questions.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The wrapped strategy.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<T: Fingerprinted, S: DiffStrategy<T>> DiffStrategy<T> for MutableDiff<S> {
    fn same_identity(&self, old: &T, new: &T) -> bool {
        self.inner.same_identity(old, new)
    }

    fn same_content(&self, old: &T, new: &T) -> bool {
        self.inner.same_content(old, new)
    }

    fn fingerprint(&self, item: &T) -> Option<u64> {
        Some(item.fingerprint())
    }
}

type PairFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;
type FingerprintFn<T> = Arc<dyn Fn(&T) -> Option<u64> + Send + Sync>;

/// Closure-built strategy.
///
/// Useful for items that cannot implement the capability traits (foreign
/// types, shared handles) and for enums where only some variants opt in.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use listbind::diff::{DiffStrategy, FnDiff};
///
/// let strategy = FnDiff::new(
///     |old: &Arc<String>, new: &Arc<String>| Arc::ptr_eq(old, new),
///     |old: &Arc<String>, new: &Arc<String>| old == new,
/// )
/// .with_fingerprint(|item| Some(item.len() as u64));
///
/// let a = Arc::new("a".to_string());
/// assert!(strategy.same_identity(&a, &a.clone()));
/// assert_eq!(strategy.fingerprint(&a), Some(1));
/// ```
pub struct FnDiff<T> {
    identity: PairFn<T>,
    content: PairFn<T>,
    fingerprint: Option<FingerprintFn<T>>,
}

impl<T> FnDiff<T> {
    /// Creates a strategy from identity and content closures.
    pub fn new<I, C>(identity: I, content: C) -> Self
    where
        I: Fn(&T, &T) -> bool + Send + Sync + 'static,
        C: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            identity: Arc::new(identity),
            content: Arc::new(content),
            fingerprint: None,
        }
    }

    /// Sets the fingerprint closure. Returning `None` for an item falls back
    /// to the content closure for that item.
    pub fn with_fingerprint<F>(mut self, fingerprint: F) -> Self
    where
        F: Fn(&T) -> Option<u64> + Send + Sync + 'static,
    {
        self.fingerprint = Some(Arc::new(fingerprint));
        self
    }
}

impl<T> Clone for FnDiff<T> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            content: self.content.clone(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

impl<T> fmt::Debug for FnDiff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDiff")
            .field("fingerprint", &self.fingerprint.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> DiffStrategy<T> for FnDiff<T> {
    fn same_identity(&self, old: &T, new: &T) -> bool {
        (self.identity)(old, new)
    }

    fn same_content(&self, old: &T, new: &T) -> bool {
        (self.content)(old, new)
    }

    fn fingerprint(&self, item: &T) -> Option<u64> {
        self.fingerprint.as_ref().and_then(|f| f(item))
    }
}

impl<T, S: DiffStrategy<T> + ?Sized> DiffStrategy<T> for Arc<S> {
    fn same_identity(&self, old: &T, new: &T) -> bool {
        (**self).same_identity(old, new)
    }

    fn same_content(&self, old: &T, new: &T) -> bool {
        (**self).same_content(old, new)
    }

    fn fingerprint(&self, item: &T) -> Option<u64> {
        (**self).fingerprint(item)
    }
}

static_assertions::assert_impl_all!(NaturalDiff: Send, Sync);
static_assertions::assert_impl_all!(FnDiff<String>: Send, Sync);
