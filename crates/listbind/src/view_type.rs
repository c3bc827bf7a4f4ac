//! View types and layout identifiers.
//!
//! A [`ViewType`] classifies the item at a position; a [`ViewTypeResolver`]
//! maps it to the [`LayoutId`] a [`ViewFactory`](crate::adapter::ViewFactory)
//! knows how to inflate.

use std::fmt;

/// Integer classifier selecting a rendering template for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewType(pub i32);

impl ViewType {
    /// The view type used by single-layout sources.
    pub const SINGLE: ViewType = ViewType(-1);

    /// Returns the raw classifier value.
    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for ViewType {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl From<i32> for ViewType {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a layout (rendering template).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub i32);

impl LayoutId {
    /// Returns the raw layout identifier.
    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for LayoutId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout#{}", self.0)
    }
}

/// Classifies items into view types and resolves the layout for each type.
///
/// `view_type` must be a pure function of the item at `position`: the same
/// logical item has to report the same view type for the duration of a diff.
///
/// # Example
///
/// ```
/// use listbind::{LayoutId, ViewType, ViewTypeResolver};
///
/// struct ByParity;
///
/// impl ViewTypeResolver<u32> for ByParity {
///     fn view_type(&self, item: &u32, _position: usize) -> ViewType {
///         ViewType(*item as i32 % 2)
///     }
///
///     fn layout(&self, view_type: ViewType) -> Option<LayoutId> {
///         match view_type.get() {
///             0 => Some(LayoutId(100)),
///             1 => Some(LayoutId(101)),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(ByParity.view_type(&3, 0), ViewType(1));
/// assert_eq!(ByParity.layout(ViewType(7)), None);
/// ```
pub trait ViewTypeResolver<T>: Send + Sync {
    /// Returns the view type of `item`, located at `position`.
    fn view_type(&self, item: &T, position: usize) -> ViewType;

    /// Returns the layout for `view_type`, or `None` when it is unknown.
    fn layout(&self, view_type: ViewType) -> Option<LayoutId>;
}

/// Resolver for homogeneous lists: every item uses [`ViewType::SINGLE`] and
/// the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleLayout {
    layout: LayoutId,
}

impl SingleLayout {
    /// Creates a resolver bound to `layout`.
    pub fn new(layout: LayoutId) -> Self {
        Self { layout }
    }

    /// The layout every item resolves to.
    pub fn layout_id(&self) -> LayoutId {
        self.layout
    }
}

impl<T> ViewTypeResolver<T> for SingleLayout {
    fn view_type(&self, _item: &T, _position: usize) -> ViewType {
        ViewType::SINGLE
    }

    fn layout(&self, _view_type: ViewType) -> Option<LayoutId> {
        Some(self.layout)
    }
}

/// Closure-based resolver.
pub struct FnViewTypes<T> {
    classify: Box<dyn Fn(&T, usize) -> ViewType + Send + Sync>,
    resolve: Box<dyn Fn(ViewType) -> Option<LayoutId> + Send + Sync>,
}

impl<T> FnViewTypes<T> {
    /// Creates a resolver from a classifier and a layout lookup.
    pub fn new<C, R>(classify: C, resolve: R) -> Self
    where
        C: Fn(&T, usize) -> ViewType + Send + Sync + 'static,
        R: Fn(ViewType) -> Option<LayoutId> + Send + Sync + 'static,
    {
        Self {
            classify: Box::new(classify),
            resolve: Box::new(resolve),
        }
    }
}

impl<T> fmt::Debug for FnViewTypes<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnViewTypes").finish_non_exhaustive()
    }
}

impl<T> ViewTypeResolver<T> for FnViewTypes<T> {
    fn view_type(&self, item: &T, position: usize) -> ViewType {
        (self.classify)(item, position)
    }

    fn layout(&self, view_type: ViewType) -> Option<LayoutId> {
        (self.resolve)(view_type)
    }
}
