//! Item events forwarded from rows.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use super::holder::ViewHolder;

/// Type-erased event value produced by a row (a click marker, a long-click
/// marker, a custom event struct...).
#[derive(Clone)]
pub struct EventPayload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl EventPayload {
    /// Wraps `value`.
    pub fn new<P: Any + Send + Sync>(value: P) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<P>(),
        }
    }

    /// Returns the value if it is a `P`.
    pub fn downcast_ref<P: Any>(&self) -> Option<&P> {
        self.value.downcast_ref::<P>()
    }

    /// Returns `true` if the value is a `P`.
    pub fn is<P: Any>(&self) -> bool {
        self.value.is::<P>()
    }

    /// Name of the wrapped type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPayload")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// An event from a row, tagged with the row it came from.
///
/// The event holds a weak reference to the row rather than the item: the
/// row may have been recycled, or re-bound to another item, by the time the
/// event is handled. [`item`](Self::item) reads the row's item at that time.
pub struct ItemEvent<T> {
    holder: Weak<ViewHolder<T>>,
    payload: EventPayload,
}

impl<T> ItemEvent<T> {
    pub(crate) fn new(holder: Weak<ViewHolder<T>>, payload: EventPayload) -> Self {
        Self { holder, payload }
    }

    /// The value the row produced.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The originating row, if it is still alive.
    pub fn view(&self) -> Option<Arc<ViewHolder<T>>> {
        self.holder.upgrade()
    }

    /// The originating row.
    ///
    /// # Panics
    ///
    /// Panics if the row has been dropped.
    pub fn require_view(&self) -> Arc<ViewHolder<T>> {
        match self.view() {
            Some(view) => view,
            None => panic!("view not attached to event"),
        }
    }
}

impl<T: Clone> ItemEvent<T> {
    /// The item currently bound to the originating row.
    ///
    /// `None` if the row is gone or no longer bound (recycled).
    pub fn item(&self) -> Option<T> {
        self.view().and_then(|holder| holder.item())
    }

    /// The item currently bound to the originating row.
    ///
    /// # Panics
    ///
    /// Panics if the row is gone or has been recycled.
    pub fn require_item(&self) -> T {
        match self.item() {
            Some(item) => item,
            None => panic!("item not attached to event"),
        }
    }
}

impl<T> Clone for ItemEvent<T> {
    fn clone(&self) -> Self {
        Self {
            holder: self.holder.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ItemEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemEvent")
            .field("holder", &self.view())
            .field("payload", &self.payload)
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Display for ItemEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.view() {
            Some(holder) => write!(
                f,
                "ItemEvent{{holder={holder},payload={}}}",
                self.payload.type_name
            ),
            None => write!(
                f,
                "ItemEvent{{holder=<dropped>,payload={}}}",
                self.payload.type_name
            ),
        }
    }
}
