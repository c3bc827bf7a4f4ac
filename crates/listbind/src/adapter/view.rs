//! Contracts between the adapter and the rendering layer.

use std::sync::Arc;

use listbind_core::Signal;

use super::event::EventPayload;
use crate::error::{InflateError, RowEventError};
use crate::view_type::LayoutId;

/// Stream of events produced by one row view.
///
/// An `Err` ends the row's subscription: the adapter logs it and stops
/// forwarding events from that row until it is attached again.
pub type RowEventStream = Signal<Result<EventPayload, RowEventError>>;

/// A row view the adapter can bind items to.
///
/// # Example
///
/// ```
/// use listbind::adapter::{BindableView, EventPayload, RowEventStream};
/// use parking_lot::Mutex;
///
/// struct LabelView {
///     text: Mutex<String>,
///     clicks: RowEventStream,
/// }
///
/// impl BindableView<String> for LabelView {
///     fn bind_to(&self, item: &String) {
///         *self.text.lock() = item.clone();
///     }
///
///     fn events(&self) -> Option<&RowEventStream> {
///         Some(&self.clicks)
///     }
/// }
///
/// let view = LabelView { text: Mutex::new(String::new()), clicks: RowEventStream::new() };
/// view.bind_to(&"hello".to_string());
/// view.clicks.emit(Ok(EventPayload::new("click")));
/// assert_eq!(*view.text.lock(), "hello");
/// ```
pub trait BindableView<T>: Send + Sync {
    /// Renders `item`.
    fn bind_to(&self, item: &T);

    /// The row's event stream, if it produces events.
    fn events(&self) -> Option<&RowEventStream> {
        None
    }

    /// The row's subscribe contract, if it has one.
    fn as_subscribeable(&self) -> Option<&dyn SubscribeableView<T>> {
        None
    }
}

/// Optional lifecycle hooks for views that keep their own subscription to
/// the bound item, independent of rendering.
pub trait SubscribeableView<T>: Send + Sync {
    /// Starts observing `item`.
    fn subscribe(&self, item: &T);

    /// Stops observing the current item.
    fn unsubscribe(&self);
}

/// Creates row views for layouts.
pub trait ViewFactory<T>: Send + Sync {
    /// Creates a view for `layout`.
    fn create(&self, layout: LayoutId) -> Result<Arc<dyn BindableView<T>>, InflateError>;
}

impl<T, F> ViewFactory<T> for F
where
    F: Fn(LayoutId) -> Result<Arc<dyn BindableView<T>>, InflateError> + Send + Sync,
{
    fn create(&self, layout: LayoutId) -> Result<Arc<dyn BindableView<T>>, InflateError> {
        self(layout)
    }
}

/// The visual list an adapter drives.
///
/// The adapter calls these with the operations of every edit script, in
/// order, so the host can re-render the minimum.
pub trait ListHost: Send + Sync {
    /// Everything may have changed; re-render all rows.
    fn notify_data_set_changed(&self);

    /// `count` rows were inserted at `position`.
    fn notify_item_range_inserted(&self, position: usize, count: usize);

    /// `count` rows were removed at `position`.
    fn notify_item_range_removed(&self, position: usize, count: usize);

    /// A row moved from `from` to `to`.
    fn notify_item_moved(&self, from: usize, to: usize);

    /// `count` rows at `position` need to be re-bound.
    fn notify_item_range_changed(&self, position: usize, count: usize);

    /// Name used in log messages.
    fn name(&self) -> &str {
        "list"
    }
}
