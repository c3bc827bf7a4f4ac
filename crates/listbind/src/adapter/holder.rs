//! Row bindings.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use listbind_core::ConnectionGuard;
use parking_lot::{Mutex, RwLock};

use super::event::EventPayload;
use super::view::BindableView;
use crate::error::RowEventError;
use crate::view_type::ViewType;

type RowSubscription = ConnectionGuard<Result<EventPayload, RowEventError>>;

/// A row: one view, bound to at most one item at a time.
///
/// The adapter owns the lifecycle. A holder is bound to an item, attached to
/// the viewport (its event stream is then forwarded), detached or recycled
/// (its subscription is cancelled and the item association cleared), and may
/// be attached again without a new bind.
pub struct ViewHolder<T> {
    view: Arc<dyn BindableView<T>>,
    view_type: ViewType,
    item: RwLock<Option<T>>,
    position: Mutex<Option<usize>>,
    subscription: Mutex<Option<RowSubscription>>,
    /// Whether the view's subscribe contract is active.
    active: AtomicBool,
}

impl<T> ViewHolder<T> {
    pub(crate) fn new(view: Arc<dyn BindableView<T>>, view_type: ViewType) -> Self {
        Self {
            view,
            view_type,
            item: RwLock::new(None),
            position: Mutex::new(None),
            subscription: Mutex::new(None),
            active: AtomicBool::new(false),
        }
    }

    /// The row's view.
    pub fn view(&self) -> &Arc<dyn BindableView<T>> {
        &self.view
    }

    /// The view type this row was created for.
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// The adapter position this row was last bound or attached at.
    pub fn position(&self) -> Option<usize> {
        *self.position.lock()
    }

    /// Returns `true` while an item is associated with the row.
    pub fn has_item(&self) -> bool {
        self.item.read().is_some()
    }

    /// Returns `true` while the row's events are forwarded.
    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .as_ref()
            .is_some_and(|guard| guard.is_connected())
    }

    /// Returns `true` while the view's subscribe contract is active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Binds `item`: renders it, then activates the subscribe contract.
    pub(crate) fn bind_to(&self, item: T, position: usize) {
        *self.position.lock() = Some(position);
        self.view.bind_to(&item);
        self.activate(&item);
        *self.item.write() = Some(item);
    }

    /// Restores the item association without rendering.
    pub(crate) fn reattach(&self, item: T, position: usize) {
        *self.position.lock() = Some(position);
        self.activate(&item);
        *self.item.write() = Some(item);
    }

    /// Clears the item, cancels the event subscription and deactivates the
    /// subscribe contract. Idempotent.
    pub(crate) fn detach(&self) {
        *self.item.write() = None;
        self.cancel_events();
        self.deactivate();
    }

    pub(crate) fn set_position(&self, position: usize) {
        *self.position.lock() = Some(position);
    }

    /// Installs the row's event subscription, cancelling any previous one.
    pub(crate) fn set_subscription(&self, guard: RowSubscription) {
        let previous = self.subscription.lock().replace(guard);
        drop(previous);
    }

    /// Cancels the row's event subscription, if any.
    pub(crate) fn cancel_events(&self) {
        let previous = self.subscription.lock().take();
        if let Some(mut guard) = previous {
            guard.disconnect();
        }
    }

    fn activate(&self, item: &T) {
        if let Some(subscribeable) = self.view.as_subscribeable() {
            if self.active.swap(true, Ordering::SeqCst) {
                subscribeable.unsubscribe();
            }
            subscribeable.subscribe(item);
        }
    }

    fn deactivate(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if let Some(subscribeable) = self.view.as_subscribeable() {
                subscribeable.unsubscribe();
            }
        }
    }
}

impl<T: Clone> ViewHolder<T> {
    /// The item currently bound to this row.
    pub fn item(&self) -> Option<T> {
        self.item.read().clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for ViewHolder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHolder")
            .field("view_type", &self.view_type)
            .field("position", &*self.position.lock())
            .field("item", &*self.item.read())
            .field("subscribed", &self.is_subscribed())
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Debug> fmt::Display for ViewHolder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = *self.position.lock();
        let item = self.item.read();
        let view_type = self.view_type;
        match (position, item.as_ref()) {
            (Some(p), Some(item)) => {
                write!(f, "ViewHolder{{view_type={view_type},position={p},item={item:?}}}")
            }
            (Some(p), None) => {
                write!(f, "ViewHolder{{view_type={view_type},position={p},item=<none>}}")
            }
            (None, _) => {
                write!(f, "ViewHolder{{view_type={view_type},position=<none>,item=<none>}}")
            }
        }
    }
}

static_assertions::assert_impl_all!(ViewHolder<String>: Send, Sync);
