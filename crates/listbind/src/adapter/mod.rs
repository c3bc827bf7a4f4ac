//! The observable adapter.
//!
//! [`ObservableAdapter`] bridges an [`AdapterSource`] and a visual list
//! ([`ListHost`]):
//!
//! - while attached, every edit script the source publishes is applied to the
//!   host in order, and an insertion at the top schedules a delayed
//!   scroll-to-top request;
//! - it creates and binds rows ([`ViewHolder`]) through a [`ViewFactory`];
//! - it forwards the events of every attached row to one outward
//!   [`item_event`](ObservableAdapter::item_event) signal, tagged with the
//!   originating row.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use listbind::adapter::{BindableView, ListHost, ObservableAdapter, ViewFactory};
//! use listbind::diff::NaturalDiff;
//! use listbind::{AdapterSource, InflateError, LayoutId};
//! use listbind_core::Scheduler;
//!
//! struct Label;
//! impl BindableView<String> for Label {
//!     fn bind_to(&self, item: &String) {
//!         println!("render {item}");
//!     }
//! }
//!
//! struct Host;
//! impl ListHost for Host {
//!     fn notify_data_set_changed(&self) {}
//!     fn notify_item_range_inserted(&self, position: usize, count: usize) {
//!         println!("inserted {count} at {position}");
//!     }
//!     fn notify_item_range_removed(&self, _: usize, _: usize) {}
//!     fn notify_item_moved(&self, _: usize, _: usize) {}
//!     fn notify_item_range_changed(&self, _: usize, _: usize) {}
//! }
//!
//! let source = Arc::new(AdapterSource::simple(Vec::new(), LayoutId(1), NaturalDiff));
//! let factory = |_: LayoutId| -> Result<Arc<dyn BindableView<String>>, InflateError> {
//!     Ok(Arc::new(Label))
//! };
//! let adapter = ObservableAdapter::new(source.clone(), factory, Arc::new(Scheduler::new()));
//!
//! adapter.on_attached(Arc::new(Host));
//! source.set_data(vec!["a".to_string(), "b".to_string()]).unwrap();
//!
//! let holder = adapter.create_view_holder(adapter.item_view_type(0).unwrap()).unwrap();
//! adapter.bind_view_holder(&holder, 0).unwrap();
//! assert_eq!(holder.item().as_deref(), Some("a"));
//! ```

mod event;
mod holder;
mod view;

pub use event::{EventPayload, ItemEvent};
pub use holder::ViewHolder;
pub use view::{BindableView, ListHost, RowEventStream, SubscribeableView, ViewFactory};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use listbind_core::{ConnectionGuard, Scheduler, Signal};
use parking_lot::Mutex;

use crate::diff::{DiffResult, ListUpdateCallback};
use crate::error::{AdapterError, AdapterResult};
use crate::source::AdapterSource;
use crate::view_type::ViewType;

/// Default delay between an insertion at the top and the scroll request.
pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(50);

/// Configuration for an [`ObservableAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Delay between an insertion at position 0 and the scroll request, so
    /// the structural update settles first.
    pub scroll_delay: Duration,
    /// Name used in log messages.
    pub name: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            scroll_delay: DEFAULT_SCROLL_DELAY,
            name: "adapter".to_string(),
        }
    }
}

impl AdapterConfig {
    /// Create a new configuration with the given name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Builder for creating adapters with custom configuration.
pub struct AdapterBuilder<T> {
    source: Arc<AdapterSource<T>>,
    factory: Arc<dyn ViewFactory<T>>,
    scheduler: Arc<Scheduler>,
    config: AdapterConfig,
}

impl<T> AdapterBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Set the adapter name used in log messages.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the scroll request delay.
    pub fn scroll_delay(mut self, delay: Duration) -> Self {
        self.config.scroll_delay = delay;
        self
    }

    /// Build the adapter.
    pub fn build(self) -> ObservableAdapter<T> {
        ObservableAdapter {
            source: self.source,
            factory: self.factory,
            scheduler: self.scheduler,
            config: self.config,
            item_event: Arc::new(Signal::new()),
            scroll_requested: Arc::new(Signal::new()),
            host: Mutex::new(None),
            change_watcher: Mutex::new(None),
        }
    }
}

/// Applies edit script operations to a [`ListHost`].
struct HostUpdates<'a>(&'a dyn ListHost);

impl ListUpdateCallback for HostUpdates<'_> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        self.0.notify_item_range_inserted(position, count);
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.0.notify_item_range_removed(position, count);
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.0.notify_item_moved(from, to);
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        self.0.notify_item_range_changed(position, count);
    }
}

/// Schedules a scroll request for every insertion at the top.
struct ScrollOnTopInsert<'a> {
    scheduler: &'a Scheduler,
    scroll_requested: &'a Arc<Signal<bool>>,
    delay: Duration,
}

impl ListUpdateCallback for ScrollOnTopInsert<'_> {
    fn on_inserted(&mut self, position: usize, _count: usize) {
        if position == 0 {
            let scroll_requested = self.scroll_requested.clone();
            let id = self.scheduler.schedule_once(self.delay, move || {
                scroll_requested.emit(true);
            });
            tracing::trace!(target: "listbind::adapter", ?id, "scroll to top scheduled");
        }
    }

    fn on_removed(&mut self, _position: usize, _count: usize) {}

    fn on_moved(&mut self, _from: usize, _to: usize) {}

    fn on_changed(&mut self, _position: usize, _count: usize) {}
}

/// Binds an [`AdapterSource`] to a visual list and merges row events.
///
/// The scroll request is delivered through the [`Scheduler`] passed at
/// construction, so the UI loop must call
/// [`Scheduler::process_ready`] for it to fire.
pub struct ObservableAdapter<T> {
    source: Arc<AdapterSource<T>>,
    factory: Arc<dyn ViewFactory<T>>,
    scheduler: Arc<Scheduler>,
    config: AdapterConfig,
    item_event: Arc<Signal<ItemEvent<T>>>,
    scroll_requested: Arc<Signal<bool>>,
    host: Mutex<Option<Arc<dyn ListHost>>>,
    change_watcher: Mutex<Option<ConnectionGuard<Arc<DiffResult>>>>,
}

impl<T> ObservableAdapter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an adapter with the default configuration.
    pub fn new<F>(source: Arc<AdapterSource<T>>, factory: F, scheduler: Arc<Scheduler>) -> Self
    where
        F: ViewFactory<T> + 'static,
    {
        Self::builder(source, factory, scheduler).build()
    }

    /// Starts building an adapter.
    pub fn builder<F>(
        source: Arc<AdapterSource<T>>,
        factory: F,
        scheduler: Arc<Scheduler>,
    ) -> AdapterBuilder<T>
    where
        F: ViewFactory<T> + 'static,
    {
        AdapterBuilder {
            source,
            factory: Arc::new(factory),
            scheduler,
            config: AdapterConfig::default(),
        }
    }

    /// Creates an adapter with an explicit configuration.
    pub fn with_config<F>(
        source: Arc<AdapterSource<T>>,
        factory: F,
        scheduler: Arc<Scheduler>,
        config: AdapterConfig,
    ) -> Self
    where
        F: ViewFactory<T> + 'static,
    {
        AdapterBuilder {
            source,
            factory: Arc::new(factory),
            scheduler,
            config,
        }
        .build()
    }

    // -------------------------------------------------------------------------
    // Host lifecycle
    // -------------------------------------------------------------------------

    /// Attaches the adapter to a visual list.
    ///
    /// The host is fully re-rendered, then follows every subsequent update of
    /// the source. Attaching again replaces the previous host.
    pub fn on_attached(&self, host: Arc<dyn ListHost>) {
        tracing::debug!(
            target: "listbind::adapter",
            adapter = %self.config.name,
            host = host.name(),
            "attached"
        );
        host.notify_data_set_changed();

        let mut watcher = self.change_watcher.lock();
        *watcher = None;

        let scheduler = self.scheduler.clone();
        let scroll_requested = self.scroll_requested.clone();
        let delay = self.config.scroll_delay;
        let watched_host = host.clone();
        *watcher = Some(self.source.signals().diff_ready.connect_scoped(
            move |result: &Arc<DiffResult>| {
                result.dispatch_updates_to(&mut HostUpdates(watched_host.as_ref()));
                result.dispatch_updates_to(&mut ScrollOnTopInsert {
                    scheduler: &scheduler,
                    scroll_requested: &scroll_requested,
                    delay,
                });
            },
        ));
        drop(watcher);

        *self.host.lock() = Some(host);
    }

    /// Detaches the adapter from its visual list.
    ///
    /// Updates published after this call are not applied.
    pub fn on_detached(&self) {
        let watcher = self.change_watcher.lock().take();
        drop(watcher);
        if let Some(host) = self.host.lock().take() {
            tracing::debug!(
                target: "listbind::adapter",
                adapter = %self.config.name,
                host = host.name(),
                "detached"
            );
        }
    }

    /// Returns `true` while attached to a host.
    pub fn is_attached(&self) -> bool {
        self.change_watcher
            .lock()
            .as_ref()
            .is_some_and(|guard| guard.is_connected())
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Number of items to display.
    pub fn item_count(&self) -> usize {
        self.source.len()
    }

    /// View type of the item at `position`.
    pub fn item_view_type(&self, position: usize) -> AdapterResult<ViewType> {
        self.source
            .view_type(position)
            .ok_or_else(|| AdapterError::PositionOutOfBounds {
                position,
                len: self.source.len(),
            })
    }

    /// Creates a row for `view_type`.
    ///
    /// # Errors
    ///
    /// Fails when the source has no layout for the view type or the factory
    /// cannot inflate it. Both are configuration errors and are logged.
    pub fn create_view_holder(&self, view_type: ViewType) -> AdapterResult<Arc<ViewHolder<T>>> {
        let host_name = self.host_name();
        let Some(layout) = self.source.layout(view_type) else {
            tracing::error!(
                target: "listbind::adapter",
                adapter = %self.config.name,
                host = %host_name,
                %view_type,
                "no layout for view type"
            );
            return Err(AdapterError::UnknownViewType { view_type });
        };

        let view = self.factory.create(layout).map_err(|source| {
            tracing::error!(
                target: "listbind::adapter",
                adapter = %self.config.name,
                host = %host_name,
                %view_type,
                %layout,
                error = %source,
                "error inflating view"
            );
            AdapterError::Inflate {
                view_type,
                layout,
                source,
            }
        })?;

        Ok(Arc::new(ViewHolder::new(view, view_type)))
    }

    /// Binds the item at `position` to `holder`.
    pub fn bind_view_holder(
        &self,
        holder: &Arc<ViewHolder<T>>,
        position: usize,
    ) -> AdapterResult<()> {
        let item = self.item_at(position)?;
        holder.bind_to(item, position);
        Ok(())
    }

    /// Called when `holder` becomes visible at `position`.
    ///
    /// A row shown again without a new bind gets its item back from the
    /// source, without being re-rendered. The row's events are then forwarded
    /// to [`item_event`](Self::item_event).
    pub fn view_attached_to_window(
        &self,
        holder: &Arc<ViewHolder<T>>,
        position: usize,
    ) -> AdapterResult<()> {
        if holder.has_item() {
            holder.set_position(position);
        } else {
            let item = self.item_at(position)?;
            holder.reattach(item, position);
        }

        let Some(events) = holder.view().events() else {
            return Ok(());
        };

        let row = Arc::downgrade(holder);
        let item_event = self.item_event.clone();
        let guard = events.connect_scoped(move |event| match event {
            Ok(payload) => item_event.emit(ItemEvent::new(row.clone(), payload.clone())),
            Err(error) => {
                tracing::error!(
                    target: "listbind::adapter",
                    %error,
                    "row event source failed, dropping its subscription"
                );
                if let Some(holder) = row.upgrade() {
                    holder.cancel_events();
                }
            }
        });
        holder.set_subscription(guard);
        Ok(())
    }

    /// Called when `holder` leaves the viewport.
    pub fn view_detached_from_window(&self, holder: &ViewHolder<T>) {
        holder.detach();
    }

    /// Called when `holder` is recycled.
    pub fn view_recycled(&self, holder: &ViewHolder<T>) {
        holder.detach();
    }

    // -------------------------------------------------------------------------
    // Outward streams
    // -------------------------------------------------------------------------

    /// Events from every attached row, tagged with the row.
    pub fn item_event(&self) -> &Signal<ItemEvent<T>> {
        &self.item_event
    }

    /// Emits `true` `scroll_delay` after every insertion at the top.
    pub fn scroll_requested(&self) -> &Signal<bool> {
        &self.scroll_requested
    }

    /// The data source.
    pub fn source(&self) -> &Arc<AdapterSource<T>> {
        &self.source
    }

    /// The adapter configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn item_at(&self, position: usize) -> AdapterResult<T> {
        self.source
            .get(position)
            .ok_or_else(|| AdapterError::PositionOutOfBounds {
                position,
                len: self.source.len(),
            })
    }

    fn host_name(&self) -> String {
        self.host
            .lock()
            .as_ref()
            .map_or_else(|| "<detached>".to_string(), |host| host.name().to_string())
    }
}

impl<T> fmt::Debug for ObservableAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableAdapter")
            .field("config", &self.config)
            .field("attached", &self.host.lock().is_some())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ObservableAdapter<String>: Send, Sync);
