//! Integration tests for the observable adapter: host updates, row lifecycle
//! and item event forwarding.

use std::sync::Arc;
use std::time::{Duration, Instant};

use listbind::adapter::{
    BindableView, EventPayload, ItemEvent, ListHost, ObservableAdapter, RowEventStream,
    SubscribeableView,
};
use listbind::diff::{Diffable, Fingerprinted, MutableDiff, ResolverDiff};
use listbind::listbind_core::Scheduler;
use listbind::{AdapterSource, InflateError, LayoutId, RowEventError, ViewType};
use parking_lot::{Mutex, RwLock};

#[derive(Default)]
struct RecordingHost {
    calls: Mutex<Vec<String>>,
}

impl ListHost for RecordingHost {
    fn notify_data_set_changed(&self) {
        self.calls.lock().push("reset".into());
    }

    fn notify_item_range_inserted(&self, position: usize, count: usize) {
        self.calls.lock().push(format!("insert {position} {count}"));
    }

    fn notify_item_range_removed(&self, position: usize, count: usize) {
        self.calls.lock().push(format!("remove {position} {count}"));
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        self.calls.lock().push(format!("move {from} {to}"));
    }

    fn notify_item_range_changed(&self, position: usize, count: usize) {
        self.calls.lock().push(format!("change {position} {count}"));
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Click;

/// Row that records renders and subscribe calls.
#[derive(Default)]
struct Row {
    log: Mutex<Vec<String>>,
    events: RowEventStream,
}

impl Row {
    fn click(&self) {
        self.events.emit(Ok(EventPayload::new(Click)));
    }

    fn fail(&self) {
        self.events.emit(Err(RowEventError::new("stream closed")));
    }

    fn count(&self, prefix: &str) -> usize {
        self.log.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl BindableView<String> for Row {
    fn bind_to(&self, item: &String) {
        self.log.lock().push(format!("bind {item}"));
    }

    fn events(&self) -> Option<&RowEventStream> {
        Some(&self.events)
    }

    fn as_subscribeable(&self) -> Option<&dyn SubscribeableView<String>> {
        Some(self)
    }
}

impl SubscribeableView<String> for Row {
    fn subscribe(&self, item: &String) {
        self.log.lock().push(format!("subscribe {item}"));
    }

    fn unsubscribe(&self) {
        self.log.lock().push("unsubscribe".into());
    }
}

type RowView = Arc<dyn BindableView<String>>;

/// Hands out rows and remembers them so tests can drive their events.
#[derive(Default, Clone)]
struct RowFactory {
    created: Arc<Mutex<Vec<Arc<Row>>>>,
}

impl RowFactory {
    fn row(&self, index: usize) -> Arc<Row> {
        self.created.lock()[index].clone()
    }

    fn into_factory(self) -> impl Fn(LayoutId) -> Result<RowView, InflateError> + Send + Sync {
        move |_layout| {
            let row = Arc::new(Row::default());
            self.created.lock().push(row.clone());
            Ok(row as RowView)
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn setup(
    items: &[&str],
) -> (
    Arc<AdapterSource<String>>,
    ObservableAdapter<String>,
    RowFactory,
    Arc<Scheduler>,
) {
    let source = Arc::new(AdapterSource::new(
        strings(items),
        listbind::diff::NaturalDiff,
        listbind::SingleLayout::new(LayoutId(7)),
    ));
    let rows = RowFactory::default();
    let scheduler = Arc::new(Scheduler::new());
    let adapter = ObservableAdapter::new(
        source.clone(),
        rows.clone().into_factory(),
        scheduler.clone(),
    );
    (source, adapter, rows, scheduler)
}

fn record_events(adapter: &ObservableAdapter<String>) -> Arc<Mutex<Vec<ItemEvent<String>>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    adapter.item_event().connect(move |event| sink.lock().push(event.clone()));
    events
}

#[test]
fn test_attach_renders_fully_then_applies_scripts_in_order() {
    let (source, adapter, _, _) = setup(&["a", "b", "c", "e"]);
    let host = Arc::new(RecordingHost::default());
    adapter.on_attached(host.clone());

    source.set_data(strings(&["a", "c", "e"])).unwrap();
    source.set_data(strings(&["e", "a", "c", "d"])).unwrap();

    assert_eq!(
        *host.calls.lock(),
        vec!["reset", "remove 1 1", "move 2 0", "insert 3 1"]
    );
}

#[test]
fn test_detach_stops_updates() {
    let (source, adapter, _, _) = setup(&["a"]);
    let host = Arc::new(RecordingHost::default());
    adapter.on_attached(host.clone());
    adapter.on_detached();

    source.set_data(strings(&["b"])).unwrap();
    assert_eq!(*host.calls.lock(), vec!["reset"]);
}

#[test]
fn test_scroll_request_fires_through_scheduler() {
    let (source, adapter, _, scheduler) = setup(&["b"]);
    adapter.on_attached(Arc::new(RecordingHost::default()));
    let scrolls = Arc::new(Mutex::new(0usize));
    let counter = scrolls.clone();
    adapter.scroll_requested().connect(move |requested| {
        assert!(*requested);
        *counter.lock() += 1;
    });

    let start = Instant::now();
    source.set_data(strings(&["a", "b"])).unwrap();
    source.set_data(strings(&["z", "a", "b"])).unwrap();

    assert_eq!(scheduler.process_ready_at(start), 0);
    assert_eq!(*scrolls.lock(), 0);

    // Both triggers fire.
    assert_eq!(scheduler.process_ready_at(start + Duration::from_secs(1)), 2);
    assert_eq!(*scrolls.lock(), 2);
}

#[test]
fn test_row_events_become_item_events() {
    let (_, adapter, rows, _) = setup(&["a", "b"]);
    let events = record_events(&adapter);

    let first = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    let second = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    adapter.bind_view_holder(&first, 0).unwrap();
    adapter.bind_view_holder(&second, 1).unwrap();
    adapter.view_attached_to_window(&first, 0).unwrap();
    adapter.view_attached_to_window(&second, 1).unwrap();

    rows.row(1).click();
    rows.row(0).click();

    let events = events.lock();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].require_item(), "b");
    assert_eq!(events[1].require_item(), "a");
    assert!(events[0].payload().is::<Click>());
    assert!(Arc::ptr_eq(&events[0].require_view(), &second));
}

#[test]
fn test_row_error_is_isolated() {
    let (_, adapter, rows, _) = setup(&["a", "b"]);
    let events = record_events(&adapter);

    let first = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    let second = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    for (position, holder) in [&first, &second].into_iter().enumerate() {
        adapter.bind_view_holder(holder, position).unwrap();
        adapter.view_attached_to_window(holder, position).unwrap();
    }

    rows.row(0).fail();
    assert!(!first.is_subscribed());
    assert!(second.is_subscribed());

    rows.row(0).click();
    rows.row(1).click();
    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].require_item(), "b");
}

#[test]
fn test_recycled_row_has_no_item() {
    let (_, adapter, rows, _) = setup(&["a"]);
    let events = record_events(&adapter);

    let holder = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    adapter.bind_view_holder(&holder, 0).unwrap();
    adapter.view_attached_to_window(&holder, 0).unwrap();
    rows.row(0).click();

    adapter.view_recycled(&holder);
    let event = events.lock()[0].clone();
    assert!(event.view().is_some());
    assert!(event.item().is_none());

    // Events after recycling are not forwarded.
    rows.row(0).click();
    assert_eq!(events.lock().len(), 1);
}

#[test]
#[should_panic(expected = "item not attached to event")]
fn test_require_item_after_recycle_panics() {
    let (_, adapter, rows, _) = setup(&["a"]);
    let events = record_events(&adapter);

    let holder = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    adapter.bind_view_holder(&holder, 0).unwrap();
    adapter.view_attached_to_window(&holder, 0).unwrap();
    rows.row(0).click();
    adapter.view_recycled(&holder);

    let event = events.lock()[0].clone();
    event.require_item();
}

#[test]
fn test_reattach_without_bind_restores_item() {
    let (_, adapter, rows, _) = setup(&["a", "b"]);
    let holder = adapter.create_view_holder(ViewType::SINGLE).unwrap();
    adapter.bind_view_holder(&holder, 1).unwrap();
    adapter.view_attached_to_window(&holder, 1).unwrap();
    let row = rows.row(0);
    assert_eq!(row.count("subscribe"), 1);

    adapter.view_detached_from_window(&holder);
    assert!(!holder.has_item());
    assert!(!holder.is_subscribed());
    assert_eq!(row.events.connection_count(), 0);

    adapter.view_attached_to_window(&holder, 1).unwrap();
    assert_eq!(holder.item().as_deref(), Some("b"));
    assert!(holder.is_subscribed());
    assert_eq!(row.count("bind"), 1);
    assert_eq!(row.count("subscribe"), 2);
    assert_eq!(row.count("unsubscribe"), 1);
    assert_eq!(row.events.connection_count(), 1);
}

// A mutable item whose content changes in place.

#[derive(Debug, Clone)]
struct Task {
    id: u32,
    title: Arc<RwLock<String>>,
}

impl Diffable for Task {
    fn equals_item(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn are_contents_the_same(&self, other: &Self) -> bool {
        *self.title.read() == *other.title.read()
    }
}

impl Fingerprinted for Task {
    fn fingerprint(&self) -> u64 {
        listbind::diff::hash_of(&*self.title.read())
    }
}

#[test]
fn test_in_place_mutation_reported_as_change() {
    let tasks: Vec<Task> = (0..3)
        .map(|id| Task {
            id,
            title: Arc::new(RwLock::new(format!("task {id}"))),
        })
        .collect();
    let source = AdapterSource::simple(tasks.clone(), LayoutId(1), MutableDiff::new(ResolverDiff));
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    source.signals().diff_ready.connect(move |result| {
        sink.lock().push(result.to_string());
    });

    *tasks[2].title.write() = "renamed".to_string();
    source.set_data(tasks.clone()).unwrap();

    assert_eq!(*recorded.lock(), vec!["[change 1 at 2]"]);
}
