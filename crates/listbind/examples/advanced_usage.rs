//! Multiple view types, mutable items and several event kinds.
//!
//! Items are shared, mutable records. Mutating one in place and publishing
//! the same list again is detected through fingerprints and reported as a
//! change of that single row.
//!
//! Run with: cargo run -p listbind --example advanced_usage

use std::sync::Arc;

use listbind::adapter::{BindableView, EventPayload, ListHost, ObservableAdapter, RowEventStream};
use listbind::diff::{Diffable, Fingerprinted, MutableDiff, ResolverDiff, hash_of};
use listbind::listbind_core::Scheduler;
use listbind::{
    AdapterConfig, AdapterSource, InflateError, LayoutId, SourceConfig, ViewType, ViewTypeResolver,
};
use parking_lot::{Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    First,
    Second,
    Third,
    Mutated,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Record {
    label: String,
    detail: String,
    kind: Kind,
}

/// A record shared between the application and the list.
#[derive(Debug, Clone)]
struct AdvancedData(Arc<RwLock<Record>>);

impl AdvancedData {
    fn new(label: &str, detail: &str, kind: Kind) -> Self {
        Self(Arc::new(RwLock::new(Record {
            label: label.to_string(),
            detail: detail.to_string(),
            kind,
        })))
    }

    fn label(&self) -> String {
        self.0.read().label.clone()
    }

    fn kind(&self) -> Kind {
        self.0.read().kind
    }
}

impl Diffable for AdvancedData {
    fn equals_item(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        let (this, other) = (self.0.read(), other.0.read());
        this.kind == other.kind && this.label == other.label
    }

    fn are_contents_the_same(&self, other: &Self) -> bool {
        self.0.read().detail == other.0.read().detail
    }
}

impl Fingerprinted for AdvancedData {
    fn fingerprint(&self) -> u64 {
        hash_of(&*self.0.read())
    }
}

/// Maps records to three row layouts.
struct ByKind;

impl ViewTypeResolver<AdvancedData> for ByKind {
    fn view_type(&self, item: &AdvancedData, _position: usize) -> ViewType {
        match item.kind() {
            Kind::First => ViewType(1),
            Kind::Second => ViewType(2),
            Kind::Third | Kind::Mutated => ViewType(3),
        }
    }

    fn layout(&self, view_type: ViewType) -> Option<LayoutId> {
        match view_type.get() {
            1..=3 => Some(LayoutId(100 + view_type.get())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Click,
    LongClick,
}

struct AdvancedDataView {
    layout: LayoutId,
    gestures: RowEventStream,
}

impl AdvancedDataView {
    fn gesture(&self, gesture: Gesture) {
        self.gestures.emit(Ok(EventPayload::new(gesture)));
    }
}

impl BindableView<AdvancedData> for AdvancedDataView {
    fn bind_to(&self, item: &AdvancedData) {
        let record = item.0.read();
        println!(
            "  render {}: {}[{:?}] {}",
            self.layout, record.label, record.kind, record.detail
        );
    }

    fn events(&self) -> Option<&RowEventStream> {
        Some(&self.gestures)
    }
}

type RowView = Arc<dyn BindableView<AdvancedData>>;

struct ConsoleList;

impl ListHost for ConsoleList {
    fn notify_data_set_changed(&self) {
        println!("list: full refresh");
    }

    fn notify_item_range_inserted(&self, position: usize, count: usize) {
        println!("list: {count} inserted at {position}");
    }

    fn notify_item_range_removed(&self, position: usize, count: usize) {
        println!("list: {count} removed at {position}");
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        println!("list: moved {from} -> {to}");
    }

    fn notify_item_range_changed(&self, position: usize, count: usize) {
        println!("list: {count} changed at {position}");
    }

    fn name(&self) -> &str {
        "advanced"
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("listbind=debug,listbind_core=info")
        .init();

    let data = vec![
        AdvancedData::new("Data 1", "detail 1", Kind::First),
        AdvancedData::new("Data 2", "detail 2", Kind::Second),
        AdvancedData::new("Data 3", "detail 3", Kind::Second),
        AdvancedData::new("Data 4", "detail 4", Kind::Second),
        AdvancedData::new("Data 5", "detail 5", Kind::Third),
        AdvancedData::new("Data 6", "detail 6", Kind::Third),
    ];

    let source = Arc::new(AdapterSource::with_config(
        Vec::new(),
        MutableDiff::new(ResolverDiff),
        ByKind,
        SourceConfig::with_detect_moves(false),
    ));

    let views: Arc<Mutex<Vec<Arc<AdvancedDataView>>>> = Arc::default();
    let created = views.clone();
    let factory = move |layout: LayoutId| -> Result<RowView, InflateError> {
        let view = Arc::new(AdvancedDataView {
            layout,
            gestures: RowEventStream::new(),
        });
        created.lock().push(view.clone());
        Ok(view as RowView)
    };

    let scheduler = Arc::new(Scheduler::new());
    let adapter = ObservableAdapter::with_config(
        source.clone(),
        factory,
        scheduler.clone(),
        AdapterConfig::with_name("advanced"),
    );

    adapter.item_event().connect(|event| match event.payload().downcast_ref::<Gesture>() {
        Some(Gesture::Click) => println!("clicked {}", event.require_item().label()),
        Some(Gesture::LongClick) => println!("long clicked {}", event.require_item().label()),
        None => println!("unexpected event {}", event.payload().type_name()),
    });
    adapter.scroll_requested().connect(|_| println!("scroll to top"));
    adapter.on_attached(Arc::new(ConsoleList));

    if let Err(err) = source.set_data(data.clone()) {
        eprintln!("update rejected: {err}");
        return;
    }

    let mut rows = Vec::new();
    for position in 0..adapter.item_count() {
        let bound = adapter
            .item_view_type(position)
            .and_then(|view_type| adapter.create_view_holder(view_type))
            .and_then(|holder| {
                adapter.bind_view_holder(&holder, position)?;
                adapter.view_attached_to_window(&holder, position)?;
                Ok(holder)
            });
        match bound {
            Ok(holder) => rows.push(holder),
            Err(err) => eprintln!("row {position}: {err}"),
        }
    }

    {
        let views = views.lock();
        if let (Some(first), Some(last)) = (views.first(), views.last()) {
            first.gesture(Gesture::Click);
            last.gesture(Gesture::LongClick);
        }
    }

    // Mutate one record in place and publish the same list again.
    let mutated = 3;
    data[mutated].0.write().kind = Kind::Mutated;
    println!("mutation at {mutated}");
    match source.set_data(data.clone()) {
        Ok(result) => println!("applied {result}"),
        Err(err) => eprintln!("update rejected: {err}"),
    }

    // An insertion at the top asks the list to scroll once the update settles.
    let mut with_header = vec![AdvancedData::new("Header", "pinned", Kind::First)];
    with_header.extend(data);
    if let Err(err) = source.set_data(with_header) {
        eprintln!("update rejected: {err}");
    }
    while scheduler.active_count() > 0 {
        if let Some(wait) = scheduler.time_until_next() {
            std::thread::sleep(wait);
        }
        scheduler.process_ready();
    }

    for holder in &rows {
        adapter.view_detached_from_window(holder);
    }
    adapter.on_detached();
}
