//! Single-layout list with click events.
//!
//! A console "list" prints the minimal updates it receives; one row is
//! clicked and the click comes back as an item event.
//!
//! Run with: cargo run -p listbind --example simple_usage

use std::sync::Arc;

use listbind::adapter::{BindableView, EventPayload, ListHost, ObservableAdapter, RowEventStream};
use listbind::diff::{Diffable, ResolverDiff};
use listbind::listbind_core::Scheduler;
use listbind::{AdapterSource, InflateError, LayoutId};
use parking_lot::Mutex;

const DATA_LAYOUT: LayoutId = LayoutId(1);

#[derive(Debug, Clone)]
struct Data {
    label: String,
    detail: String,
}

impl Data {
    fn new(label: &str, detail: &str) -> Self {
        Self {
            label: label.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl Diffable for Data {
    fn equals_item(&self, other: &Self) -> bool {
        self.label == other.label
    }

    fn are_contents_the_same(&self, other: &Self) -> bool {
        self.detail == other.detail
    }
}

struct Click;

struct DataView {
    text: Mutex<String>,
    clicks: RowEventStream,
}

impl DataView {
    fn click(&self) {
        self.clicks.emit(Ok(EventPayload::new(Click)));
    }
}

impl BindableView<Data> for DataView {
    fn bind_to(&self, item: &Data) {
        *self.text.lock() = format!("{} ({})", item.label, item.detail);
        println!("  render row: {}", self.text.lock());
    }

    fn events(&self) -> Option<&RowEventStream> {
        Some(&self.clicks)
    }
}

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
        "console"
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let source = Arc::new(AdapterSource::simple(Vec::new(), DATA_LAYOUT, ResolverDiff));
    let views: Arc<Mutex<Vec<Arc<DataView>>>> = Arc::default();
    let created = views.clone();
    let factory = move |layout: LayoutId| -> Result<Arc<dyn BindableView<Data>>, InflateError> {
        if layout != DATA_LAYOUT {
            return Err(InflateError::UnknownLayout(layout));
        }
        let view = Arc::new(DataView {
            text: Mutex::new(String::new()),
            clicks: RowEventStream::new(),
        });
        created.lock().push(view.clone());
        Ok(view as Arc<dyn BindableView<Data>>)
    };
    let adapter = ObservableAdapter::new(source.clone(), factory, Arc::new(Scheduler::new()));

    adapter.item_event().connect(|event| {
        if event.payload().is::<Click>() {
            println!("clicked {}", event.require_item().label);
        }
    });
    adapter.on_attached(Arc::new(ConsoleList));

    let initial = vec![
        Data::new("Data 1", "detail 1"),
        Data::new("Data 2", "detail 2"),
        Data::new("Data 3", "detail 3"),
    ];
    if let Err(err) = source.set_data(initial.clone()) {
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

    if let Some(view) = views.lock().get(1) {
        view.click();
    }

    let mut next = initial;
    next.remove(0);
    next[1].detail = "detail 3 (edited)".to_string();
    next.push(Data::new("Data 4", "detail 4"));
    match source.set_data(next) {
        Ok(result) => println!("applied {result}"),
        Err(err) => eprintln!("update rejected: {err}"),
    }

    for holder in &rows {
        adapter.view_recycled(holder);
    }
    adapter.on_detached();
}
