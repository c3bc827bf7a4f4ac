//! Integration tests for the adapter source.

use std::sync::Arc;

use listbind::diff::{EditOp, NaturalDiff};
use listbind::{
    AdapterSource, FnViewTypes, LayoutId, SourceConfig, SourceError, SourcePhase, ViewType,
};
use parking_lot::Mutex;

#[test]
fn test_subscribers_see_the_new_snapshot() {
    let source = Arc::new(AdapterSource::simple(vec![1, 2, 3], LayoutId(1), NaturalDiff));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let observer = source.clone();
    let sink = seen.clone();
    source.signals().diff_ready.connect(move |_| {
        sink.lock().push((observer.phase(), observer.data().to_vec()));
    });

    source.set_data(vec![3, 4]).unwrap();
    assert_eq!(*seen.lock(), vec![(SourcePhase::Published, vec![3, 4])]);
    assert_eq!(source.phase(), SourcePhase::Idle);
}

#[test]
fn test_data_changed_carries_the_snapshot() {
    let source = AdapterSource::simple(vec!["x"], LayoutId(1), NaturalDiff);
    let last = Arc::new(Mutex::new(None));
    let sink = last.clone();
    source.signals().data_changed.connect(move |data| {
        *sink.lock() = Some(data.clone());
    });

    source.set_data(vec!["y", "z"]).unwrap();
    let snapshot = last.lock().clone().unwrap();
    assert!(Arc::ptr_eq(&snapshot, &source.data()));
}

#[test]
fn test_unchanged_update_still_publishes() {
    let source = AdapterSource::simple(vec!["a"], LayoutId(1), NaturalDiff);
    let count = Arc::new(Mutex::new(0));
    let counter = count.clone();
    source.signals().diff_ready.connect(move |result| {
        assert!(result.is_empty());
        *counter.lock() += 1;
    });

    source.set_data(vec!["a"]).unwrap();
    assert_eq!(*count.lock(), 1);
}

#[test]
fn test_reentrant_update_leaves_snapshot_untouched() {
    let source = Arc::new(AdapterSource::simple(vec!["a"], LayoutId(1), NaturalDiff));
    let rejected = Arc::new(Mutex::new(None));

    let inner = source.clone();
    let sink = rejected.clone();
    source.signals().data_changed.connect(move |_| {
        *sink.lock() = Some(inner.set_data(vec!["nested"]));
    });

    source.set_data(vec!["b"]).unwrap();
    assert_eq!(
        rejected.lock().clone().unwrap().unwrap_err(),
        SourceError::UpdateInProgress {
            phase: SourcePhase::Published
        }
    );
    assert_eq!(*source.data(), vec!["b"]);
}

#[test]
fn test_simple_source_reports_permutation_without_moves() {
    let source = AdapterSource::simple(vec!["a", "b"], LayoutId(1), NaturalDiff);
    assert!(!source.config().detect_moves);
    let result = source.set_data(vec!["b", "a"]).unwrap();
    assert!(!result.has_moves());
    assert_eq!(source.view_type(0), Some(ViewType::SINGLE));
    assert_eq!(source.layout(ViewType::SINGLE), Some(LayoutId(1)));
}

#[test]
fn test_configured_source_detects_moves() {
    let resolver = FnViewTypes::new(
        |item: &&str, _| ViewType(item.len() as i32),
        |view_type| Some(LayoutId(10 + view_type.get())),
    );
    let source = AdapterSource::with_config(
        vec!["a", "bb"],
        NaturalDiff,
        resolver,
        SourceConfig::default(),
    );
    let result = source.set_data(vec!["bb", "a"]).unwrap();
    assert_eq!(result.len(), 1);
    assert!(matches!(result.ops()[0], EditOp::Move { .. }));

    assert_eq!(source.view_type(0), Some(ViewType(2)));
    assert_eq!(source.layout(ViewType(2)), Some(LayoutId(12)));
    assert_eq!(source.view_type(2), None);
}
