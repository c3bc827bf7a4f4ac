//! List binding for scrollable item views.
//!
//! listbind keeps a visual list (a [`ListHost`](adapter::ListHost)) in sync
//! with an immutable snapshot of data held by an [`AdapterSource`]:
//!
//! - **Diffing**: every new snapshot is compared with the previous one and a
//!   minimal, ordered edit script (removals, moves, insertions, changes) is
//!   published, so the host only re-renders what changed. See [`diff`].
//! - **Mutation detection**: items whose identity is stable but whose content
//!   was mutated in place are detected through fingerprints taken when the
//!   previous snapshot was published.
//! - **Row lifecycle**: the [`ObservableAdapter`] creates rows through a view
//!   factory, binds items to them, and tracks attach/detach/recycle.
//! - **Item events**: events produced by rows (clicks, long clicks, custom
//!   payloads) are merged into one stream tagged with the originating row.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use listbind::{AdapterSource, LayoutId, ViewType, ViewTypeResolver};
//! use listbind::diff::NaturalDiff;
//!
//! struct ByLength;
//!
//! impl ViewTypeResolver<String> for ByLength {
//!     fn view_type(&self, item: &String, _position: usize) -> ViewType {
//!         ViewType(if item.len() > 3 { 1 } else { 0 })
//!     }
//!
//!     fn layout(&self, view_type: ViewType) -> Option<LayoutId> {
//!         Some(LayoutId(100 + view_type.get()))
//!     }
//! }
//!
//! let source = AdapterSource::new(vec!["a".to_string()], NaturalDiff, ByLength);
//! source.signals().diff_ready.connect(|result| println!("update: {result}"));
//!
//! let result = source.set_data(vec!["a".to_string(), "long".to_string()]).unwrap();
//! assert_eq!(result.to_string(), "[insert 1 at 1]");
//! assert_eq!(source.view_type(1), Some(ViewType(1)));
//! ```
//!
//! # Row Events
//!
//! ```
//! use listbind::adapter::{BindableView, EventPayload, RowEventStream};
//!
//! struct Button {
//!     clicks: RowEventStream,
//! }
//!
//! impl BindableView<u32> for Button {
//!     fn bind_to(&self, _item: &u32) {}
//!
//!     fn events(&self) -> Option<&RowEventStream> {
//!         Some(&self.clicks)
//!     }
//! }
//!
//! let button = Button { clicks: RowEventStream::new() };
//! button.clicks.emit(Ok(EventPayload::new("click")));
//! ```
//!
//! # Threading
//!
//! An [`AdapterSource`] is updated from the thread that created it (checked
//! in debug builds). Updates are published synchronously, in order, and a
//! re-entrant `set_data` from inside a subscriber is rejected with
//! [`SourceError::UpdateInProgress`].

pub mod adapter;
pub mod diff;
mod error;
pub mod prelude;
pub mod source;
mod view_type;

pub use adapter::{AdapterBuilder, AdapterConfig, ObservableAdapter};
pub use error::{AdapterError, AdapterResult, InflateError, RowEventError, SourceError};
pub use source::{AdapterSource, SourceConfig, SourcePhase, SourceSignals};
pub use view_type::{FnViewTypes, LayoutId, SingleLayout, ViewType, ViewTypeResolver};

pub use listbind_core;
