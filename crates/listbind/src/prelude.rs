//! Convenient re-exports.
//!
//! ```
//! use listbind::prelude::*;
//! ```

pub use crate::adapter::{
    AdapterConfig, BindableView, EventPayload, ItemEvent, ListHost, ObservableAdapter,
    RowEventStream, SubscribeableView, ViewFactory, ViewHolder,
};
pub use crate::diff::{
    DiffEngine, DiffResult, DiffStrategy, Diffable, EditOp, Fingerprinted, FnDiff,
    ListUpdateCallback, MutableDiff, NaturalDiff, ResolverDiff,
};
pub use crate::error::{AdapterError, InflateError, RowEventError, SourceError};
pub use crate::source::{AdapterSource, SourceConfig};
pub use crate::view_type::{FnViewTypes, LayoutId, SingleLayout, ViewType, ViewTypeResolver};
pub use listbind_core::{ConnectionGuard, Scheduler, Signal};
