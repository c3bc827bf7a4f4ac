//! Error types for the list binding layer.

use thiserror::Error;

use crate::source::SourcePhase;
use crate::view_type::{LayoutId, ViewType};

/// Errors raised while turning a view type into a row.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The source has no layout for this view type.
    #[error("no layout registered for view type {view_type}")]
    UnknownViewType { view_type: ViewType },

    /// The view factory could not inflate the layout.
    #[error("failed to inflate {layout} for view type {view_type}: {source}")]
    Inflate {
        view_type: ViewType,
        layout: LayoutId,
        #[source]
        source: InflateError,
    },

    /// A row was bound to a position outside the current snapshot.
    #[error("position {position} out of bounds for list of length {len}")]
    PositionOutOfBounds { position: usize, len: usize },
}

/// Errors raised by [`AdapterSource`](crate::source::AdapterSource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// `set_data` was called while a previous update was still being
    /// published (for example from inside a subscriber).
    #[error("set_data called while a previous update is in progress (phase: {phase:?})")]
    UpdateInProgress { phase: SourcePhase },
}

/// Errors reported by a [`ViewFactory`](crate::adapter::ViewFactory).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InflateError {
    /// The factory does not know this layout.
    #[error("unknown {0}")]
    UnknownLayout(LayoutId),

    /// Building the view failed.
    #[error("{0}")]
    Failed(String),
}

/// Failure of a row's event source.
///
/// Sent on a row's event stream; the adapter logs it and abandons that row's
/// subscription.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row event source failed: {message}")]
pub struct RowEventError {
    message: String,
}

impl RowEventError {
    /// Creates an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
