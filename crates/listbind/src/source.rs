//! The adapter source: owner of the current snapshot.
//!
//! An [`AdapterSource`] holds the list currently shown by an adapter. Every
//! call to [`AdapterSource::set_data`] diffs the new list against the current
//! snapshot, swaps the snapshot, rebuilds the fingerprint cache and then
//! publishes two notifications, in this order:
//!
//! 1. [`SourceSignals::diff_ready`] with the computed edit script;
//! 2. [`SourceSignals::data_changed`] with the new snapshot.
//!
//! # Single writer
//!
//! Updates follow a single-writer discipline. A `set_data` issued while a
//! previous update is still being published (for example from inside a
//! subscriber) is rejected with [`SourceError::UpdateInProgress`], and debug
//! builds assert that updates come from the thread that created the source.
//!
//! # Example
//!
//! ```
//! use listbind::diff::{EditOp, NaturalDiff};
//! use listbind::{AdapterSource, LayoutId};
//!
//! let source = AdapterSource::simple(vec!["a", "b", "c"], LayoutId(1), NaturalDiff);
//! let result = source.set_data(vec!["a", "c"]).unwrap();
//!
//! assert_eq!(result.ops(), &[EditOp::Remove { position: 1, count: 1 }]);
//! assert_eq!(source.get(1), Some("c"));
//! ```

use std::fmt;
use std::sync::Arc;

use listbind_core::{Signal, ThreadAffinity};
use parking_lot::{Mutex, RwLock};

use crate::diff::{DiffEngine, DiffResult, DiffStrategy, FingerprintCache};
use crate::error::SourceError;
use crate::view_type::{LayoutId, SingleLayout, ViewType, ViewTypeResolver};

/// Lifecycle of a source update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourcePhase {
    /// No update in progress.
    #[default]
    Idle,
    /// The edit script is being computed.
    Diffing,
    /// The new snapshot is installed and notifications are being delivered.
    Published,
}

/// Configuration for an [`AdapterSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Report reordered items as moves instead of remove + insert.
    pub detect_moves: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { detect_moves: true }
    }
}

impl SourceConfig {
    /// Configuration with move detection switched on or off.
    pub fn with_detect_moves(detect_moves: bool) -> Self {
        Self { detect_moves }
    }
}

/// Signals published by an [`AdapterSource`].
pub struct SourceSignals<T> {
    /// Emitted with the edit script of every update, before `data_changed`.
    pub diff_ready: Signal<Arc<DiffResult>>,
    /// Emitted with the new snapshot of every update.
    pub data_changed: Signal<Arc<Vec<T>>>,
}

impl<T: Send + Sync + 'static> SourceSignals<T> {
    fn new() -> Self {
        Self {
            diff_ready: Signal::new(),
            data_changed: Signal::new(),
        }
    }
}

struct SourceState<T> {
    snapshot: Arc<Vec<T>>,
    /// Aligned with `snapshot`.
    fingerprints: FingerprintCache,
}

/// Returns the phase to `Idle` when an update ends, even by unwinding.
struct PhaseGuard<'a>(&'a Mutex<SourcePhase>);

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock() = SourcePhase::Idle;
    }
}

/// Data source for an [`ObservableAdapter`](crate::adapter::ObservableAdapter).
///
/// Owns the current snapshot and its fingerprint cache, computes the edit
/// script of every update, and classifies items into view types through a
/// [`ViewTypeResolver`].
pub struct AdapterSource<T> {
    state: RwLock<SourceState<T>>,
    phase: Mutex<SourcePhase>,
    engine: DiffEngine<Arc<dyn DiffStrategy<T>>>,
    resolver: Arc<dyn ViewTypeResolver<T>>,
    config: SourceConfig,
    signals: SourceSignals<T>,
    affinity: ThreadAffinity,
}

impl<T> AdapterSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a source with the default configuration (moves detected).
    pub fn new<S, R>(data: Vec<T>, strategy: S, resolver: R) -> Self
    where
        S: DiffStrategy<T> + 'static,
        R: ViewTypeResolver<T> + 'static,
    {
        Self::with_config(data, strategy, resolver, SourceConfig::default())
    }

    /// Creates a source with an explicit configuration.
    pub fn with_config<S, R>(data: Vec<T>, strategy: S, resolver: R, config: SourceConfig) -> Self
    where
        S: DiffStrategy<T> + 'static,
        R: ViewTypeResolver<T> + 'static,
    {
        let strategy: Arc<dyn DiffStrategy<T>> = Arc::new(strategy);
        let fingerprints = FingerprintCache::build(data.as_slice(), &strategy);
        Self {
            state: RwLock::new(SourceState {
                snapshot: Arc::new(data),
                fingerprints,
            }),
            phase: Mutex::new(SourcePhase::Idle),
            engine: DiffEngine::new(strategy),
            resolver: Arc::new(resolver),
            config,
            signals: SourceSignals::new(),
            affinity: ThreadAffinity::current(),
        }
    }

    /// Creates a homogeneous source: one view type ([`ViewType::SINGLE`]) and
    /// one layout. Move detection is off.
    pub fn simple<S>(data: Vec<T>, layout: LayoutId, strategy: S) -> Self
    where
        S: DiffStrategy<T> + 'static,
    {
        Self::with_config(
            data,
            strategy,
            SingleLayout::new(layout),
            SourceConfig::with_detect_moves(false),
        )
    }

    /// Replaces the snapshot and publishes the update.
    ///
    /// Returns the edit script that was published.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UpdateInProgress`] if called while a previous
    /// update is still being published. The snapshot is left untouched.
    pub fn set_data(&self, data: Vec<T>) -> Result<Arc<DiffResult>, SourceError> {
        self.affinity.debug_assert_owner("AdapterSource::set_data");

        {
            let mut phase = self.phase.lock();
            if *phase != SourcePhase::Idle {
                tracing::warn!(
                    target: "listbind::source",
                    phase = ?*phase,
                    "rejected re-entrant set_data"
                );
                return Err(SourceError::UpdateInProgress { phase: *phase });
            }
            *phase = SourcePhase::Diffing;
        }
        let _idle = PhaseGuard(&self.phase);

        let new = Arc::new(data);
        let result = {
            let state = self.state.read();
            self.engine.calculate(
                state.snapshot.as_slice(),
                new.as_slice(),
                Some(&state.fingerprints),
                self.config.detect_moves,
            )
        };

        {
            let mut state = self.state.write();
            state.fingerprints = FingerprintCache::build(new.as_slice(), self.engine.strategy());
            state.snapshot = new.clone();
        }
        *self.phase.lock() = SourcePhase::Published;

        tracing::debug!(
            target: "listbind::source",
            len = new.len(),
            ops = result.len(),
            "publishing snapshot"
        );

        let result = Arc::new(result);
        self.signals.diff_ready.emit(result.clone());
        self.signals.data_changed.emit(new);
        Ok(result)
    }

    /// The current snapshot.
    pub fn data(&self) -> Arc<Vec<T>> {
        self.state.read().snapshot.clone()
    }

    /// The item at `position`, or `None` when out of bounds.
    pub fn get(&self, position: usize) -> Option<T> {
        self.state.read().snapshot.get(position).cloned()
    }

    /// Number of items in the snapshot.
    pub fn len(&self) -> usize {
        self.state.read().snapshot.len()
    }

    /// Returns `true` if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View type of the item at `position`, or `None` when out of bounds.
    pub fn view_type(&self, position: usize) -> Option<ViewType> {
        let state = self.state.read();
        state
            .snapshot
            .get(position)
            .map(|item| self.resolver.view_type(item, position))
    }

    /// Layout for `view_type`, or `None` when the resolver does not know it.
    pub fn layout(&self, view_type: ViewType) -> Option<LayoutId> {
        self.resolver.layout(view_type)
    }

    /// The fingerprints recorded for the current snapshot.
    pub fn fingerprints(&self) -> FingerprintCache {
        self.state.read().fingerprints.clone()
    }
}

impl<T> AdapterSource<T> {
    /// Current update phase.
    pub fn phase(&self) -> SourcePhase {
        *self.phase.lock()
    }

    /// The source configuration.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Signals published on every update.
    pub fn signals(&self) -> &SourceSignals<T> {
        &self.signals
    }
}

impl<T> fmt::Debug for AdapterSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterSource")
            .field("len", &self.state.read().snapshot.len())
            .field("phase", &*self.phase.lock())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(AdapterSource<String>: Send, Sync);
