//! Signal/slot system for listbind.
//!
//! This module provides the push channel used everywhere in listbind: the
//! adapter source publishes edit scripts and snapshots through signals, rows
//! publish their events through signals, and the adapter merges those into a
//! single outward item event signal.
//!
//! Slots are invoked synchronously on the emitting thread, exactly once per
//! emission, in connection order. The connection table is not locked while
//! slots run, so a slot may connect or disconnect (itself or any other slot)
//! during an emission. A slot disconnected during an emission is not invoked
//! for the remainder of that emission.
//!
//! ```
//! use listbind_core::Signal;
//!
//! let rows_inserted = Signal::<(usize, usize)>::new();
//! let id = rows_inserted.connect(|&(position, count)| {
//!     println!("{count} rows at {position}");
//! });
//!
//! rows_inserted.emit((0, 3));
//! assert!(rows_inserted.disconnect(id));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Slot<Args>,
    /// Connection order; slotmap iteration order is not.
    seq: u64,
    /// Cleared on disconnect; checked before every invocation.
    active: Arc<AtomicBool>,
}

struct SignalInner<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    next_seq: AtomicU64,
}

impl<Args> SignalInner<Args> {
    fn disconnect(&self, id: ConnectionId) -> bool {
        match self.connections.lock().remove(id) {
            Some(conn) => {
                conn.active.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }
}

impl<Args> Drop for SignalInner<Args> {
    fn drop(&mut self) {
        for (_, conn) in self.connections.get_mut().drain() {
            conn.active.store(false, Ordering::SeqCst);
        }
    }
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
pub struct Signal<Args> {
    inner: Arc<SignalInner<Args>>,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.inner.connections.lock().len())
            .finish()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                connections: Mutex::new(SlotMap::with_key()),
                next_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use listbind_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect_inner(slot).0
    }

    fn connect_inner<F>(&self, slot: F) -> (ConnectionId, Arc<AtomicBool>)
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let connection = Connection {
            slot: Arc::new(slot),
            seq: self.inner.next_seq.fetch_add(1, Ordering::Relaxed),
            active: active.clone(),
        };
        let id = self.inner.connections.lock().insert(connection);
        (id, active)
    }

    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// The guard only holds a weak reference to the signal, so it may outlive
    /// it; dropping a guard of a dropped signal does nothing.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let (id, active) = self.connect_inner(slot);
        ConnectionGuard {
            signal: Arc::downgrade(&self.inner),
            id,
            active,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.inner.disconnect(id)
    }

    /// Disconnect a slot, reporting an unknown ID as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        for (_, conn) in self.inner.connections.lock().drain() {
            conn.active.store(false, Ordering::SeqCst);
        }
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.inner.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// Every slot that is connected when the emission starts, and is still
    /// connected when its turn comes, is invoked once with `args`.
    #[tracing::instrument(skip_all, target = "listbind_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        // Snapshot the connections so slots can reconnect/disconnect freely.
        let snapshot: Vec<(Slot<Args>, Arc<AtomicBool>)> = {
            let connections = self.inner.connections.lock();
            let mut ordered: Vec<&Connection<Args>> = connections.values().collect();
            ordered.sort_unstable_by_key(|conn| conn.seq);
            ordered
                .into_iter()
                .map(|conn| (conn.slot.clone(), conn.active.clone()))
                .collect()
        };
        tracing::trace!(
            target: "listbind_core::signal",
            connection_count = snapshot.len(),
            "emitting signal"
        );

        for (slot, active) in snapshot {
            if active.load(Ordering::SeqCst) {
                slot(&args);
            }
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. Besides RAII cleanup, the guard
/// reports whether its connection is still live, which is how row
/// subscriptions expose their termination.
///
/// # Example
///
/// ```
/// use listbind_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);  // counter = 42
/// }
/// signal.emit(43);  // Nothing happens - connection was dropped
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args> {
    signal: Weak<SignalInner<Args>>,
    id: ConnectionId,
    active: Arc<AtomicBool>,
}

impl<Args> ConnectionGuard<Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` while the slot can still be invoked.
    ///
    /// Becomes `false` once the guard disconnects, the connection is removed
    /// through the signal, or the signal is dropped.
    pub fn is_connected(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Disconnect now. Idempotent: returns `true` only for the call that
    /// actually removed the connection.
    pub fn disconnect(&mut self) -> bool {
        if !self.active.swap(false, Ordering::SeqCst) {
            return false;
        }
        if let Some(inner) = self.signal.upgrade() {
            inner.disconnect(self.id);
        }
        true
    }
}

impl<Args> fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder<T: Clone + Send + 'static>(signal: &Signal<T>) -> Arc<Mutex<Vec<T>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        signal.connect(move |value: &T| sink.lock().push(value.clone()));
        seen
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<usize>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for slot in 0..3 {
            let order = order.clone();
            signal.connect(move |&position| order.lock().push((slot, position)));
        }

        signal.emit(4);
        assert_eq!(*order.lock(), vec![(0, 4), (1, 4), (2, 4)]);
        assert_eq!(signal.connection_count(), 3);
    }

    #[test]
    fn test_order_survives_slot_reuse() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let connect = |name: &'static str| {
            let order = order.clone();
            signal.connect(move |_| order.lock().push(name))
        };

        let first = connect("first");
        connect("second");
        signal.disconnect(first);
        connect("third");

        signal.emit(());
        assert_eq!(*order.lock(), vec!["second", "third"]);
    }

    #[test]
    fn test_disconnect_by_id() {
        let signal = Signal::<&'static str>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = signal.connect(move |&row| sink.lock().push(row));

        signal.emit("a");
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert_eq!(signal.try_disconnect(id), Err(SignalError::InvalidConnection));
        signal.emit("b");
        assert_eq!(*seen.lock(), vec!["a"]);
    }

    #[test]
    fn test_disconnect_all_ends_guards() {
        let signal = Signal::<()>::new();
        let guard = signal.connect_scoped(|_| {});
        signal.connect(|_| {});

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
        assert!(!guard.is_connected());
    }

    #[test]
    fn test_guard_lifecycle() {
        let signal = Signal::<u32>::new();
        let mut guard = signal.connect_scoped(|_| {});
        assert!(guard.is_connected());
        assert_eq!(signal.connection_count(), 1);

        assert!(guard.disconnect());
        assert!(!guard.disconnect());
        assert!(!guard.is_connected());
        assert_eq!(signal.connection_count(), 0);

        let other = signal.connect_scoped(|_| {});
        let id = other.id();
        drop(other);
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_guard_outlives_signal() {
        let signal = Signal::<u32>::new();
        let mut guard = signal.connect_scoped(|_| {});
        drop(signal);

        assert!(!guard.is_connected());
        assert!(!guard.disconnect());
    }

    #[test]
    fn test_slot_disconnecting_a_later_slot() {
        let signal = Arc::new(Signal::<u32>::new());
        let later_id = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let signal_ref = Arc::downgrade(&signal);
        let victim = later_id.clone();
        signal.connect(move |_| {
            if let (Some(signal), Some(id)) = (signal_ref.upgrade(), victim.lock().take()) {
                signal.disconnect(id);
            }
        });
        let counter = calls.clone();
        *later_id.lock() = Some(signal.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        signal.emit(1);
        signal.emit(2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(signal.connection_count(), 1);
    }

    #[test]
    fn test_slot_connecting_during_emit() {
        let signal = Arc::new(Signal::<u32>::new());
        let signal_ref = Arc::downgrade(&signal);
        let late_calls = Arc::new(AtomicUsize::new(0));

        let counter = late_calls.clone();
        signal.connect(move |&value| {
            if value == 1 {
                if let Some(signal) = signal_ref.upgrade() {
                    let counter = counter.clone();
                    signal.connect(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
                }
            }
        });

        signal.emit(1);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        signal.emit(2);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 2);
    }

    #[test]
    fn test_emit_from_several_threads() {
        let signal = Arc::new(Signal::<usize>::new());
        let seen = recorder(&signal);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let signal = signal.clone();
                std::thread::spawn(move || signal.emit(i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen = seen.lock().clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }
}
