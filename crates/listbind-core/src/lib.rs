//! Core systems for listbind.
//!
//! This crate provides the foundational pieces the list binding layer is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous push channels
//! - **Scheduler**: Deferred one-shot tasks driven by the UI loop
//! - **Thread Affinity**: Single-writer checks for UI-owned components
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use listbind_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Scheduler Example
//!
//! ```
//! use listbind_core::Scheduler;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new();
//! let id = scheduler.schedule_once(Duration::from_millis(50), || {
//!     println!("deferred work");
//! });
//! assert!(scheduler.is_active(id));
//!
//! // The UI loop drives it:
//! while scheduler.active_count() > 0 {
//!     if let Some(wait) = scheduler.time_until_next() {
//!         std::thread::sleep(wait);
//!     }
//!     scheduler.process_ready();
//! }
//! ```

mod error;
pub mod logging;
mod scheduler;
pub mod signal;
pub mod thread_check;

pub use error::{CoreError, Result, SchedulerError, SignalError};
pub use logging::PerfSpan;
pub use scheduler::{ScheduledTaskId, Scheduler};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
