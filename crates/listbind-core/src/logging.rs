//! `tracing` targets and timing spans.
//!
//! Libraries in this workspace only emit events; the application decides
//! where they go:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("listbind=debug,listbind_core=info")
//!         .init();
//! }
//! ```
//!
//! Every log line carries one of the [`targets`] below, so subsystems can be
//! filtered individually.

use std::time::Instant;

/// `tracing` targets, one per subsystem.
///
/// `RUST_LOG=listbind::diff=trace` shows every edit script as it is
/// computed; `listbind_core=debug` covers signals and the scheduler.
pub mod targets {
    pub const CORE: &str = "listbind_core";
    /// Connections and disconnections.
    pub const SIGNAL: &str = "listbind_core::signal";
    /// Scheduling, cancellation and firing of deferred tasks.
    pub const SCHEDULER: &str = "listbind_core::scheduler";
    /// Edit scripts and their size accounting.
    pub const DIFF: &str = "listbind::diff";
    /// Snapshot publication.
    pub const SOURCE: &str = "listbind::source";
    /// Host attachment, row lifecycle and row event failures.
    pub const ADAPTER: &str = "listbind::adapter";
    /// Timings from [`PerfSpan`].
    pub const PERF: &str = "listbind::perf";
}

/// Times an operation such as a diff pass.
///
/// Log lines emitted while the guard lives are nested under a `perf` span;
/// dropping it reports the elapsed microseconds under [`targets::PERF`].
#[derive(Debug)]
pub struct PerfSpan {
    name: &'static str,
    started: Instant,
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "listbind::perf", "perf", operation = name);
        Self {
            name,
            started: Instant::now(),
            _entered: span.entered(),
        }
    }

    /// Name of the measured operation.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::debug!(
            target: "listbind::perf",
            operation = self.name,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "operation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_keeps_operation_name() {
        let span = PerfSpan::new("calculate_diff");
        assert_eq!(span.name(), "calculate_diff");
    }

    #[test]
    fn test_targets_are_nested() {
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::SCHEDULER.starts_with(targets::CORE));
        assert!(targets::DIFF.starts_with("listbind::"));
    }

    #[test]
    fn test_perf_span_under_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter("listbind::perf=debug")
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let span = PerfSpan::new("dispatch_updates");
            assert_eq!(span.name(), "dispatch_updates");
        });
    }
}
