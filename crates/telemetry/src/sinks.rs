// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured identity metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn identity_metrics() -> &'static dyn IdentityMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_identity(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics related to identity key-history resolution.
pub trait IdentityMetricsSink: Send + Sync + std::fmt::Debug {
    /// Counts entries delivered by the entry source, labeled by fetch kind
    /// (`full`, `incremental` or `first`).
    fn inc_entries_fetched(&self, kind: &'static str, count: u64);
    /// Counts queries answered from the cache without touching the entry source.
    fn inc_cache_hits(&self);
    /// Counts key rotations that passed every gate.
    fn inc_rotations_accepted(&self);
    /// Counts key rotations that were dropped, labeled by the gate that failed.
    fn inc_rotations_rejected(&self, reason: &'static str);
    /// Observes the duration of one replay pass.
    fn observe_replay_duration(&self, duration_secs: f64);
}
impl IdentityMetricsSink for NopSink {
    fn inc_entries_fetched(&self, _kind: &'static str, _count: u64) {}
    fn inc_cache_hits(&self) {}
    fn inc_rotations_accepted(&self) {}
    fn inc_rotations_rejected(&self, _reason: &'static str) {}
    fn observe_replay_duration(&self, _duration_secs: f64) {}
}

/// A sink for tracking errors by their stable code.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, labeled by its kind and code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A composite trait representing a sink that implements all metric categories.
pub trait MetricsSink: IdentityMetricsSink + ErrorMetricsSink {
    /// This sink viewed as an [`IdentityMetricsSink`].
    fn as_identity(&self) -> &dyn IdentityMetricsSink;
    /// This sink viewed as an [`ErrorMetricsSink`].
    fn as_error(&self) -> &dyn ErrorMetricsSink;
}
impl<T> MetricsSink for T
where
    T: IdentityMetricsSink + ErrorMetricsSink,
{
    fn as_identity(&self) -> &dyn IdentityMetricsSink {
        self
    }
    fn as_error(&self) -> &dyn ErrorMetricsSink {
        self
    }
}
