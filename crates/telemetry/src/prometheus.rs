// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    Encoder, Histogram, IntCounter, IntCounterVec, TextEncoder,
};

// --- Metric Statics ---
// Collectors are registered with the default registry exactly once by `install`.

static ENTRIES_FETCHED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static CACHE_HITS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ROTATIONS_ACCEPTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ROTATIONS_REJECTED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static REPLAY_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// Reports to the process-wide Prometheus registry.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;

/// Runs `$body` with the collector bound to `$m`. Metrics recorded before
/// `install()` are dropped.
macro_rules! with_metric {
    ($metric:ident, $m:ident => $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl IdentityMetricsSink for PrometheusSink {
    fn inc_entries_fetched(&self, kind: &'static str, count: u64) {
        with_metric!(ENTRIES_FETCHED_TOTAL, m => m.with_label_values(&[kind]).inc_by(count));
    }
    fn inc_cache_hits(&self) {
        with_metric!(CACHE_HITS_TOTAL, m => m.inc());
    }
    fn inc_rotations_accepted(&self) {
        with_metric!(ROTATIONS_ACCEPTED_TOTAL, m => m.inc());
    }
    fn inc_rotations_rejected(&self, reason: &'static str) {
        with_metric!(ROTATIONS_REJECTED_TOTAL, m => m.with_label_values(&[reason]).inc());
    }
    fn observe_replay_duration(&self, duration_secs: f64) {
        with_metric!(REPLAY_DURATION_SECONDS, m => m.observe(duration_secs));
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        with_metric!(ERRORS_TOTAL, m => m.with_label_values(&[kind, code]).inc());
    }
}

fn already_installed<T>(_: T) -> prometheus::Error {
    prometheus::Error::AlreadyReg
}

/// Registers every collector and makes [`PrometheusSink`] the global sink.
///
/// Fails with `AlreadyReg` when called twice.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    ENTRIES_FETCHED_TOTAL
        .set(register_int_counter_vec!(
            "idkeys_entries_fetched_total",
            "Total entries delivered by the entry source.",
            &["kind"]
        )?)
        .map_err(already_installed)?;
    CACHE_HITS_TOTAL
        .set(register_int_counter!(
            "idkeys_cache_hits_total",
            "Queries answered from the height-indexed cache without a fetch."
        )?)
        .map_err(already_installed)?;
    ROTATIONS_ACCEPTED_TOTAL
        .set(register_int_counter!(
            "idkeys_rotations_accepted_total",
            "Key rotations that passed every gate."
        )?)
        .map_err(already_installed)?;
    ROTATIONS_REJECTED_TOTAL
        .set(register_int_counter_vec!(
            "idkeys_rotations_rejected_total",
            "Key rotations dropped, by failing gate.",
            &["reason"]
        )?)
        .map_err(already_installed)?;
    REPLAY_DURATION_SECONDS
        .set(register_histogram!(
            "idkeys_replay_duration_seconds",
            "Latency of a single replay pass over fetched entries.",
            exponential_buckets(0.0005, 2.0, 15)?
        )?)
        .map_err(already_installed)?;
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "idkeys_errors_total",
            "Total number of errors, categorized by kind and code.",
            &["kind", "code"]
        )?)
        .map_err(already_installed)?;

    SINK.set(&PROMETHEUS_SINK).map_err(already_installed)?;
    Ok(&PROMETHEUS_SINK)
}

/// Renders the default registry in the Prometheus text exposition format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_then_render() {
        let sink = install().unwrap();
        sink.inc_entries_fetched("full", 3);
        sink.inc_rotations_rejected("signer_not_active");
        sink.inc_error("identity", "IDENTITY_UNKNOWN");
        identity_metrics().inc_cache_hits();

        let text = gather_text().unwrap();
        assert!(text.contains("idkeys_entries_fetched_total{kind=\"full\"} 3"));
        assert!(text.contains("idkeys_rotations_rejected_total{reason=\"signer_not_active\"} 1"));
        assert!(text.contains("idkeys_cache_hits_total 1"));

        assert!(matches!(install(), Err(prometheus::Error::AlreadyReg)));
    }
}
