// Path: crates/telemetry/src/time.rs
use crate::sinks::IdentityMetricsSink;
use std::time::Instant;

/// Reports the lifetime of a replay pass to a metrics sink when dropped.
pub struct Timer<'a> {
    sink: &'a dyn IdentityMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    /// Starts timing now.
    pub fn new(sink: &'a dyn IdentityMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_replay_duration(self.start.elapsed().as_secs_f64());
    }
}
