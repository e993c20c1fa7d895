use std::sync::Mutex;

/// Counters kept by the sweep assembler.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

/// Point-in-time copy of the decoder counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub packets_decoded: usize,
    pub packets_dropped: usize,
    pub points_filtered: usize,
    pub sweeps_emitted: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_decoded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.packets_decoded += 1;
        }
    }

    pub fn record_dropped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.packets_dropped += 1;
        }
    }

    pub fn record_filtered(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.points_filtered += count;
        }
    }

    pub fn record_sweep(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.sweeps_emitted += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
