use std::sync::Mutex;

/// Counters describing one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionMetrics {
    pub rows: usize,
    pub agents: usize,
    pub frames: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<ConversionMetrics>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ConversionMetrics::default()),
        }
    }

    pub fn record_rows(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rows += count;
        }
    }

    pub fn record_agents(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.agents += count;
        }
    }

    pub fn record_frames(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames += count;
        }
    }

    pub fn snapshot(&self) -> ConversionMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_accumulates_counts() {
        let recorder = MetricsRecorder::new();
        recorder.record_rows(10);
        recorder.record_rows(5);
        recorder.record_agents(2);
        recorder.record_frames(8);
        assert_eq!(
            recorder.snapshot(),
            ConversionMetrics {
                rows: 15,
                agents: 2,
                frames: 8,
            }
        );
    }
}
