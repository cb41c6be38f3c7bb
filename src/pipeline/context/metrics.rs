use std::time::Duration;

/// Metrics collected during frame processing
#[derive(Debug, Clone, Default)]
pub struct FrameMetrics {
    normalize_duration: Option<Duration>,
    detection_duration: Option<Duration>,
    selection_duration: Option<Duration>,
    total_duration: Option<Duration>,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_normalize_duration(&mut self, duration: Duration) {
        self.normalize_duration = Some(duration);
    }

    pub fn record_detection_duration(&mut self, duration: Duration) {
        self.detection_duration = Some(duration);
    }

    pub fn record_selection_duration(&mut self, duration: Duration) {
        self.selection_duration = Some(duration);
    }

    pub fn finalize(&mut self, total: Duration) {
        self.total_duration = Some(total);
    }

    pub fn normalize_duration(&self) -> Option<Duration> {
        self.normalize_duration
    }

    pub fn detection_duration(&self) -> Option<Duration> {
        self.detection_duration
    }

    pub fn selection_duration(&self) -> Option<Duration> {
        self.selection_duration
    }

    pub fn total_duration(&self) -> Option<Duration> {
        self.total_duration
    }
}
