use crate::common::FrameLease;
use crate::pipeline::context::metrics::FrameMetrics;
use crate::pipeline::context::state::{
    AdmittedState, ExtractedState, NormalizedState, ProcessingState, ReceivedState,
    SelectedState,
};
use crate::pipeline::domain::{Candidate, NormalizedImage};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

// FrameContext with compile-time state tracking. Each transition consumes the
// previous state, so a frame cannot skip a stage or be processed twice.
pub struct FrameContext<S> {
    frame_id: Uuid,
    received_at_ms: u64,
    metrics: FrameMetrics,
    processing_start: Instant,
    stage_start: Instant,
    state: S,
}

impl<S: ProcessingState> FrameContext<S> {
    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }

    pub fn received_at_ms(&self) -> u64 {
        self.received_at_ms
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }

    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }

    /// Ends processing early. A lease still held by the state is released here.
    pub fn abandon(self) -> FrameMetrics {
        let total = self.elapsed();
        let mut metrics = self.metrics;
        metrics.finalize(total);
        metrics
    }

    fn map_state<T>(self, f: impl FnOnce(S) -> T) -> FrameContext<T> {
        FrameContext {
            frame_id: self.frame_id,
            received_at_ms: self.received_at_ms,
            metrics: self.metrics,
            processing_start: self.processing_start,
            stage_start: Instant::now(),
            state: f(self.state),
        }
    }

    fn stage_elapsed(&self) -> Duration {
        self.stage_start.elapsed()
    }
}

impl FrameContext<ReceivedState> {
    pub fn new(lease: FrameLease, received_at_ms: u64) -> Self {
        let now = Instant::now();
        Self {
            frame_id: lease.id(),
            received_at_ms,
            metrics: FrameMetrics::new(),
            processing_start: now,
            stage_start: now,
            state: ReceivedState { lease },
        }
    }

    pub fn lease(&self) -> &FrameLease {
        &self.state.lease
    }

    pub fn into_admitted(self) -> FrameContext<AdmittedState> {
        self.map_state(|state| AdmittedState { lease: state.lease })
    }
}

impl FrameContext<AdmittedState> {
    pub fn lease(&self) -> &FrameLease {
        &self.state.lease
    }

    pub fn into_normalized(mut self, image: NormalizedImage) -> FrameContext<NormalizedState> {
        let duration = self.stage_elapsed();
        self.metrics.record_normalize_duration(duration);
        self.map_state(|state| NormalizedState {
            lease: state.lease,
            image: Arc::new(image),
        })
    }
}

impl FrameContext<NormalizedState> {
    pub fn normalized_image(&self) -> &NormalizedImage {
        &self.state.image
    }

    pub fn shared_image(&self) -> Arc<NormalizedImage> {
        Arc::clone(&self.state.image)
    }

    /// Records the extraction result and hands the frame back to the capture layer.
    pub fn into_extracted(mut self, candidates: Vec<Candidate>) -> FrameContext<ExtractedState> {
        let duration = self.stage_elapsed();
        self.metrics.record_detection_duration(duration);
        self.map_state(|state| {
            state.lease.release();
            ExtractedState { candidates }
        })
    }
}

impl FrameContext<ExtractedState> {
    pub fn candidates(&self) -> &[Candidate] {
        &self.state.candidates
    }

    pub fn into_selected(
        self,
        select: impl FnOnce(Vec<Candidate>) -> Option<Candidate>,
    ) -> FrameContext<SelectedState> {
        let started = Instant::now();
        let mut selected = self.map_state(|state| SelectedState {
            winner: select(state.candidates),
        });
        selected.metrics.record_selection_duration(started.elapsed());
        selected
    }
}

impl FrameContext<SelectedState> {
    pub fn winner(&self) -> Option<&Candidate> {
        self.state.winner.as_ref()
    }

    pub fn finish(self) -> (Option<Candidate>, FrameMetrics) {
        let total = self.elapsed();
        let mut metrics = self.metrics;
        metrics.finalize(total);
        (self.state.winner, metrics)
    }
}
