use crate::{
    common::{Clock, FrameLease, SystemClock},
    config::Configuration,
    error::AppError,
    pipeline::{
        detector::TextDetector,
        orchestration::{FrameAnalyzer, GeometryNormalizer, ThrottleHandle},
        sink::ResultSink,
    },
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

#[derive(Default)]
struct SlotState {
    pending: Option<FrameLease>,
    closed: bool,
}

/// Holds at most one pending frame. A newer frame replaces the pending one.
/// Once closed, offered frames are handed straight back.
#[derive(Default)]
struct FrameSlot {
    state: Mutex<SlotState>,
    notify: Notify,
}

impl FrameSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the replaced frame, or `Err` with the offered one if closed.
    fn offer(&self, lease: FrameLease) -> Result<Option<FrameLease>, FrameLease> {
        let stale = {
            let mut state = self.lock();
            if state.closed {
                return Err(lease);
            }
            state.pending.replace(lease)
        };
        self.notify.notify_one();
        Ok(stale)
    }

    fn take(&self) -> Option<FrameLease> {
        self.lock().pending.take()
    }

    fn close(&self) -> Option<FrameLease> {
        let mut state = self.lock();
        state.closed = true;
        state.pending.take()
    }
}

/// Embeds the frame pipeline in a host application.
///
/// Frames go in through [`Coordinator::on_frame`]; a single worker task analyzes
/// them one at a time and publishes to the configured sink.
pub struct Coordinator {
    slot: Arc<FrameSlot>,
    throttle: ThrottleHandle,
    worker_task: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Coordinator {
    fn new(analyzer: FrameAnalyzer) -> Self {
        let cancel_token = CancellationToken::new();
        let slot = Arc::new(FrameSlot::default());
        let throttle = analyzer.throttle_handle();

        Self {
            worker_task: Self::start_worker_task(analyzer, slot.clone(), cancel_token.clone()),
            slot,
            throttle,
            cancel_token,
        }
    }

    fn start_worker_task(
        mut analyzer: FrameAnalyzer,
        slot: Arc<FrameSlot>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Frame worker started");
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = slot.notify.notified() => {
                        while let Some(lease) = slot.take() {
                            let outcome = analyzer.analyze(lease).await;
                            trace!("Frame outcome: {:?}", outcome);
                            if cancel_token.is_cancelled() {
                                break;
                            }
                        }
                    }
                }
            }
            info!("Frame worker stopped");
        })
    }

    /// Hands a frame to the worker without waiting for it to be processed.
    pub fn on_frame(&self, lease: FrameLease) {
        match self.slot.offer(lease) {
            Ok(Some(stale)) => trace!("Dropping frame {} in favor of a newer one", stale.id()),
            Ok(None) => {}
            Err(rejected) => debug!("Coordinator stopped, releasing frame {}", rejected.id()),
        }
    }

    /// Seconds-based interval control, as exposed to a settings surface.
    pub fn set_throttle_interval(&self, seconds: u64) -> bool {
        self.throttle.set_interval_secs(seconds)
    }

    pub fn throttle_handle(&self) -> ThrottleHandle {
        self.throttle.clone()
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
        self.worker_task.abort();
        if let Some(pending) = self.slot.close() {
            debug!("Releasing pending frame {} on stop", pending.id());
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    detector: Option<Arc<dyn TextDetector>>,
    sink: Option<Arc<dyn ResultSink>>,
    clock: Arc<dyn Clock>,
    normalizer: Option<Box<dyn GeometryNormalizer>>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            detector: None,
            sink: None,
            clock: Arc::new(SystemClock),
            normalizer: None,
        }
    }

    // Sets the initial throttle interval, this will override the configuration.
    pub fn throttle_interval_ms(mut self, throttle_interval_ms: u64) -> Self {
        self.configuration.throttle_interval_ms = throttle_interval_ms;
        self
    }

    // Sets the region of interest ratios, this will override the configuration.
    pub fn roi_ratios(mut self, width_ratio: f32, height_ratio: f32) -> Self {
        self.configuration.roi_width_ratio = width_ratio;
        self.configuration.roi_height_ratio = height_ratio;
        self
    }

    // Adjusts the minimum cleaned token length, this will override the configuration.
    pub fn min_token_len(mut self, min_token_len: usize) -> Self {
        self.configuration.min_token_len = min_token_len;
        self
    }

    pub fn detector(mut self, detector: Arc<dyn TextDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn normalizer(mut self, normalizer: Box<dyn GeometryNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Spawns the worker, so this must run inside a tokio runtime.
    pub fn build(self) -> Result<Coordinator, AppError> {
        let detector = self
            .detector
            .ok_or(AppError::Pipeline("Text detector not set".to_string()))?;
        let sink = self
            .sink
            .ok_or(AppError::Pipeline("Result sink not set".to_string()))?;

        let mut builder = FrameAnalyzer::builder(detector, sink)
            .configuration(self.configuration)
            .clock(self.clock);
        if let Some(normalizer) = self.normalizer {
            builder = builder.normalizer(normalizer);
        }
        Ok(Coordinator::new(builder.build()?))
    }
}
