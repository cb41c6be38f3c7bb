use crate::common::{Clock, FrameLease, SystemClock};
use crate::config::Configuration;
use crate::error::{AppError, GeometryError};
use crate::pipeline::context::{FrameContext, FrameMetrics};
use crate::pipeline::detector::TextDetector;
use crate::pipeline::orchestration::outcome::{AbandonReason, FrameOutcome};
use crate::pipeline::orchestration::step::{
    CandidateExtractor, CandidateSelector, CenterBandNormalizer, GeometryNormalizer,
    ResultFormatter, ResultPublisher, ThrottleGate, ThrottleHandle,
};
use crate::pipeline::sink::ResultSink;
use std::sync::Arc;
use tracing::{debug, error, instrument, trace, warn};

/// Runs one frame at a time through gate, geometry, detection, selection and
/// publishing. Owns the throttle cursor and the displayed result.
pub struct FrameAnalyzer {
    gate: ThrottleGate,
    clock: Arc<dyn Clock>,
    normalizer: Box<dyn GeometryNormalizer>,
    extractor: CandidateExtractor,
    selector: CandidateSelector,
    publisher: ResultPublisher,
}

impl FrameAnalyzer {
    pub fn builder(
        detector: Arc<dyn TextDetector>,
        sink: Arc<dyn ResultSink>,
    ) -> FrameAnalyzerBuilder {
        FrameAnalyzerBuilder::new(detector, sink)
    }

    pub fn throttle_handle(&self) -> ThrottleHandle {
        self.gate.handle()
    }

    pub fn displayed(&self) -> Option<&str> {
        self.publisher.displayed()
    }

    /// Processes one frame to a terminal outcome. The lease is released exactly
    /// once on every path; no per-frame failure escapes.
    #[instrument(skip(self, lease), fields(frame_id = %lease.id()))]
    pub async fn analyze(&mut self, lease: FrameLease) -> FrameOutcome {
        let now_ms = self.clock.now_ms();
        let ctx = FrameContext::new(lease, now_ms);

        if ctx.lease().frame().image().is_none() {
            debug!("Frame has no pixel data");
            ctx.abandon();
            return FrameOutcome::Abandoned(AbandonReason::MissingPixels);
        }

        if !self.gate.admit(now_ms) {
            trace!("Frame throttled at {}ms", now_ms);
            ctx.abandon();
            return FrameOutcome::Abandoned(AbandonReason::Throttled);
        }

        let ctx = ctx.into_admitted();
        let normalized = {
            let frame = ctx.lease().frame();
            frame
                .image()
                .ok_or(GeometryError::EmptySource {
                    width: 0,
                    height: 0,
                })
                .and_then(|image| self.normalizer.normalize(image, frame.rotation_degrees()))
        };
        let ctx = match normalized {
            Ok(image) => ctx.into_normalized(image),
            Err(e) => {
                let stage = match e {
                    GeometryError::UnsupportedRotation(_) => "rotate",
                    _ => "crop",
                };
                error!("{} {} failed: {}", self.normalizer.name(), stage, e);
                ctx.abandon();
                return FrameOutcome::Abandoned(AbandonReason::Geometry(e));
            }
        };

        let extracted = self.extractor.extract(ctx.shared_image()).await;
        let ctx = match extracted {
            Ok(candidates) => ctx.into_extracted(candidates),
            Err(e) => {
                warn!("Text recognition failed: {}", e);
                ctx.abandon();
                return FrameOutcome::Abandoned(AbandonReason::Detection(e));
            }
        };

        let selector = self.selector;
        let (winner, metrics) = ctx
            .into_selected(|candidates| selector.select(candidates))
            .finish();
        log_metrics(&metrics);

        let published = match &winner {
            Some(candidate) => self.publisher.publish(candidate.token()),
            None => {
                debug!("No candidate survived selection");
                false
            }
        };

        FrameOutcome::Completed { winner, published }
    }
}

fn log_metrics(metrics: &FrameMetrics) {
    let micros = |d: Option<std::time::Duration>| d.map_or(0, |d| d.as_micros());
    debug!(
        "Frame completed in {}us (normalize {}us, detect {}us, select {}us)",
        micros(metrics.total_duration()),
        micros(metrics.normalize_duration()),
        micros(metrics.detection_duration()),
        micros(metrics.selection_duration()),
    );
}

pub struct FrameAnalyzerBuilder {
    configuration: Configuration,
    detector: Arc<dyn TextDetector>,
    sink: Arc<dyn ResultSink>,
    clock: Arc<dyn Clock>,
    normalizer: Option<Box<dyn GeometryNormalizer>>,
}

impl FrameAnalyzerBuilder {
    pub fn new(detector: Arc<dyn TextDetector>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            configuration: Configuration::default(),
            detector,
            sink,
            clock: Arc::new(SystemClock),
            normalizer: None,
        }
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // Replaces the default center band crop built from the configured ratios.
    pub fn normalizer(mut self, normalizer: Box<dyn GeometryNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn build(self) -> Result<FrameAnalyzer, AppError> {
        let configuration = self.configuration;
        configuration.validate()?;

        let normalizer = self.normalizer.unwrap_or_else(|| {
            Box::new(CenterBandNormalizer::new(
                configuration.roi_width_ratio,
                configuration.roi_height_ratio,
            ))
        });

        Ok(FrameAnalyzer {
            gate: ThrottleGate::new(configuration.throttle_interval_ms),
            clock: self.clock,
            normalizer,
            extractor: CandidateExtractor::new(self.detector, configuration.min_token_len),
            selector: CandidateSelector::new(configuration.min_token_len),
            publisher: ResultPublisher::new(
                ResultFormatter::new(configuration.group_size, configuration.group_separator),
                self.sink,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::clock::testing::ManualClock;
    use crate::common::frame::testing::{solid_image, CountingReleaser};
    use crate::common::Frame;
    use crate::error::DetectionError;
    use crate::pipeline::detector::testing::ScriptedDetector;
    use crate::pipeline::domain::{BoundingBox, RawTextRegion};
    use async_trait::async_trait;
    use image::{DynamicImage, GenericImageView};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Mutex;

    struct Harness {
        analyzer: FrameAnalyzer,
        clock: Arc<ManualClock>,
        releaser: Arc<CountingReleaser>,
        shown: Arc<Mutex<Vec<String>>>,
    }

    impl Harness {
        fn new(detector: Arc<dyn TextDetector>) -> Self {
            let clock = Arc::new(ManualClock::at(10_000));
            let shown = Arc::new(Mutex::new(Vec::new()));
            let sink_shown = shown.clone();
            let analyzer = FrameAnalyzer::builder(
                detector,
                Arc::new(move |formatted: String| sink_shown.lock().unwrap().push(formatted)),
            )
            .clock(clock.clone())
            .build()
            .unwrap();
            Self {
                analyzer,
                clock,
                releaser: Arc::new(CountingReleaser::default()),
                shown,
            }
        }

        fn lease(&self, frame: Frame) -> FrameLease {
            FrameLease::new(frame, self.releaser.clone())
        }

        fn shown(&self) -> Vec<String> {
            self.shown.lock().unwrap().clone()
        }
    }

    // 1280x720 landscape frame, upright crop is 1024x144 centered at (512, 72)
    fn hd_frame() -> Frame {
        Frame::new(solid_image(1280, 720), 0)
    }

    fn near_center(text: &str, offset: i32) -> RawTextRegion {
        RawTextRegion::located(text, BoundingBox::new(502 + offset, 62, 20, 20))
    }

    #[tokio::test]
    async fn publishes_nearest_token_formatted() {
        let detector = ScriptedDetector::returning(vec![
            near_center("98 7654", 300),
            near_center("1234567", 0),
            near_center("55", 0),
        ]);
        let mut harness = Harness::new(Arc::new(detector));

        let lease = harness.lease(hd_frame());
        let id = lease.id();
        let outcome = harness.analyzer.analyze(lease).await;

        assert!(outcome.published());
        assert_eq!(harness.shown(), vec!["123-456-7".to_string()]);
        assert_eq!(harness.analyzer.displayed(), Some("123-456-7"));
        assert_eq!(harness.releaser.count_for(id), 1);
    }

    #[tokio::test]
    async fn throttled_frames_skip_detection() {
        let detector = Arc::new(ScriptedDetector::returning(vec![near_center("123", 0)]));
        let mut harness = Harness::new(detector.clone());

        let first = harness.lease(hd_frame());
        assert!(harness.analyzer.analyze(first).await.is_completed());

        harness.clock.advance(999);
        let second = harness.lease(hd_frame());
        let outcome = harness.analyzer.analyze(second).await;
        assert_eq!(outcome, FrameOutcome::Abandoned(AbandonReason::Throttled));
        assert_eq!(detector.calls(), 1);
        assert_eq!(harness.releaser.count(), 2);

        harness.clock.advance(1);
        let third = harness.lease(hd_frame());
        assert!(harness.analyzer.analyze(third).await.is_completed());
        assert_eq!(detector.calls(), 2);
    }

    #[tokio::test]
    async fn repeated_winner_is_not_republished() {
        let detector = ScriptedDetector::returning(vec![near_center("123456", 0)]);
        let mut harness = Harness::new(Arc::new(detector));

        for _ in 0..3 {
            let lease = harness.lease(hd_frame());
            let outcome = harness.analyzer.analyze(lease).await;
            assert!(outcome.is_completed());
            harness.clock.advance(1000);
        }
        assert_eq!(harness.shown(), vec!["123-456".to_string()]);
    }

    #[tokio::test]
    async fn interval_change_takes_effect_on_next_frame() {
        let detector = ScriptedDetector::returning(vec![near_center("777", 0)]);
        let mut harness = Harness::new(Arc::new(detector));
        let handle = harness.analyzer.throttle_handle();

        let lease = harness.lease(hd_frame());
        harness.analyzer.analyze(lease).await;

        handle.set_interval_ms(500);
        harness.clock.advance(500);
        let lease = harness.lease(hd_frame());
        assert!(harness.analyzer.analyze(lease).await.is_completed());
    }

    #[tokio::test]
    async fn missing_pixels_leave_throttle_untouched() {
        let detector = ScriptedDetector::returning(vec![near_center("321", 0)]);
        let mut harness = Harness::new(Arc::new(detector));

        let lease = harness.lease(Frame::without_pixels(0));
        let outcome = harness.analyzer.analyze(lease).await;
        assert_eq!(outcome, FrameOutcome::Abandoned(AbandonReason::MissingPixels));

        // same instant: still admissible because nothing was recorded
        let lease = harness.lease(hd_frame());
        assert!(harness.analyzer.analyze(lease).await.published());
        assert_eq!(harness.releaser.count(), 2);
    }

    #[tokio::test]
    async fn geometry_failure_abandons_frame_only() {
        let detector = Arc::new(ScriptedDetector::returning(vec![near_center("321", 0)]));
        let mut harness = Harness::new(detector.clone());

        let lease = harness.lease(Frame::new(solid_image(1280, 720), 45));
        let outcome = harness.analyzer.analyze(lease).await;
        assert_eq!(
            outcome,
            FrameOutcome::Abandoned(AbandonReason::Geometry(
                GeometryError::UnsupportedRotation(45)
            ))
        );
        assert_eq!(detector.calls(), 0);
        assert_eq!(harness.releaser.count(), 1);

        harness.clock.advance(1000);
        let lease = harness.lease(hd_frame());
        assert!(harness.analyzer.analyze(lease).await.published());
    }

    #[tokio::test]
    async fn detection_failure_abandons_frame_only() {
        let detector = ScriptedDetector::returning(vec![near_center("654", 0)])
            .then(Err(DetectionError::Engine("timeout".to_string())));
        let mut harness = Harness::new(Arc::new(detector));

        let lease = harness.lease(hd_frame());
        let outcome = harness.analyzer.analyze(lease).await;
        assert!(matches!(
            outcome.abandon_reason(),
            Some(AbandonReason::Detection(_))
        ));
        assert_eq!(harness.releaser.count(), 1);

        harness.clock.advance(1000);
        let lease = harness.lease(hd_frame());
        assert!(harness.analyzer.analyze(lease).await.published());
        assert_eq!(harness.shown(), vec!["654".to_string()]);
    }

    #[tokio::test]
    async fn no_winner_completes_without_sink_update() {
        let detector = ScriptedDetector::returning(vec![
            near_center("ab", 0),
            RawTextRegion::new("123456", None),
        ]);
        let mut harness = Harness::new(Arc::new(detector));

        let lease = harness.lease(hd_frame());
        let outcome = harness.analyzer.analyze(lease).await;
        assert_eq!(
            outcome,
            FrameOutcome::Completed {
                winner: None,
                published: false
            }
        );
        assert!(harness.shown().is_empty());
        assert_eq!(harness.releaser.count(), 1);
    }

    #[tokio::test]
    async fn invalid_configuration_is_rejected() {
        let result = FrameAnalyzer::builder(
            Arc::new(ScriptedDetector::returning(Vec::new())),
            Arc::new(|_formatted: String| {}),
        )
        .configuration(Configuration {
            throttle_interval_ms: 0,
            ..Configuration::default()
        })
        .build();
        assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
    }

    /// Fails on frames whose first pixel is marked red.
    struct PoisonAwareDetector;

    #[async_trait]
    impl TextDetector for PoisonAwareDetector {
        async fn detect(
            &self,
            image: &DynamicImage,
        ) -> Result<Vec<RawTextRegion>, DetectionError> {
            if image.get_pixel(0, 0).0[0] == 255 {
                return Err(DetectionError::Engine("poisoned frame".to_string()));
            }
            Ok(vec![RawTextRegion::located(
                "4242",
                BoundingBox::new(0, 0, 4, 4),
            )])
        }

        fn name(&self) -> &'static str {
            "PoisonAwareDetector"
        }
    }

    #[tokio::test]
    async fn every_frame_is_released_exactly_once_under_random_failures() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut harness = Harness::new(Arc::new(PoisonAwareDetector));
        let mut ids = Vec::with_capacity(1000);
        let mut completed = 0;

        for _ in 0..1000 {
            let frame = match rng.random_range(0..5) {
                0 => Frame::without_pixels(0),
                1 => Frame::new(solid_image(40, 3), 0),
                2 => Frame::new(solid_image(40, 30), 45),
                3 => Frame::new(
                    DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
                        40,
                        30,
                        image::Rgb([255, 0, 0]),
                    )),
                    90,
                ),
                _ => Frame::new(solid_image(40, 30), 0),
            };
            let lease = harness.lease(frame);
            ids.push(lease.id());

            if harness.analyzer.analyze(lease).await.is_completed() {
                completed += 1;
            }
            harness.clock.advance(rng.random_range(0..2000));
        }

        assert_eq!(harness.releaser.count(), 1000);
        for id in ids {
            assert_eq!(harness.releaser.count_for(id), 1);
        }
        assert!(completed > 0);
    }
}
