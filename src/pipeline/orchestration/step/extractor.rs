use crate::error::DetectionError;
use crate::pipeline::detector::TextDetector;
use crate::pipeline::domain::{clean_token, Candidate, NormalizedImage, RawTextRegion};
use crate::pipeline::orchestration::service::DetectionService;
use std::sync::Arc;
use tower::ServiceExt;
use tracing::trace;

/// Runs detection on a normalized image and scores what comes back.
#[derive(Clone)]
pub struct CandidateExtractor {
    service: DetectionService,
    min_token_len: usize,
}

impl CandidateExtractor {
    pub fn new(detector: Arc<dyn TextDetector>, min_token_len: usize) -> Self {
        Self {
            service: DetectionService::new(detector),
            min_token_len,
        }
    }

    pub async fn extract(
        &self,
        image: Arc<NormalizedImage>,
    ) -> Result<Vec<Candidate>, DetectionError> {
        let center = image.center();
        let regions = self.service.clone().oneshot(image).await?;
        trace!(
            "{} returned {} regions",
            self.service.detector_name(),
            regions.len()
        );
        Ok(self.score(center, regions))
    }

    /// Drops unlocated or too-short regions and scores the rest by squared
    /// distance to `center`. Detection order is preserved.
    pub fn score(&self, center: (f32, f32), regions: Vec<RawTextRegion>) -> Vec<Candidate> {
        regions
            .into_iter()
            .filter_map(|region| {
                let bbox = region.bbox?;
                let token = clean_token(&region.text);
                if token.len() < self.min_token_len {
                    return None;
                }
                let (bx, by) = bbox.center();
                let dx = center.0 - bx;
                let dy = center.1 - by;
                Some(Candidate::new(token, dx * dx + dy * dy))
            })
            .collect()
    }
}
