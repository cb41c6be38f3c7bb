use crate::error::DetectionError;
use crate::pipeline::detector::TextDetector;
use crate::pipeline::domain::{NormalizedImage, RawTextRegion};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// Adapts a [`TextDetector`] into a tower service over normalized images.
#[derive(Clone)]
pub struct DetectionService {
    inner: Arc<dyn TextDetector>,
}

impl DetectionService {
    pub fn new(inner: Arc<dyn TextDetector>) -> Self {
        Self { inner }
    }

    pub fn detector_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Service<Arc<NormalizedImage>> for DetectionService {
    type Response = Vec<RawTextRegion>;
    type Error = DetectionError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Arc<NormalizedImage>) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move { inner.detect(req.image()).await })
    }
}
