use crate::error::DetectionError;
use crate::pipeline::domain::RawTextRegion;
use async_trait::async_trait;
use image::DynamicImage;

/// Text detection engine: image in, located text regions out.
///
/// Bounding boxes are expressed in the coordinates of the image passed in.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect(&self, image: &DynamicImage) -> Result<Vec<RawTextRegion>, DetectionError>;

    fn name(&self) -> &'static str;
}
