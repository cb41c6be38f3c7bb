use crate::common::Rotation;
use crate::error::GeometryError;
use crate::pipeline::domain::{NormalizedImage, RegionOfInterest};
use image::DynamicImage;

/// Turns a raw frame into the upright region of interest the detector sees.
pub trait GeometryNormalizer: Send + Sync {
    fn normalize(
        &self,
        image: &DynamicImage,
        rotation_degrees: u32,
    ) -> Result<NormalizedImage, GeometryError>;

    fn name(&self) -> &'static str;
}

/// Rotates upright, then crops a centered band sized as a fraction of the rotated frame.
#[derive(Debug, Clone, Copy)]
pub struct CenterBandNormalizer {
    width_ratio: f32,
    height_ratio: f32,
}

impl CenterBandNormalizer {
    pub fn new(width_ratio: f32, height_ratio: f32) -> Self {
        Self {
            width_ratio,
            height_ratio,
        }
    }
}

impl Default for CenterBandNormalizer {
    fn default() -> Self {
        Self::new(0.8, 0.2)
    }
}

impl GeometryNormalizer for CenterBandNormalizer {
    fn normalize(
        &self,
        image: &DynamicImage,
        rotation_degrees: u32,
    ) -> Result<NormalizedImage, GeometryError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptySource { width, height });
        }

        let rotation = Rotation::try_from(rotation_degrees)?;
        let (rotated_width, rotated_height) = rotation.rotated_dimensions(width, height);
        let region = RegionOfInterest::centered(
            rotated_width,
            rotated_height,
            self.width_ratio,
            self.height_ratio,
        );
        if region.is_empty() {
            return Err(GeometryError::EmptyRegion {
                width: region.width,
                height: region.height,
                frame_width: rotated_width,
                frame_height: rotated_height,
            });
        }

        let rotated = rotation.apply(image);
        let cropped = rotated.crop_imm(region.x, region.y, region.width, region.height);
        Ok(NormalizedImage::new(cropped, region, rotation))
    }

    fn name(&self) -> &'static str {
        "CenterBandNormalizer"
    }
}
