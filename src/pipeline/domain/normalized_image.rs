use super::region::RegionOfInterest;
use crate::common::Rotation;
use image::DynamicImage;

/// Upright, cropped pixels handed to the text detector.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    image: DynamicImage,
    region: RegionOfInterest,
    rotation: Rotation,
}

impl NormalizedImage {
    pub fn new(image: DynamicImage, region: RegionOfInterest, rotation: Rotation) -> Self {
        Self {
            image,
            region,
            rotation,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Where the crop sits inside the rotated frame.
    pub fn region(&self) -> RegionOfInterest {
        self.region
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }
}
