use crate::error::GeometryError;
use image::DynamicImage;
use std::borrow::Cow;

/// Clockwise rotation needed to bring a frame upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Dimensions of a `width`x`height` image once rotated.
    pub fn rotated_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Rotation::Deg0 | Rotation::Deg180 => (width, height),
            Rotation::Deg90 | Rotation::Deg270 => (height, width),
        }
    }

    /// Upright view of `image`. No rotation borrows the source as is.
    pub fn apply<'a>(&self, image: &'a DynamicImage) -> Cow<'a, DynamicImage> {
        match self {
            Rotation::Deg0 => Cow::Borrowed(image),
            Rotation::Deg90 => Cow::Owned(image.rotate90()),
            Rotation::Deg180 => Cow::Owned(image.rotate180()),
            Rotation::Deg270 => Cow::Owned(image.rotate270()),
        }
    }
}

impl TryFrom<u32> for Rotation {
    type Error = GeometryError;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(GeometryError::UnsupportedRotation(other)),
        }
    }
}
