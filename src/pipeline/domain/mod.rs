pub mod candidate;
pub mod normalized_image;
pub mod region;

pub use candidate::{clean_token, Candidate, RawTextRegion};
pub use normalized_image::NormalizedImage;
pub use region::{BoundingBox, RegionOfInterest};
