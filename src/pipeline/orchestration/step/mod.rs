pub mod extractor;
pub mod formatter;
pub mod geometry;
pub mod selector;
pub mod throttle;

pub use extractor::CandidateExtractor;
pub use formatter::{ResultFormatter, ResultPublisher};
pub use geometry::{CenterBandNormalizer, GeometryNormalizer};
pub use selector::CandidateSelector;
pub use throttle::{ThrottleGate, ThrottleHandle};
