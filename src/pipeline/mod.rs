pub mod context;
pub mod detector;
pub mod domain;
pub mod orchestration;
pub mod sink;

pub use detector::TextDetector;
pub use domain::{BoundingBox, Candidate, NormalizedImage, RawTextRegion, RegionOfInterest};
pub use orchestration::{AbandonReason, FrameAnalyzer, FrameOutcome, ThrottleHandle};
pub use sink::{ChannelSink, ResultSink};
