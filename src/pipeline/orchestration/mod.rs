pub mod frame_analyzer;
pub mod outcome;
pub mod service;
pub mod step;

pub use frame_analyzer::{FrameAnalyzer, FrameAnalyzerBuilder};
pub use outcome::{AbandonReason, FrameOutcome};
pub use service::DetectionService;
pub use step::{
    CandidateExtractor, CandidateSelector, CenterBandNormalizer, GeometryNormalizer,
    ResultFormatter, ResultPublisher, ThrottleGate, ThrottleHandle,
};
