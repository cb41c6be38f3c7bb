//! Frame admission and candidate selection for a live text scanner.
//!
//! Frames from a capture layer pass a throttle gate, are rotated upright and
//! cropped to a central band, run through an injected [`TextDetector`], and the
//! token nearest the band center is formatted for display.

pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use common::{Clock, Frame, FrameLease, FrameReleaser, Rotation, SystemClock};
pub use config::Configuration;
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use error::{AppError, DetectionError, GeometryError};
pub use pipeline::{
    AbandonReason, BoundingBox, Candidate, ChannelSink, FrameAnalyzer, FrameOutcome,
    RawTextRegion, ResultSink, TextDetector, ThrottleHandle,
};
