use crate::error::{DetectionError, GeometryError};
use crate::pipeline::domain::Candidate;

/// Why a frame stopped before completion.
#[derive(Debug, Clone, PartialEq)]
pub enum AbandonReason {
    /// Arrived before the throttle interval elapsed. Expected, not an error.
    Throttled,
    /// The capture layer delivered no pixel data.
    MissingPixels,
    Geometry(GeometryError),
    Detection(DetectionError),
}

/// Terminal state of one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Selection ran. `winner` may be absent; `published` tells whether the sink was updated.
    Completed {
        winner: Option<Candidate>,
        published: bool,
    },
    Abandoned(AbandonReason),
}

impl FrameOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FrameOutcome::Completed { .. })
    }

    pub fn published(&self) -> bool {
        matches!(self, FrameOutcome::Completed { published: true, .. })
    }

    pub fn abandon_reason(&self) -> Option<&AbandonReason> {
        match self {
            FrameOutcome::Abandoned(reason) => Some(reason),
            FrameOutcome::Completed { .. } => None,
        }
    }
}
