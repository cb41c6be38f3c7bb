use crate::common::FrameLease;
use crate::pipeline::domain::{Candidate, NormalizedImage};
use std::sync::Arc;

// Markers to track the state of the frame processing pipeline.
// States up to `NormalizedState` still own the frame lease; extraction releases it.
pub struct ReceivedState {
    pub(super) lease: FrameLease,
}

pub struct AdmittedState {
    pub(super) lease: FrameLease,
}

pub struct NormalizedState {
    pub(super) lease: FrameLease,
    pub(super) image: Arc<NormalizedImage>,
}

pub struct ExtractedState {
    pub(super) candidates: Vec<Candidate>,
}

pub struct SelectedState {
    pub(super) winner: Option<Candidate>,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for ReceivedState {
    fn state_name() -> &'static str {
        "Received"
    }
}

impl ProcessingState for AdmittedState {
    fn state_name() -> &'static str {
        "Admitted"
    }
}

impl ProcessingState for NormalizedState {
    fn state_name() -> &'static str {
        "Normalized"
    }
}

impl ProcessingState for ExtractedState {
    fn state_name() -> &'static str {
        "Extracted"
    }
}

impl ProcessingState for SelectedState {
    fn state_name() -> &'static str {
        "Selected"
    }
}
