//! Per-frame states and outcomes.

use crate::decode::DecodeError;
use crate::extraction::ExtractError;
use crate::report::DecodeEvent;

/// Stages a frame passes through inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// Handed over by the camera.
    Received,
    /// Format and plane count accepted.
    Validated,
    /// Luma plane copied out.
    Extracted,
    /// Luma plane turned upright.
    Rotated,
    /// Inside the decoder.
    Decoding,
    /// A barcode was found and reported.
    Decoded,
    /// The decoder found nothing.
    NotRecognized,
    /// The decoder failed.
    Failed,
    /// Returned to the camera.
    Released,
}

/// How processing of one frame ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was not processable this cycle.
    Skipped(ExtractError),
    /// A barcode was decoded and reported.
    Decoded(DecodeEvent),
    /// The decoder found no barcode.
    NotRecognized,
    /// The decoder failed on this frame.
    Failed(DecodeError),
}

impl FrameOutcome {
    /// Terminal state reached before release.
    pub fn terminal_state(&self) -> FrameState {
        match self {
            FrameOutcome::Skipped(e) if e.is_unsupported() => FrameState::Received,
            FrameOutcome::Skipped(_) => FrameState::Validated,
            FrameOutcome::Decoded(_) => FrameState::Decoded,
            FrameOutcome::NotRecognized => FrameState::NotRecognized,
            FrameOutcome::Failed(_) => FrameState::Failed,
        }
    }

    /// The decode event, if any.
    pub fn event(&self) -> Option<&DecodeEvent> {
        match self {
            FrameOutcome::Decoded(event) => Some(event),
            _ => None,
        }
    }
}
