//! Running counters of frame outcomes.

use super::FrameOutcome;
use crate::orientation::RotationAngle;

/// Frame outcome counters since the pipeline was created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames handed to the pipeline.
    pub frames_received: u64,
    /// Frames skipped before rotation (unsupported or malformed).
    pub frames_skipped: u64,
    /// Subset of skipped frames that were malformed rather than unsupported.
    pub frames_malformed: u64,
    /// Frames that produced a decode event.
    pub frames_decoded: u64,
    /// Frames where the decoder found nothing.
    pub frames_not_recognized: u64,
    /// Frames where the decoder failed.
    pub frames_failed: u64,
    /// Frames the camera refused to take back.
    pub release_failures: u64,
    /// Rotation applied to the most recent frame.
    pub last_rotation: Option<RotationAngle>,
}

impl PipelineStats {
    /// Records a finished frame.
    pub fn record(&mut self, outcome: &FrameOutcome, rotation: RotationAngle) {
        self.frames_received += 1;
        self.last_rotation = Some(rotation);
        match outcome {
            FrameOutcome::Skipped(e) => {
                self.frames_skipped += 1;
                if !e.is_unsupported() {
                    self.frames_malformed += 1;
                }
            }
            FrameOutcome::Decoded(_) => self.frames_decoded += 1,
            FrameOutcome::NotRecognized => self.frames_not_recognized += 1,
            FrameOutcome::Failed(_) => self.frames_failed += 1,
        }
    }

    /// Frames that reached the decoder.
    pub fn frames_decode_attempted(&self) -> u64 {
        self.frames_decoded + self.frames_not_recognized + self.frames_failed
    }
}
