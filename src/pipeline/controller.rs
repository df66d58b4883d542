//! Per-frame orchestration.

use super::{FrameGuard, FrameOutcome, FrameState, PipelineStats};
use crate::capture::Frame;
use crate::decode::{DecodeOutcome, Decoder, LuminanceSource};
use crate::extraction::PlaneExtractor;
use crate::orientation::{OrientationTracker, RotationAngle};
use crate::report::DecodeReporter;
use crate::rotation::rotate;
use std::sync::Arc;

/// Drives frames from the camera through extraction, rotation and
/// decoding, and hands every frame back to the camera exactly once.
///
/// One frame is processed to completion per [`FramePipeline::process`]
/// call; the caller's delivery thread does all the work.
pub struct FramePipeline<D: Decoder> {
    tracker: Arc<OrientationTracker>,
    extractor: PlaneExtractor,
    decoder: D,
    reporter: DecodeReporter,
    stats: PipelineStats,
    state: FrameState,
}

impl<D: Decoder> FramePipeline<D> {
    /// Creates a pipeline reading rotation from `tracker`, decoding with
    /// `decoder` and publishing results through `reporter`.
    pub fn new(tracker: Arc<OrientationTracker>, decoder: D, reporter: DecodeReporter) -> Self {
        Self {
            tracker,
            extractor: PlaneExtractor::new(),
            decoder,
            reporter,
            stats: PipelineStats::default(),
            state: FrameState::Released,
        }
    }

    /// Processes one frame and releases it.
    ///
    /// The rotation is sampled once on entry, so an orientation change
    /// mid-frame only affects the next frame.
    pub fn process<F: Frame>(&mut self, frame: F) -> FrameOutcome {
        let rotation = self.tracker.current();
        let sequence = frame.sequence();
        let span = tracing::debug_span!("frame", sequence, rotation = rotation.degrees());
        let _enter = span.enter();

        let guard = FrameGuard::new(frame);
        self.enter(FrameState::Received);

        let outcome = self.run(&*guard, rotation);

        if let Err(e) = guard.release() {
            self.stats.release_failures += 1;
            tracing::error!(sequence, error = %e, "Frame release contract violated");
            debug_assert!(false, "frame release contract violated: {e}");
        }
        self.enter(FrameState::Released);

        self.stats.record(&outcome, rotation);
        tracing::debug!(state = ?outcome.terminal_state(), "Frame done");
        outcome
    }

    fn run<F: Frame>(&mut self, frame: &F, rotation: RotationAngle) -> FrameOutcome {
        if let Err(e) = self.extractor.validate(frame) {
            tracing::trace!(reason = %e, "Skipping frame");
            return FrameOutcome::Skipped(e);
        }
        self.enter(FrameState::Validated);

        let luma = match self.extractor.copy_luma(frame) {
            Ok(luma) => luma,
            Err(e) => {
                tracing::warn!(reason = %e, "Skipping malformed frame");
                return FrameOutcome::Skipped(e);
            }
        };
        self.enter(FrameState::Extracted);

        let rotated = rotate(luma, rotation);
        self.enter(FrameState::Rotated);

        self.enter(FrameState::Decoding);
        let outcome = self.decoder.decode(&LuminanceSource::full(&rotated));

        match outcome {
            DecodeOutcome::Success(decoded) => {
                self.enter(FrameState::Decoded);
                let event = self.reporter.report(decoded, rotation, frame.sequence());
                FrameOutcome::Decoded(event)
            }
            DecodeOutcome::NotFound => {
                self.enter(FrameState::NotRecognized);
                FrameOutcome::NotRecognized
            }
            DecodeOutcome::Error(e) => {
                self.enter(FrameState::Failed);
                tracing::warn!(
                    error = %e,
                    width = rotated.width(),
                    height = rotated.height(),
                    "Decoder failed"
                );
                FrameOutcome::Failed(e)
            }
        }
    }

    #[inline]
    fn enter(&mut self, state: FrameState) {
        tracing::trace!(from = ?self.state, to = ?state, "Frame state");
        self.state = state;
    }

    /// State of the most recent frame; `Released` between frames.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Outcome counters.
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// The injected decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The orientation tracker this pipeline samples.
    pub fn tracker(&self) -> &Arc<OrientationTracker> {
        &self.tracker
    }
}
