//! Exactly-once frame release.

use crate::capture::{Frame, ReleaseError};
use std::ops::Deref;

/// Owns a frame for the duration of its processing.
///
/// The frame goes back to the camera through [`FrameGuard::release`].
/// If the guard is dropped without that call (a panicking decoder, for
/// instance) the frame is released on drop instead.
pub struct FrameGuard<F: Frame> {
    frame: Option<F>,
}

impl<F: Frame> FrameGuard<F> {
    /// Takes ownership of `frame` until released.
    pub fn new(frame: F) -> Self {
        Self { frame: Some(frame) }
    }

    /// Hands the frame back to the camera.
    pub fn release(mut self) -> Result<(), ReleaseError> {
        match self.frame.take() {
            Some(frame) => frame.release(),
            None => Ok(()),
        }
    }
}

impl<F: Frame> Deref for FrameGuard<F> {
    type Target = F;

    fn deref(&self) -> &F {
        // Only `release` takes the frame, and it consumes the guard
        self.frame
            .as_ref()
            .unwrap_or_else(|| unreachable!("frame guard accessed after release"))
    }
}

impl<F: Frame> Drop for FrameGuard<F> {
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            let sequence = frame.sequence();
            tracing::warn!(sequence, "Frame released on unwind");
            if let Err(e) = frame.release() {
                tracing::error!(sequence, error = %e, "Frame release contract violated");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{MockFrame, PixelFormat, ReleaseLedger};

    fn frame(ledger: &ReleaseLedger, sequence: u64) -> MockFrame {
        MockFrame::from_planes(
            PixelFormat::Yuv420,
            1,
            1,
            vec![(vec![0], 1), (vec![0], 1), (vec![0], 1)],
            sequence,
            ledger,
        )
    }

    #[test]
    fn test_explicit_release() {
        let ledger = ReleaseLedger::new();
        let guard = FrameGuard::new(frame(&ledger, 1));

        assert_eq!(guard.sequence(), 1);
        guard.release().unwrap();
        assert_eq!(ledger.release_count(1), Some(1));
    }

    #[test]
    fn test_release_on_drop() {
        let ledger = ReleaseLedger::new();
        {
            let _guard = FrameGuard::new(frame(&ledger, 1));
        }
        assert_eq!(ledger.release_count(1), Some(1));
    }

    #[test]
    fn test_release_on_panic() {
        let ledger = ReleaseLedger::new();
        let inner = ledger.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = FrameGuard::new(frame(&inner, 1));
            panic!("decoder blew up");
        }));

        assert!(result.is_err());
        assert!(ledger.all_released_once());
    }
}
