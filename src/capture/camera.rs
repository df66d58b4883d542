//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over the camera
//! subsystem, allowing for both real camera input and mock
//! implementations for testing.

use super::{CaptureConfig, Frame, PixelFormat, Plane, ReleaseError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// No device with the requested id.
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    /// The device refused to open.
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    /// The capture configuration was rejected.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// A frame could not be captured.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// `capture` was called before `open`.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Frame handle type delivered by this camera.
    type Frame: Frame;

    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Self::Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Release count per issued frame sequence.
    releases: HashMap<u64, u32>,
    issued: u64,
}

/// Tracks which frames a camera has handed out and how often each one
/// came back.
///
/// Cloning the ledger shares the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct ReleaseLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl ReleaseLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut LedgerState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn issue(&self, sequence: u64) {
        self.with_state(|state| {
            state.releases.insert(sequence, 0);
            state.issued += 1;
        });
    }

    fn record_release(&self, sequence: u64) -> Result<(), ReleaseError> {
        self.with_state(|state| match state.releases.get_mut(&sequence) {
            Some(count) if *count == 0 => {
                *count = 1;
                Ok(())
            }
            Some(count) => {
                *count += 1;
                Err(ReleaseError::AlreadyReleased(sequence))
            }
            None => Err(ReleaseError::InvalidHandle(format!(
                "sequence {sequence} was never issued"
            ))),
        })
    }

    /// Number of frames handed out.
    pub fn issued(&self) -> u64 {
        self.with_state(|state| state.issued)
    }

    /// Number of issued frames not yet released.
    pub fn outstanding(&self) -> usize {
        self.with_state(|state| state.releases.values().filter(|&&c| c == 0).count())
    }

    /// How many times the frame with `sequence` was released.
    pub fn release_count(&self, sequence: u64) -> Option<u32> {
        self.with_state(|state| state.releases.get(&sequence).copied())
    }

    /// Returns true if every issued frame was released exactly once.
    pub fn all_released_once(&self) -> bool {
        self.with_state(|state| state.releases.values().all(|&c| c == 1))
    }
}

#[derive(Debug, Clone)]
struct PlaneBuffer {
    data: Vec<u8>,
    row_stride: usize,
    pixel_stride: usize,
}

/// Frame produced by [`MockCamera`].
#[derive(Debug)]
pub struct MockFrame {
    format: PixelFormat,
    width: u32,
    height: u32,
    planes: Vec<PlaneBuffer>,
    sequence: u64,
    ledger: ReleaseLedger,
}

impl MockFrame {
    /// Builds a frame from owned plane buffers, registering it with
    /// `ledger`.
    ///
    /// Each plane is `(bytes, row_stride)` with a pixel stride of 1.
    pub fn from_planes(
        format: PixelFormat,
        width: u32,
        height: u32,
        planes: Vec<(Vec<u8>, usize)>,
        sequence: u64,
        ledger: &ReleaseLedger,
    ) -> Self {
        ledger.issue(sequence);
        Self {
            format,
            width,
            height,
            planes: planes
                .into_iter()
                .map(|(data, row_stride)| PlaneBuffer {
                    data,
                    row_stride,
                    pixel_stride: 1,
                })
                .collect(),
            sequence,
            ledger: ledger.clone(),
        }
    }

    /// Creates a second handle to the same frame.
    ///
    /// Releasing both handles breaks the exactly-once contract; used to
    /// exercise release-failure diagnostics.
    pub fn duplicate_handle(&self) -> Self {
        Self {
            format: self.format,
            width: self.width,
            height: self.height,
            planes: self.planes.clone(),
            sequence: self.sequence,
            ledger: self.ledger.clone(),
        }
    }
}

impl Frame for MockFrame {
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn plane_count(&self) -> usize {
        self.planes.len()
    }

    fn plane(&self, index: usize) -> Option<Plane<'_>> {
        self.planes.get(index).map(|p| Plane {
            data: &p.data,
            row_stride: p.row_stride,
            pixel_stride: p.pixel_stride,
        })
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn release(self) -> Result<(), ReleaseError> {
        self.ledger.record_release(self.sequence)
    }
}

/// Mock camera for testing that generates synthetic multi-plane frames.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
    ledger: ReleaseLedger,
}

impl MockCamera {
    /// Closed mock camera; call [`Camera::open`] first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the release ledger of this camera.
    pub fn ledger(&self) -> ReleaseLedger {
        self.ledger.clone()
    }

    fn synthesize(&self, config: &CaptureConfig, format: PixelFormat) -> Vec<(Vec<u8>, usize)> {
        let width = config.width as usize;
        let height = config.height as usize;

        match format {
            PixelFormat::Yuv420 | PixelFormat::Yuv422 | PixelFormat::Yuv444 => {
                let row_stride = width + config.row_padding as usize;
                // Diagonal gradient shifted by sequence, NOT a barcode
                let mut luma = vec![0u8; row_stride * height];
                for y in 0..height {
                    for x in 0..width {
                        luma[y * row_stride + x] =
                            ((x as u64 + y as u64 + self.sequence) % 256) as u8;
                    }
                }

                let (chroma_w, chroma_h) = match format {
                    PixelFormat::Yuv420 => (width.div_ceil(2), height.div_ceil(2)),
                    PixelFormat::Yuv422 => (width.div_ceil(2), height),
                    _ => (width, height),
                };
                let chroma = vec![128u8; chroma_w * chroma_h];

                vec![
                    (luma, row_stride),
                    (chroma.clone(), chroma_w),
                    (chroma, chroma_w),
                ]
            }
            PixelFormat::Nv21 => {
                let luma = vec![0u8; width * height];
                let vu = vec![128u8; width * height.div_ceil(2)];
                vec![(luma, width), (vu, width)]
            }
            PixelFormat::Rgba8888 => vec![(vec![0u8; width * height * 4], width * 4)],
            PixelFormat::Jpeg => vec![(vec![0xFF, 0xD8, 0xFF, 0xD9], 0)],
        }
    }
}

impl Camera for MockCamera {
    type Frame = MockFrame;

    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<MockFrame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        self.sequence += 1;
        let format = if config.unsupported_every > 0
            && self.sequence % u64::from(config.unsupported_every) == 0
        {
            config.unsupported_format
        } else {
            config.pixel_format
        };

        let planes = self.synthesize(config, format);
        Ok(MockFrame::from_planes(
            format,
            config.width,
            config.height,
            planes,
            self.sequence,
            &self.ledger,
        ))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!(
            outstanding = self.ledger.outstanding(),
            "MockCamera closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.plane_count(), 3);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        frame.release().unwrap();
        frame2.release().unwrap();

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(
            camera.capture(),
            Err(CameraError::NotInitialized)
        ));
    }

    #[test]
    fn test_row_padding_in_luma_plane() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig {
            width: 8,
            height: 4,
            row_padding: 8,
            ..Default::default()
        };
        camera.open(&config).unwrap();

        let frame = camera.capture().unwrap();
        let luma = frame.plane(0).unwrap();
        assert_eq!(luma.row_stride, 16);
        assert_eq!(luma.capacity(), 64);
        frame.release().unwrap();
    }

    #[test]
    fn test_unsupported_frames_interleaved() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig {
            unsupported_every: 2,
            ..Default::default()
        };
        camera.open(&config).unwrap();

        let first = camera.capture().unwrap();
        let second = camera.capture().unwrap();
        assert_eq!(first.pixel_format(), PixelFormat::Yuv420);
        assert_eq!(second.pixel_format(), config.unsupported_format);
        assert_eq!(second.plane_count(), 2);

        first.release().unwrap();
        second.release().unwrap();
    }

    #[test]
    fn test_ledger_tracks_outstanding() {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::default()).unwrap();
        let ledger = camera.ledger();

        let frame = camera.capture().unwrap();
        assert_eq!(ledger.issued(), 1);
        assert_eq!(ledger.outstanding(), 1);

        frame.release().unwrap();
        assert_eq!(ledger.outstanding(), 0);
        assert_eq!(ledger.release_count(1), Some(1));
        assert!(ledger.all_released_once());
    }

    #[test]
    fn test_double_release_detected() {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::default()).unwrap();
        let ledger = camera.ledger();

        let frame = camera.capture().unwrap();
        let alias = frame.duplicate_handle();

        frame.release().unwrap();
        assert_eq!(alias.release(), Err(ReleaseError::AlreadyReleased(1)));
        assert_eq!(ledger.release_count(1), Some(2));
        assert!(!ledger.all_released_once());
    }
}
