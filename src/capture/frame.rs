//! Frame types exchanged with the camera collaborator.
//!
//! A frame is owned by the camera subsystem. The pipeline borrows its
//! planes while processing and hands it back through [`Frame::release`]
//! exactly once when it is done.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel format tag reported by the camera for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Planar YUV with 2x2 chroma subsampling (3 planes).
    Yuv420,
    /// Planar YUV with horizontal chroma subsampling (3 planes).
    Yuv422,
    /// Planar YUV without chroma subsampling (3 planes).
    Yuv444,
    /// Semi-planar YUV with interleaved VU (2 planes).
    Nv21,
    /// Packed 8-bit RGBA (1 plane).
    Rgba8888,
    /// Compressed JPEG (1 plane).
    Jpeg,
}

impl PixelFormat {
    /// Returns true for the planar YUV family with a full-resolution
    /// luminance plane in plane 0.
    pub fn is_planar_yuv(self) -> bool {
        matches!(
            self,
            PixelFormat::Yuv420 | PixelFormat::Yuv422 | PixelFormat::Yuv444
        )
    }

    /// Number of planes a well-formed frame of this format carries.
    pub fn expected_planes(self) -> usize {
        match self {
            PixelFormat::Yuv420 | PixelFormat::Yuv422 | PixelFormat::Yuv444 => 3,
            PixelFormat::Nv21 => 2,
            PixelFormat::Rgba8888 | PixelFormat::Jpeg => 1,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PixelFormat::Yuv420 => "YUV_420_888",
            PixelFormat::Yuv422 => "YUV_422_888",
            PixelFormat::Yuv444 => "YUV_444_888",
            PixelFormat::Nv21 => "NV21",
            PixelFormat::Rgba8888 => "RGBA_8888",
            PixelFormat::Jpeg => "JPEG",
        };
        f.write_str(name)
    }
}

/// A borrowed view of one plane of a frame.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    /// Plane bytes, including any row padding.
    pub data: &'a [u8],
    /// Distance in bytes between the starts of consecutive rows.
    pub row_stride: usize,
    /// Distance in bytes between horizontally adjacent samples.
    pub pixel_stride: usize,
}

impl<'a> Plane<'a> {
    /// Creates a tightly packed plane (row stride equals `width`).
    pub fn packed(data: &'a [u8], width: usize) -> Self {
        Self {
            data,
            row_stride: width,
            pixel_stride: 1,
        }
    }

    /// Usable capacity of the plane buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Errors reported by the camera collaborator when a frame is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseError {
    /// The frame went back to the camera earlier.
    #[error("frame {0} was already released")]
    AlreadyReleased(u64),
    /// The camera does not recognize the handle.
    #[error("invalid frame handle: {0}")]
    InvalidHandle(String),
}

/// A captured frame owned by the camera collaborator.
///
/// `release` consumes the handle, so the pipeline can only hand a frame
/// back once. Implementations report a broken contract on their side
/// (stale or foreign handle) through [`ReleaseError`].
pub trait Frame {
    /// Pixel format tag.
    fn pixel_format(&self) -> PixelFormat;

    /// Logical width in pixels.
    fn width(&self) -> u32;

    /// Logical height in pixels.
    fn height(&self) -> u32;

    /// Number of planes carried by this frame.
    fn plane_count(&self) -> usize;

    /// Returns plane `index`, or `None` if out of range.
    fn plane(&self, index: usize) -> Option<Plane<'_>>;

    /// Monotonic sequence number assigned by the camera.
    fn sequence(&self) -> u64;

    /// Returns the frame buffers to the camera.
    fn release(self) -> Result<(), ReleaseError>
    where
        Self: Sized;
}
