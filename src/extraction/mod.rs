//! Luminance plane extraction.
//!
//! This module pulls the luminance plane out of a multi-plane camera
//! frame into an owned, tightly packed [`LumaBuffer`]. Only the planar
//! YUV family is accepted; anything else is skipped for this cycle.

mod luma;

pub use luma::{LumaBuffer, LumaError};

use crate::capture::{Frame, PixelFormat};
use thiserror::Error;

/// Planes a planar YUV frame must carry (Y, U, V).
pub const PLANAR_YUV_PLANES: usize = 3;

/// Reasons a frame cannot be turned into a [`LumaBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Not a planar YUV frame.
    #[error("unsupported pixel format {0}")]
    UnsupportedFormat(PixelFormat),
    /// Planar YUV format with the wrong number of planes.
    #[error("{format} frame has {found} planes, expected {expected}")]
    PlaneCount {
        /// Declared pixel format.
        format: PixelFormat,
        /// Planes the frame carries.
        found: usize,
        /// Planes the format requires.
        expected: usize,
    },
    /// The frame reports planes but yields no luma plane.
    #[error("luma plane missing")]
    MissingPlane,
    /// Luma samples are not tightly packed within a row.
    #[error("luma pixel stride {0} is not 1")]
    PixelStride(usize),
    /// Rows overlap.
    #[error("row stride {row_stride} is smaller than width {width}")]
    RowStride {
        /// Bytes between row starts.
        row_stride: usize,
        /// Logical width in pixels.
        width: usize,
    },
    /// Declared geometry does not fit in the address space.
    #[error("luma geometry {width}x{height} with row stride {row_stride} overflows")]
    Geometry {
        /// Logical width in pixels.
        width: usize,
        /// Logical height in pixels.
        height: usize,
        /// Bytes between row starts.
        row_stride: usize,
    },
    /// The plane buffer ends before the last row.
    #[error("luma plane holds {available} bytes, {needed} needed")]
    PlaneTooSmall {
        /// Bytes the declared geometry requires.
        needed: usize,
        /// Bytes the plane actually holds.
        available: usize,
    },
}

impl ExtractError {
    /// Returns true when the frame is simply of a kind this pipeline
    /// does not process, as opposed to a malformed frame.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedFormat(_) | ExtractError::PlaneCount { .. }
        )
    }
}

/// Copies the luminance plane of planar YUV frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneExtractor;

impl PlaneExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Checks pixel format and plane count.
    pub fn validate<F: Frame>(&self, frame: &F) -> Result<(), ExtractError> {
        let format = frame.pixel_format();
        if !format.is_planar_yuv() {
            return Err(ExtractError::UnsupportedFormat(format));
        }
        let found = frame.plane_count();
        if found != PLANAR_YUV_PLANES {
            return Err(ExtractError::PlaneCount {
                format,
                found,
                expected: PLANAR_YUV_PLANES,
            });
        }
        Ok(())
    }

    /// Validates `frame` and copies its luminance plane.
    ///
    /// Row padding beyond the logical width is dropped, so the result is
    /// always `width * height` bytes. The frame is not released.
    pub fn extract<F: Frame>(&self, frame: &F) -> Result<LumaBuffer, ExtractError> {
        self.validate(frame)?;
        self.copy_luma(frame)
    }

    /// Copies the luminance plane of a frame that already passed
    /// [`PlaneExtractor::validate`].
    pub fn copy_luma<F: Frame>(&self, frame: &F) -> Result<LumaBuffer, ExtractError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(LumaBuffer::from_parts_unchecked(
                Vec::new(),
                frame.width(),
                frame.height(),
            ));
        }

        let plane = frame.plane(0).ok_or(ExtractError::MissingPlane)?;
        if plane.pixel_stride != 1 {
            return Err(ExtractError::PixelStride(plane.pixel_stride));
        }

        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let row_stride = plane.row_stride;
        if row_stride < width {
            return Err(ExtractError::RowStride { row_stride, width });
        }

        // Last row may omit its padding
        let needed = (height - 1)
            .checked_mul(row_stride)
            .and_then(|n| n.checked_add(width))
            .ok_or(ExtractError::Geometry {
                width,
                height,
                row_stride,
            })?;
        if plane.capacity() < needed {
            return Err(ExtractError::PlaneTooSmall {
                needed,
                available: plane.capacity(),
            });
        }

        let data = if row_stride == width {
            plane.data[..width * height].to_vec()
        } else {
            let mut data = Vec::with_capacity(width * height);
            for row in plane.data.chunks(row_stride).take(height) {
                data.extend_from_slice(&row[..width]);
            }
            data
        };

        tracing::trace!(
            width,
            height,
            row_stride,
            capacity = plane.capacity(),
            "Extracted luma plane"
        );

        Ok(LumaBuffer::from_parts_unchecked(
            data,
            frame.width(),
            frame.height(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{MockFrame, ReleaseLedger};

    fn yuv_frame(
        ledger: &ReleaseLedger,
        width: u32,
        height: u32,
        luma: Vec<u8>,
        row_stride: usize,
    ) -> MockFrame {
        MockFrame::from_planes(
            PixelFormat::Yuv420,
            width,
            height,
            vec![(luma, row_stride), (vec![128; 4], 2), (vec![128; 4], 2)],
            1,
            ledger,
        )
    }

    #[test]
    fn test_extracts_packed_plane() {
        let ledger = ReleaseLedger::new();
        let frame = yuv_frame(&ledger, 2, 3, vec![1, 2, 3, 4, 5, 6], 2);

        let luma = PlaneExtractor::new().extract(&frame).unwrap();
        assert_eq!(luma.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!((luma.width(), luma.height()), (2, 3));

        // Extraction never releases the frame
        assert_eq!(ledger.outstanding(), 1);
    }

    #[test]
    fn test_copies_only_logical_bytes_when_capacity_larger() {
        let ledger = ReleaseLedger::new();
        let frame = yuv_frame(&ledger, 2, 2, vec![1, 2, 3, 4, 99, 99, 99], 2);

        let luma = PlaneExtractor::new().extract(&frame).unwrap();
        assert_eq!(luma.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_crops_row_stride_padding() {
        let ledger = ReleaseLedger::new();
        // width 3, stride 5, last row unpadded
        let plane = vec![1, 2, 3, 0, 0, 4, 5, 6, 0, 0, 7, 8, 9];
        let frame = yuv_frame(&ledger, 3, 3, plane, 5);

        let luma = PlaneExtractor::new().extract(&frame).unwrap();
        assert_eq!(luma.data(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_rejects_non_yuv_formats() {
        let ledger = ReleaseLedger::new();
        let extractor = PlaneExtractor::new();

        for format in [PixelFormat::Nv21, PixelFormat::Rgba8888, PixelFormat::Jpeg] {
            let frame = MockFrame::from_planes(
                format,
                2,
                2,
                vec![(vec![0; 4], 2), (vec![0; 4], 2), (vec![0; 4], 2)],
                1,
                &ledger,
            );
            let err = extractor.extract(&frame).unwrap_err();
            assert_eq!(err, ExtractError::UnsupportedFormat(format));
            assert!(err.is_unsupported());
        }
    }

    #[test]
    fn test_rejects_wrong_plane_count() {
        let ledger = ReleaseLedger::new();
        let frame = MockFrame::from_planes(
            PixelFormat::Yuv444,
            2,
            2,
            vec![(vec![0; 4], 2)],
            1,
            &ledger,
        );

        let err = PlaneExtractor::new().extract(&frame).unwrap_err();
        assert!(matches!(err, ExtractError::PlaneCount { found: 1, .. }));
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_rejects_short_plane() {
        let ledger = ReleaseLedger::new();
        let frame = yuv_frame(&ledger, 4, 4, vec![0; 10], 4);

        let err = PlaneExtractor::new().extract(&frame).unwrap_err();
        assert_eq!(
            err,
            ExtractError::PlaneTooSmall {
                needed: 16,
                available: 10
            }
        );
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_zero_height_frame() {
        let ledger = ReleaseLedger::new();
        let frame = yuv_frame(&ledger, 4, 0, Vec::new(), 4);

        let luma = PlaneExtractor::new().extract(&frame).unwrap();
        assert!(luma.is_empty());
    }

    #[test]
    fn test_zero_dimension_frame_with_zero_stride() {
        let ledger = ReleaseLedger::new();
        let extractor = PlaneExtractor::new();

        for (width, height) in [(4, 0), (0, 3), (0, 0)] {
            let frame = yuv_frame(&ledger, width, height, Vec::new(), 0);
            let luma = extractor.extract(&frame).unwrap();
            assert!(luma.is_empty());
            assert_eq!((luma.width(), luma.height()), (width, height));
        }
    }

    #[test]
    fn test_rejects_zero_stride_with_rows() {
        let ledger = ReleaseLedger::new();
        let frame = yuv_frame(&ledger, 4, 3, vec![0; 12], 0);

        let err = PlaneExtractor::new().extract(&frame).unwrap_err();
        assert_eq!(
            err,
            ExtractError::RowStride {
                row_stride: 0,
                width: 4
            }
        );
    }

    #[test]
    fn test_rejects_overflowing_stride() {
        let ledger = ReleaseLedger::new();
        let row_stride = usize::MAX / 2;
        let frame = yuv_frame(&ledger, 4, 3, vec![0; 12], row_stride);

        let err = PlaneExtractor::new().extract(&frame).unwrap_err();
        assert_eq!(
            err,
            ExtractError::Geometry {
                width: 4,
                height: 3,
                row_stride
            }
        );
        assert!(!err.is_unsupported());
    }
}
