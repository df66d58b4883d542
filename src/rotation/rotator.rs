//! Quarter-turn rotation of luminance buffers.
//!
//! Rotation is a pure index remapping: every source pixel is copied to
//! exactly one destination slot, no interpolation. One output buffer is
//! allocated per non-identity rotation.

use crate::extraction::LumaBuffer;
use crate::orientation::RotationAngle;

/// Maps source pixel `(x, y)` of a `width` x `height` image to
/// `(destination_index, source_index)` for `angle`.
///
/// Both indices are row-major offsets into buffers of `width * height`
/// bytes; the destination buffer has swapped extents for 90 and 270.
#[inline]
pub fn remap(
    angle: RotationAngle,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> (usize, usize) {
    match angle {
        RotationAngle::Deg0 => (x + y * width, x + y * width),
        // Fill from top-right toward the left
        RotationAngle::Deg90 => (x * height + (height - y - 1), x + y * width),
        // Fill from bottom-right upward
        RotationAngle::Deg180 => (
            width * (height - y - 1) + (width - x - 1),
            x + y * width,
        ),
        // Counter-clockwise mirror of the 90 degree case
        RotationAngle::Deg270 => (y + x * height, y * width + (width - x - 1)),
    }
}

/// Rotates `source` clockwise by `angle`.
///
/// `Deg0` returns the input unchanged without allocating. For 90 and 270
/// the result has width and height swapped.
pub fn rotate(source: LumaBuffer, angle: RotationAngle) -> LumaBuffer {
    if angle == RotationAngle::Deg0 {
        return source;
    }

    let width = source.width() as usize;
    let height = source.height() as usize;
    let src = source.data();

    let mut rotated = vec![0u8; src.len()];
    for y in 0..height {
        for x in 0..width {
            let (dst_idx, src_idx) = remap(angle, x, y, width, height);
            rotated[dst_idx] = src[src_idx];
        }
    }

    let (out_w, out_h) = if angle.swaps_dimensions() {
        (source.height(), source.width())
    } else {
        (source.width(), source.height())
    };

    LumaBuffer::from_parts_unchecked(rotated, out_w, out_h)
}

/// Rotates `source` clockwise by a raw angle in degrees.
///
/// Angles that are not a multiple of 90 are ignored and the input is
/// returned unchanged. Multiples of 90 are taken modulo 360.
pub fn rotate_degrees(source: LumaBuffer, degrees: i32) -> LumaBuffer {
    match RotationAngle::from_degrees(degrees) {
        Some(angle) => rotate(source, angle),
        None => {
            tracing::trace!(degrees, "Ignoring rotation that is not a quarter turn");
            source
        }
    }
}
