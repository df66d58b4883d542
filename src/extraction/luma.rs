//! Owned luminance buffer.

use thiserror::Error;

/// Errors constructing a [`LumaBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LumaError {
    /// Buffer length differs from `width * height`.
    #[error("buffer holds {len} bytes but {width}x{height} needs {expected}")]
    SizeMismatch {
        /// Bytes supplied.
        len: usize,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Bytes the dimensions require.
        expected: usize,
    },
}

/// A single-channel, row-major, one-byte-per-pixel image.
///
/// Invariant: `data.len() == width * height`. Pixel `(x, y)` lives at
/// `data[x + y * width]`.
#[derive(Clone, PartialEq, Eq)]
pub struct LumaBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl LumaBuffer {
    /// Wraps `data` as a `width` x `height` image.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, LumaError> {
        let expected = pixel_count(width, height);
        if data.len() != expected {
            return Err(LumaError::SizeMismatch {
                len: data.len(),
                width,
                height,
                expected,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut data = Vec::with_capacity(pixel_count(width, height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Constructor for callers that already guarantee the size invariant.
    pub(crate) fn from_parts_unchecked(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), pixel_count(width, height));
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Returns true for a zero-area image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(x as usize + y as usize * self.width as usize)
            .copied()
    }

    /// Splits the buffer into `(data, width, height)`.
    pub fn into_parts(self) -> (Vec<u8>, u32, u32) {
        (self.data, self.width, self.height)
    }
}

impl std::fmt::Debug for LumaBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumaBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[inline]
fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}
