//! Read-only luminance view handed to decoders.

use super::DecodeError;
use crate::extraction::LumaBuffer;

/// Rectangle inside an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Leftmost column.
    pub left: u32,
    /// Topmost row.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Region covering a whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    fn fits(&self, width: u32, height: u32) -> bool {
        u64::from(self.left) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.top) + u64::from(self.height) <= u64::from(height)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.left, self.top, self.width, self.height
        )
    }
}

/// Borrowed luminance image plus the region a decoder should scan.
#[derive(Debug, Clone, Copy)]
pub struct LuminanceSource<'a> {
    luma: &'a [u8],
    width: u32,
    height: u32,
    region: Region,
    inverted: bool,
}

impl<'a> LuminanceSource<'a> {
    /// Creates a source over `luma`, checking buffer size and region.
    pub fn new(
        luma: &'a [u8],
        width: u32,
        height: u32,
        region: Region,
        inverted: bool,
    ) -> Result<Self, DecodeError> {
        if luma.len() != (width as usize) * (height as usize) {
            return Err(DecodeError::DimensionMismatch {
                len: luma.len(),
                width,
                height,
            });
        }
        if !region.fits(width, height) {
            return Err(DecodeError::RegionOutOfBounds {
                region,
                width,
                height,
            });
        }
        Ok(Self {
            luma,
            width,
            height,
            region,
            inverted,
        })
    }

    /// Full-image, non-inverted source over a luma buffer.
    pub fn full(buffer: &'a LumaBuffer) -> Self {
        Self {
            luma: buffer.data(),
            width: buffer.width(),
            height: buffer.height(),
            region: Region::full(buffer.width(), buffer.height()),
            inverted: false,
        }
    }

    /// Width of the scanned region.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// Height of the scanned region.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Extents of the underlying image.
    pub fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The scanned region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Whether luminance values are reported inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Luminance at `(x, y)` relative to the region origin.
    ///
    /// Panics if `(x, y)` lies outside the region.
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.region.width && y < self.region.height);
        let idx = (self.region.left + x) as usize
            + (self.region.top + y) as usize * self.width as usize;
        let value = self.luma[idx];
        if self.inverted {
            255 - value
        } else {
            value
        }
    }

    /// Row `y` of the region, without inversion applied.
    pub fn row(&self, y: u32) -> Option<&'a [u8]> {
        if y >= self.region.height {
            return None;
        }
        let start = self.region.left as usize
            + (self.region.top + y) as usize * self.width as usize;
        self.luma.get(start..start + self.region.width as usize)
    }
}
