//! QR decoder backed by `rqrr`.

use super::{Decoded, DecodeError, DecodeOutcome, Decoder, LuminanceSource, Symbology};
use rqrr::PreparedImage;

/// Decodes the first QR code `rqrr` finds in the luminance source.
#[derive(Debug, Default)]
pub struct QrDecoder;

impl QrDecoder {
    /// Creates a QR decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for QrDecoder {
    fn decode(&mut self, source: &LuminanceSource<'_>) -> DecodeOutcome {
        let width = source.width() as usize;
        let height = source.height() as usize;
        if width == 0 || height == 0 {
            return DecodeOutcome::NotFound;
        }

        let mut prepared = PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            source.luminance(x as u32, y as u32)
        });
        let grids = prepared.detect_grids();

        let Some(grid) = grids.first() else {
            return DecodeOutcome::NotFound;
        };

        match grid.decode() {
            Ok((_meta, text)) => DecodeOutcome::Success(Decoded::new(text, Symbology::QrCode)),
            Err(e) => DecodeOutcome::Error(DecodeError::Internal(e.to_string())),
        }
    }
}
