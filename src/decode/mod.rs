//! Decoder collaborator interface.
//!
//! The pipeline does not decode barcodes itself. It lends the rotated
//! luminance plane to an injected [`Decoder`] and branches on the
//! three-way [`DecodeOutcome`] it returns.

mod mock;
mod outcome;
#[cfg(feature = "qr")]
mod qr;
mod source;

pub use mock::{MockDecoder, SeenSource};
pub use outcome::{DecodeError, DecodeOutcome, Decoded, Symbology};
#[cfg(feature = "qr")]
pub use qr::QrDecoder;
pub use source::{LuminanceSource, Region};

/// A barcode decoder.
///
/// Implementations binarize the source as they see fit. "No barcode" is
/// reported as [`DecodeOutcome::NotFound`], never as an error.
pub trait Decoder {
    /// Attempts to decode one luminance image.
    fn decode(&mut self, source: &LuminanceSource<'_>) -> DecodeOutcome;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(&mut self, source: &LuminanceSource<'_>) -> DecodeOutcome {
        (**self).decode(source)
    }
}
