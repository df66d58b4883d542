//! Decoder results and symbology tags.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Region;

/// Barcode symbologies reported by a multi-format reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// Aztec 2D code.
    Aztec,
    /// Codabar.
    Codabar,
    /// Code 39.
    Code39,
    /// Code 93.
    Code93,
    /// Code 128.
    Code128,
    /// Data Matrix.
    DataMatrix,
    /// EAN-8.
    Ean8,
    /// EAN-13.
    Ean13,
    /// Interleaved 2 of 5.
    Itf,
    /// MaxiCode.
    MaxiCode,
    /// PDF417.
    Pdf417,
    /// QR code.
    QrCode,
    /// GS1 DataBar (RSS-14).
    Rss14,
    /// GS1 DataBar Expanded.
    RssExpanded,
    /// UPC-A.
    UpcA,
    /// UPC-E.
    UpcE,
    /// UPC/EAN 2 or 5 digit extension.
    UpcEanExtension,
}

impl Symbology {
    /// Returns true for matrix (two-dimensional) symbologies.
    pub fn is_two_dimensional(self) -> bool {
        matches!(
            self,
            Symbology::Aztec
                | Symbology::DataMatrix
                | Symbology::MaxiCode
                | Symbology::Pdf417
                | Symbology::QrCode
        )
    }

    /// Canonical upper-case name, e.g. `QR_CODE`.
    pub fn name(self) -> &'static str {
        match self {
            Symbology::Aztec => "AZTEC",
            Symbology::Codabar => "CODABAR",
            Symbology::Code39 => "CODE_39",
            Symbology::Code93 => "CODE_93",
            Symbology::Code128 => "CODE_128",
            Symbology::DataMatrix => "DATA_MATRIX",
            Symbology::Ean8 => "EAN_8",
            Symbology::Ean13 => "EAN_13",
            Symbology::Itf => "ITF",
            Symbology::MaxiCode => "MAXICODE",
            Symbology::Pdf417 => "PDF_417",
            Symbology::QrCode => "QR_CODE",
            Symbology::Rss14 => "RSS_14",
            Symbology::RssExpanded => "RSS_EXPANDED",
            Symbology::UpcA => "UPC_A",
            Symbology::UpcE => "UPC_E",
            Symbology::UpcEanExtension => "UPC_EAN_EXTENSION",
        }
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload recovered from a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded text.
    pub text: String,
    /// Symbology the payload was encoded in.
    pub symbology: Symbology,
}

impl Decoded {
    /// Pairs decoded text with its symbology.
    pub fn new(text: impl Into<String>, symbology: Symbology) -> Self {
        Self {
            text: text.into(),
            symbology,
        }
    }
}

/// Decoder failures other than "nothing found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Luminance buffer length does not match its dimensions.
    #[error("luma buffer holds {len} bytes, {width}x{height} expected")]
    DimensionMismatch {
        /// Bytes supplied.
        len: usize,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// Scan region extends past the image.
    #[error("region {region} outside {width}x{height} image")]
    RegionOutOfBounds {
        /// Requested region.
        region: Region,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// The decoder backend failed.
    #[error("decoder failure: {0}")]
    Internal(String),
}

/// Result of one decode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A barcode was recognized.
    Success(Decoded),
    /// No barcode in the frame. The usual case.
    NotFound,
    /// The decoder could not process the input.
    Error(DecodeError),
}

impl DecodeOutcome {
    /// Returns true for [`DecodeOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, DecodeOutcome::Success(_))
    }
}

impl From<Result<Option<Decoded>, DecodeError>> for DecodeOutcome {
    fn from(result: Result<Option<Decoded>, DecodeError>) -> Self {
        match result {
            Ok(Some(decoded)) => DecodeOutcome::Success(decoded),
            Ok(None) => DecodeOutcome::NotFound,
            Err(e) => DecodeOutcome::Error(e),
        }
    }
}
