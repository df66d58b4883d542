//! Scriptable decoder for tests and the demo binary.

use super::{Decoded, DecodeOutcome, Decoder, LuminanceSource, Region};
use std::collections::VecDeque;

/// What a [`MockDecoder`] was last asked to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeenSource {
    /// Image width and height.
    pub image_size: (u32, u32),
    /// Region the decoder was asked to scan.
    pub region: Region,
    /// Whether luminance was inverted.
    pub inverted: bool,
}

/// Decoder that returns predetermined outcomes.
///
/// Scripted outcomes are consumed first; afterwards the decoder either
/// recognizes every Nth call or reports [`DecodeOutcome::NotFound`].
#[derive(Debug, Default)]
pub struct MockDecoder {
    script: VecDeque<DecodeOutcome>,
    recognize_every: u64,
    payload: Option<Decoded>,
    calls: u64,
    last_seen: Option<SeenSource>,
}

impl MockDecoder {
    /// Decoder that never finds anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder that plays back `outcomes` in order.
    pub fn scripted(outcomes: impl IntoIterator<Item = DecodeOutcome>) -> Self {
        Self {
            script: outcomes.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Decoder that recognizes `payload` on every `n`th call.
    ///
    /// `n == 0` never recognizes.
    pub fn recognize_every(n: u32, payload: Decoded) -> Self {
        Self {
            recognize_every: u64::from(n),
            payload: Some(payload),
            ..Self::default()
        }
    }

    /// Number of decode calls so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Source of the most recent call.
    pub fn last_seen(&self) -> Option<SeenSource> {
        self.last_seen
    }
}

impl Decoder for MockDecoder {
    fn decode(&mut self, source: &LuminanceSource<'_>) -> DecodeOutcome {
        self.calls += 1;
        self.last_seen = Some(SeenSource {
            image_size: source.image_size(),
            region: source.region(),
            inverted: source.is_inverted(),
        });

        if let Some(outcome) = self.script.pop_front() {
            return outcome;
        }

        match &self.payload {
            Some(payload) if self.recognize_every > 0 && self.calls % self.recognize_every == 0 => {
                DecodeOutcome::Success(payload.clone())
            }
            _ => DecodeOutcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeError, Symbology};
    use crate::extraction::LumaBuffer;

    #[test]
    fn test_script_then_not_found() {
        let luma = LumaBuffer::new(vec![0; 4], 2, 2).unwrap();
        let mut decoder = MockDecoder::scripted([
            DecodeOutcome::Error(DecodeError::Internal("bad".into())),
            DecodeOutcome::Success(Decoded::new("x", Symbology::Code128)),
        ]);

        let source = LuminanceSource::full(&luma);
        assert!(matches!(decoder.decode(&source), DecodeOutcome::Error(_)));
        assert!(decoder.decode(&source).is_success());
        assert_eq!(decoder.decode(&source), DecodeOutcome::NotFound);
        assert_eq!(decoder.calls(), 3);
    }

    #[test]
    fn test_recognize_every() {
        let luma = LumaBuffer::new(vec![0; 4], 2, 2).unwrap();
        let source = LuminanceSource::full(&luma);
        let mut decoder = MockDecoder::recognize_every(3, Decoded::new("x", Symbology::QrCode));

        let hits: Vec<bool> = (0..6).map(|_| decoder.decode(&source).is_success()).collect();
        assert_eq!(hits, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_records_source() {
        let luma = LumaBuffer::new(vec![0; 6], 3, 2).unwrap();
        let mut decoder = MockDecoder::new();
        decoder.decode(&LuminanceSource::full(&luma));

        let seen = decoder.last_seen().unwrap();
        assert_eq!(seen.image_size, (3, 2));
        assert_eq!(seen.region, Region::full(3, 2));
        assert!(!seen.inverted);
    }
}
