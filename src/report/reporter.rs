//! Push-only decode event channel.

use crate::decode::{Decoded, Symbology};
use crate::orientation::RotationAngle;
use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

/// Application-visible result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeEvent {
    /// Decoded payload text.
    pub text: String,
    /// Symbology of the decoded barcode.
    pub symbology: Symbology,
    /// Rotation applied to the frame before decoding.
    pub rotation: RotationAngle,
    /// Sequence number of the source frame.
    pub frame_sequence: u64,
    /// Time the decode completed.
    pub decoded_at: DateTime<Utc>,
}

impl std::fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.text, self.symbology)
    }
}

/// Creates a reporter and the receiving end the application listens on.
pub fn channel() -> (DecodeReporter, Receiver<DecodeEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (DecodeReporter::new(tx), rx)
}

/// Turns decoder successes into [`DecodeEvent`]s.
///
/// Holds no per-frame state; every frame is reported independently.
#[derive(Debug, Clone)]
pub struct DecodeReporter {
    events: Sender<DecodeEvent>,
    delivered: u64,
}

impl DecodeReporter {
    /// Reporter publishing into `events`.
    pub fn new(events: Sender<DecodeEvent>) -> Self {
        Self {
            events,
            delivered: 0,
        }
    }

    /// Publishes a successful decode and returns the event.
    ///
    /// A receiver that went away is not an error for the pipeline; the
    /// event is still returned to the caller.
    pub fn report(
        &mut self,
        decoded: Decoded,
        rotation: RotationAngle,
        frame_sequence: u64,
    ) -> DecodeEvent {
        let event = DecodeEvent {
            text: decoded.text,
            symbology: decoded.symbology,
            rotation,
            frame_sequence,
            decoded_at: Utc::now(),
        };

        tracing::info!(
            text = %event.text,
            symbology = %event.symbology,
            frame = frame_sequence,
            "Decode success"
        );

        match self.events.send(event.clone()) {
            Ok(()) => self.delivered += 1,
            Err(_) => tracing::debug!("Decode event receiver disconnected, event dropped"),
        }

        event
    }

    /// Number of events delivered to the receiver.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}
