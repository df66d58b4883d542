//! Decode result reporting.
//!
//! Successful decodes become [`DecodeEvent`]s pushed to the application
//! over a channel. Frames without a result produce no event at all, so
//! the application observes either a decode or silence.

mod reporter;

pub use reporter::{channel, DecodeEvent, DecodeReporter};
