//! Luminance Reorientation Library
//!
//! Prepares camera frames for barcode decoding: extracts the luminance
//! plane of planar YUV frames, rotates it by quarter turns to match the
//! device's current orientation, hands it to an injected decoder and
//! reports successful decodes to the application.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → extraction → rotation → decode → report
//!                           ↑
//!                      orientation
//! ```
//!
//! [`pipeline::FramePipeline`] drives a frame through these stages and
//! releases it back to the camera exactly once on every path.
//!
//! # Design Principles
//!
//! - **Silence is normal**: frames without a barcode, unsupported frames
//!   and decoder failures produce no application event
//! - **One copy per frame**: the luma plane is copied once on extraction
//!   and once more by rotation; nothing is retained past the frame
//! - **Pure rotation**: [`rotation::rotate`] has no shared state
//! - **Injected collaborators**: camera and decoder sit behind traits
//!
//! # Example
//!
//! ```no_run
//! use luma_reorient::{
//!     capture::{Camera, CaptureConfig, MockCamera},
//!     decode::{Decoded, MockDecoder, Symbology},
//!     orientation::{OrientationTracker, RotationAngle},
//!     pipeline::FramePipeline,
//!     report,
//! };
//! use std::sync::Arc;
//!
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let tracker = Arc::new(OrientationTracker::new(RotationAngle::Deg90));
//! let decoder = MockDecoder::recognize_every(5, Decoded::new("hello", Symbology::QrCode));
//! let (reporter, events) = report::channel();
//! let mut pipeline = FramePipeline::new(Arc::clone(&tracker), decoder, reporter);
//!
//! // Orientation sensor callback
//! tracker.on_device_orientation(90);
//!
//! for _ in 0..10 {
//!     let frame = camera.capture().unwrap();
//!     pipeline.process(frame);
//! }
//!
//! for event in events.try_iter() {
//!     println!("{event}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod decode;
pub mod extraction;
pub mod metrics;
pub mod orientation;
pub mod pipeline;
pub mod report;
pub mod rotation;

// Re-export commonly used types at crate root
pub use capture::{Camera, CaptureConfig, Frame, MockCamera, PixelFormat};
pub use decode::{DecodeOutcome, Decoded, Decoder, LuminanceSource, Symbology};
pub use extraction::{LumaBuffer, PlaneExtractor};
pub use orientation::{OrientationTracker, RotationAngle};
pub use pipeline::{FrameOutcome, FramePipeline};
pub use report::{DecodeEvent, DecodeReporter};
pub use rotation::rotate;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
