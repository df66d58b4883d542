//! Device orientation tracking.
//!
//! Keeps the rotation the pipeline must apply to sensor-oriented frames
//! so that the decoder sees the scene the way the user holds the device.

mod angle;
mod tracker;

pub use angle::RotationAngle;
pub use tracker::{quantize, OrientationTracker};
