//! Camera input and frame handling.
//!
//! This module models the camera collaborator: the frames it delivers,
//! the release contract for handing them back, and a mock camera used
//! by tests and the demo binary.

mod camera;
mod config;
mod frame;

pub use camera::{Camera, CameraError, MockCamera, MockFrame, ReleaseLedger};
pub use config::{
    CaptureConfig, ConfigError, DecoderConfig, DecoderKind, FileConfig, OrientationConfig,
    OutputConfig,
};
pub use frame::{Frame, PixelFormat, Plane, ReleaseError};
