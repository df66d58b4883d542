//! Capture and pipeline configuration.
//!
//! Settings are loaded from an optional TOML file. Every table is
//! optional and falls back to defaults that describe a portrait
//! handset with a back camera mounted at 90 degrees.

use super::PixelFormat;
use crate::decode::Symbology;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for camera capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Pixel format delivered for regular frames.
    pub pixel_format: PixelFormat,
    /// Extra bytes at the end of every luma row (row stride minus width).
    pub row_padding: u32,
    /// Deliver every Nth frame in `unsupported_format` (0 disables).
    pub unsupported_every: u32,
    /// Format used for the interleaved unsupported frames.
    pub unsupported_format: PixelFormat,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            fps: 30,
            pixel_format: PixelFormat::Yuv420,
            row_padding: 0,
            unsupported_every: 0,
            unsupported_format: PixelFormat::Nv21,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// Frame rate outside 1-120 fps.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// Sensor orientation is not a quarter turn.
    #[error("sensor orientation {0} is not a multiple of 90 degrees")]
    InvalidSensorOrientation(i32),
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[capture]` table.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// `[orientation]` table.
    #[serde(default)]
    pub orientation: OrientationConfig,
    /// `[decoder]` table.
    #[serde(default)]
    pub decoder: DecoderConfig,
    /// `[output]` table.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Orientation tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Clockwise angle the sensor image must be rotated by to appear
    /// upright when the device is in its natural orientation.
    pub sensor_orientation: i32,
    /// Device orientation assumed until the first sensor update.
    pub initial_device_orientation: i32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            sensor_orientation: 90,
            initial_device_orientation: 0,
        }
    }
}

impl OrientationConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_orientation % 90 != 0 {
            return Err(ConfigError::InvalidSensorOrientation(
                self.sensor_orientation,
            ));
        }
        Ok(())
    }
}

/// Which decoder collaborator the binary wires into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderKind {
    /// Scripted decoder, see [`crate::decode::MockDecoder`].
    Mock,
    /// QR decoder backed by `rqrr` (requires the `qr` feature).
    Qr,
}

/// Decoder collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Decoder wired into the pipeline.
    pub kind: DecoderKind,
    /// Mock decoder recognizes every Nth frame (0 never recognizes).
    pub recognize_every: u32,
    /// Payload reported by the mock decoder.
    pub payload: String,
    /// Symbology reported by the mock decoder.
    pub symbology: Symbology,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            kind: DecoderKind::Mock,
            recognize_every: 10,
            payload: "4006381333931".to_string(),
            symbology: Symbology::Ean13,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run continuously (true) or process fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 100,
            metrics_port: 9090,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.orientation.validate()
    }
}
