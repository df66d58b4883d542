//! Lock-free holder of the current target rotation.

use super::RotationAngle;
use crate::capture::{ConfigError, OrientationConfig};
use std::sync::atomic::{AtomicU8, Ordering};

/// Tracks the rotation the luminance plane needs to appear upright.
///
/// The orientation sensor callback writes, the frame pipeline reads once
/// per frame. The value is a single byte so reads never observe a
/// partially updated angle.
#[derive(Debug)]
pub struct OrientationTracker {
    /// Current target rotation in quarter turns.
    quarter_turns: AtomicU8,
    /// Sensor mounting rotation in quarter turns.
    sensor_turns: u8,
}

impl OrientationTracker {
    /// Creates a tracker for a sensor mounted at `sensor_orientation`.
    ///
    /// The initial target assumes the device is in its natural
    /// orientation.
    pub fn new(sensor_orientation: RotationAngle) -> Self {
        Self {
            quarter_turns: AtomicU8::new(sensor_orientation.quarter_turns()),
            sensor_turns: sensor_orientation.quarter_turns(),
        }
    }

    /// Creates a tracker from configuration.
    pub fn from_config(config: &OrientationConfig) -> Result<Self, ConfigError> {
        let sensor = RotationAngle::from_degrees(config.sensor_orientation)
            .ok_or(ConfigError::InvalidSensorOrientation(config.sensor_orientation))?;
        let tracker = Self::new(sensor);
        tracker.on_device_orientation(config.initial_device_orientation);
        Ok(tracker)
    }

    /// Reads the current target rotation.
    #[inline]
    pub fn current(&self) -> RotationAngle {
        RotationAngle::from_quarter_turns(i32::from(self.quarter_turns.load(Ordering::Acquire)))
    }

    /// Overrides the target rotation.
    pub fn set(&self, angle: RotationAngle) {
        let previous = self.quarter_turns.swap(angle.quarter_turns(), Ordering::AcqRel);
        if previous != angle.quarter_turns() {
            tracing::info!(rotation = %angle, "Target rotation changed");
        }
    }

    /// Sensor mounting rotation.
    pub fn sensor_orientation(&self) -> RotationAngle {
        RotationAngle::from_quarter_turns(i32::from(self.sensor_turns))
    }

    /// Handles a device orientation update in degrees.
    ///
    /// Values are quantized to the nearest quarter turn. Negative values
    /// mean the sensor could not determine an orientation (device lying
    /// flat) and leave the current target unchanged.
    ///
    /// Returns the target rotation in effect after the update.
    pub fn on_device_orientation(&self, degrees: i32) -> RotationAngle {
        match quantize(degrees) {
            Some(device) => {
                let target = self.sensor_orientation().then(device);
                self.set(target);
                target
            }
            None => {
                tracing::trace!(degrees, "Ignoring unknown device orientation");
                self.current()
            }
        }
    }
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self::new(RotationAngle::Deg90)
    }
}

/// Quantizes a device orientation in degrees to the nearest quarter turn.
///
/// Returns `None` for negative (unknown) orientations.
pub fn quantize(degrees: i32) -> Option<RotationAngle> {
    if degrees < 0 {
        return None;
    }
    Some(RotationAngle::from_quarter_turns((degrees % 360 + 45) / 90))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_quantize_nearest_quarter() {
        assert_eq!(quantize(0), Some(RotationAngle::Deg0));
        assert_eq!(quantize(44), Some(RotationAngle::Deg0));
        assert_eq!(quantize(45), Some(RotationAngle::Deg90));
        assert_eq!(quantize(134), Some(RotationAngle::Deg90));
        assert_eq!(quantize(135), Some(RotationAngle::Deg180));
        assert_eq!(quantize(260), Some(RotationAngle::Deg270));
        assert_eq!(quantize(350), Some(RotationAngle::Deg0));
        assert_eq!(quantize(720), Some(RotationAngle::Deg0));
        assert_eq!(quantize(-1), None);
    }

    #[test]
    fn test_default_targets_sensor_orientation() {
        let tracker = OrientationTracker::default();
        assert_eq!(tracker.current(), RotationAngle::Deg90);
    }

    #[test]
    fn test_device_rotation_adds_to_sensor() {
        let tracker = OrientationTracker::new(RotationAngle::Deg90);

        assert_eq!(tracker.on_device_orientation(90), RotationAngle::Deg180);
        assert_eq!(tracker.current(), RotationAngle::Deg180);

        assert_eq!(tracker.on_device_orientation(270), RotationAngle::Deg0);
        assert_eq!(tracker.current(), RotationAngle::Deg0);
    }

    #[test]
    fn test_unknown_orientation_keeps_value() {
        let tracker = OrientationTracker::new(RotationAngle::Deg0);
        tracker.on_device_orientation(180);
        assert_eq!(tracker.on_device_orientation(-1), RotationAngle::Deg180);
    }

    #[test]
    fn test_from_config() {
        let config = OrientationConfig {
            sensor_orientation: 270,
            initial_device_orientation: 90,
        };
        let tracker = OrientationTracker::from_config(&config).unwrap();
        assert_eq!(tracker.sensor_orientation(), RotationAngle::Deg270);
        assert_eq!(tracker.current(), RotationAngle::Deg0);

        let bad = OrientationConfig {
            sensor_orientation: 30,
            ..Default::default()
        };
        assert!(OrientationTracker::from_config(&bad).is_err());
    }

    #[test]
    fn test_concurrent_updates_always_valid() {
        let tracker = Arc::new(OrientationTracker::new(RotationAngle::Deg0));
        let writer = {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    tracker.on_device_orientation((i * 90) % 360);
                }
            })
        };

        for _ in 0..1000 {
            let angle = tracker.current();
            assert!(RotationAngle::ALL.contains(&angle));
        }
        writer.join().unwrap();
    }
}
