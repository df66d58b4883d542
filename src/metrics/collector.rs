//! Metrics collection and registry.

use crate::pipeline::PipelineStats;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric creation, registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for metrics update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Frames handed to the pipeline.
    pub frames_received: u64,
    /// Frames skipped before rotation.
    pub frames_skipped: u64,
    /// Skipped frames that were malformed.
    pub frames_malformed: u64,
    /// Frames that produced a decode event.
    pub frames_decoded: u64,
    /// Frames without a recognizable barcode.
    pub frames_not_recognized: u64,
    /// Frames where the decoder failed.
    pub frames_failed: u64,
    /// Frame release contract violations.
    pub release_failures: u64,
    /// Rotation applied to the latest frame, in degrees.
    pub rotation_degrees: Option<u16>,
}

impl MetricsSnapshot {
    /// Creates a snapshot from pipeline counters.
    pub fn from_stats(stats: &PipelineStats) -> Self {
        Self {
            frames_received: stats.frames_received,
            frames_skipped: stats.frames_skipped,
            frames_malformed: stats.frames_malformed,
            frames_decoded: stats.frames_decoded,
            frames_not_recognized: stats.frames_not_recognized,
            frames_failed: stats.frames_failed,
            release_failures: stats.release_failures,
            rotation_degrees: stats.last_rotation.map(|r| r.degrees()),
        }
    }
}

/// Prometheus metrics registry for pipeline monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Frame outcome counters
    frames_total: IntCounter,
    frames_skipped: IntCounter,
    frames_malformed: IntCounter,
    frames_decoded: IntCounter,
    frames_not_recognized: IntCounter,
    frames_failed: IntCounter,

    // Contract violations
    release_failures: IntCounter,

    // Orientation
    rotation_degrees: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all pipeline metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_total = IntCounter::new(
            "luma_reorient_frames_total",
            "Total number of frames handed to the pipeline",
        )?;
        let frames_skipped = IntCounter::new(
            "luma_reorient_frames_skipped_total",
            "Frames skipped before rotation (unsupported or malformed)",
        )?;
        let frames_malformed = IntCounter::new(
            "luma_reorient_frames_malformed_total",
            "Skipped frames whose luma plane did not match the declared geometry",
        )?;
        let frames_decoded = IntCounter::new(
            "luma_reorient_frames_decoded_total",
            "Frames that produced a decode event",
        )?;
        let frames_not_recognized = IntCounter::new(
            "luma_reorient_frames_not_recognized_total",
            "Frames in which the decoder found no barcode",
        )?;
        let frames_failed = IntCounter::new(
            "luma_reorient_frames_failed_total",
            "Frames on which the decoder failed",
        )?;
        let release_failures = IntCounter::new(
            "luma_reorient_release_failures_total",
            "Frame release contract violations reported by the camera",
        )?;
        let rotation_degrees = IntGauge::new(
            "luma_reorient_rotation_degrees",
            "Rotation applied to the most recent frame",
        )?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(frames_skipped.clone()))?;
        registry.register(Box::new(frames_malformed.clone()))?;
        registry.register(Box::new(frames_decoded.clone()))?;
        registry.register(Box::new(frames_not_recognized.clone()))?;
        registry.register(Box::new(frames_failed.clone()))?;
        registry.register(Box::new(release_failures.clone()))?;
        registry.register(Box::new(rotation_degrees.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            frames_skipped,
            frames_malformed,
            frames_decoded,
            frames_not_recognized,
            frames_failed,
            release_failures,
            rotation_degrees,
        })
    }

    /// Updates all metrics from a snapshot of pipeline state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward, by the difference
        advance(&self.frames_total, snapshot.frames_received);
        advance(&self.frames_skipped, snapshot.frames_skipped);
        advance(&self.frames_malformed, snapshot.frames_malformed);
        advance(&self.frames_decoded, snapshot.frames_decoded);
        advance(&self.frames_not_recognized, snapshot.frames_not_recognized);
        advance(&self.frames_failed, snapshot.frames_failed);
        advance(&self.release_failures, snapshot.release_failures);

        if let Some(degrees) = snapshot.rotation_degrees {
            self.rotation_degrees.set(i64::from(degrees));
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}
