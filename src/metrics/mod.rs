//! Prometheus metrics exporter for pipeline monitoring.
//!
//! # Metrics Exposed
//!
//! ## Frame Outcomes
//! - `luma_reorient_frames_total` - Frames handed to the pipeline
//! - `luma_reorient_frames_skipped_total` - Frames skipped before rotation
//! - `luma_reorient_frames_malformed_total` - Skipped frames with a malformed luma plane
//! - `luma_reorient_frames_decoded_total` - Frames that produced a decode event
//! - `luma_reorient_frames_not_recognized_total` - Frames without a barcode
//! - `luma_reorient_frames_failed_total` - Frames the decoder failed on
//!
//! ## Contract Violations
//! - `luma_reorient_release_failures_total` - Frames the camera refused to take back
//!
//! ## Orientation
//! - `luma_reorient_rotation_degrees` - Rotation applied to the latest frame
//!
//! With the `metrics` feature, `MetricsServer` also serves the latest
//! snapshot as JSON on `/stats` and reports `/health` as unhealthy once
//! any frame release has failed.
//!
//! # Example
//!
//! ```no_run
//! use luma_reorient::metrics::{MetricsRegistry, MetricsSnapshot};
//! use luma_reorient::pipeline::PipelineStats;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let stats = PipelineStats::default();
//! registry.update(&MetricsSnapshot::from_stats(&stats));
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsState, ServerError, SharedMetrics};
