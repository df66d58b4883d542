//! Luminance plane reorientation.
//!
//! Camera sensors deliver frames in a fixed mounting orientation; this
//! module turns the extracted luminance plane by quarter turns so that
//! the decoder sees it upright.

mod rotator;

pub use rotator::{remap, rotate, rotate_degrees};
