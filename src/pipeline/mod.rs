//! Frame pipeline controller.
//!
//! Each frame moves through
//!
//! ```text
//! Received → Validated → Extracted → Rotated → Decoding
//!     ↓                                          ↓
//!     ↓                     Decoded | NotRecognized | Failed
//!     ↓                                          ↓
//!     └──────────────────→ Released ←────────────┘
//! ```
//!
//! Every path ends in `Released`: the frame goes back to the camera
//! exactly once, whatever the outcome.

mod controller;
mod guard;
mod state;
mod stats;

pub use controller::FramePipeline;
pub use guard::FrameGuard;
pub use state::{FrameOutcome, FrameState};
pub use stats::PipelineStats;
