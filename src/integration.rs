//! Integration module for connecting detection backends with the tracker and
//! the apex evaluator.
//!
//! This module provides the detection trait, an end-to-end pipeline and a
//! replay source for recorded detections.

mod detector;
mod pipeline;
mod replay;

pub use detector::DetectionSource;
pub use pipeline::ThrowPipeline;
pub use replay::{ReplayDetector, ReplayFrame, run_replay};
