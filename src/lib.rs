//! Juggling throw tracker.
//!
//! Per-frame ball detections go through an [`IdentityTracker`] that keeps a
//! persistent id per ball, then through an [`ApexEvaluator`] that scores each
//! throw's highest point against a target height band exactly once.

pub mod clock;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod integration;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Settings;
pub use error::{Error, Result};
pub use evaluator::{
    ApexEvaluator, EvaluatorConfig, FeedbackSink, ThrowOutcome, ThrowStats, append_statistics,
};
pub use integration::{DetectionSource, ReplayDetector, ThrowPipeline, run_replay};
pub use tracker::{BoundingBox, Centroid, IdentityTracker, TrackedBall, TrackerConfig};
