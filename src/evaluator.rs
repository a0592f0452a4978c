//! Apex detection, throw scoring and feedback bookkeeping.

mod apex_evaluator;
mod feedback;
mod statistics;
mod target_band;
mod throw_state;

pub use apex_evaluator::{ApexEvaluator, EvaluatorConfig};
pub use feedback::{
    Color, FeedbackMarker, FeedbackSink, LogFeedbackSink, MARKER_DISPLAY_TIME, NullFeedbackSink,
    Tone,
};
pub use statistics::{ThrowStats, append_statistics};
pub use target_band::TargetBand;
pub use throw_state::{ScoreTrigger, ThrowOutcome, ThrowState};
