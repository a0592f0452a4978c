//! ThrowPipeline for combining detection, tracking and scoring.

use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::evaluator::{ApexEvaluator, EvaluatorConfig, FeedbackSink, ThrowOutcome};
use crate::tracker::{BoundingBox, IdentityTracker, TrackerConfig};

use super::DetectionSource;

/// Bundles a `DetectionSource` with the tracker and the apex evaluator.
///
/// One call to [`ThrowPipeline::process_frame`] runs detection, advances the
/// tracker by one frame and evaluates the result, in that order.
pub struct ThrowPipeline<D: DetectionSource, C: Clock = SystemClock> {
    detector: D,
    tracker: IdentityTracker<C>,
    evaluator: ApexEvaluator<C>,
}

impl<D: DetectionSource> ThrowPipeline<D, SystemClock> {
    /// Create a pipeline driven by wall-clock time.
    pub fn new(detector: D, tracker_config: TrackerConfig, evaluator_config: EvaluatorConfig) -> Self {
        Self::with_clock(detector, tracker_config, evaluator_config, SystemClock::new())
    }
}

impl<D: DetectionSource, C: Clock + Clone> ThrowPipeline<D, C> {
    /// Create a pipeline whose tracker and evaluator share `clock`.
    pub fn with_clock(
        detector: D,
        tracker_config: TrackerConfig,
        evaluator_config: EvaluatorConfig,
        clock: C,
    ) -> Self {
        Self {
            detector,
            tracker: IdentityTracker::with_clock(tracker_config, clock.clone()),
            evaluator: ApexEvaluator::with_clock(evaluator_config, clock),
        }
    }

    pub fn from_settings(detector: D, settings: &Settings, clock: C) -> Self {
        Self::with_clock(
            detector,
            settings.tracker_config(),
            settings.evaluator_config(),
            clock,
        )
    }
}

impl<D: DetectionSource, C: Clock> ThrowPipeline<D, C> {
    /// Process a single frame and return the throws scored in it.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `sink` - Receives this frame's markers, boundary, counters and cues
    pub fn process_frame<S>(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        sink: &mut S,
    ) -> Result<Vec<ThrowOutcome>, D::Error>
    where
        S: FeedbackSink + ?Sized,
    {
        let detections = self.detector.detect(input, width, height)?;
        Ok(self.process_detections(&detections, sink))
    }

    /// Track and evaluate boxes produced outside the pipeline's detector.
    pub fn process_detections<S>(&mut self, detections: &[BoundingBox], sink: &mut S) -> Vec<ThrowOutcome>
    where
        S: FeedbackSink + ?Sized,
    {
        let tracked = self.tracker.update(detections);
        self.evaluator.update(tracked, sink)
    }

    /// Restart tracking and scoring from scratch.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.evaluator.reset();
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn tracker(&self) -> &IdentityTracker<C> {
        &self.tracker
    }

    pub fn evaluator(&self) -> &ApexEvaluator<C> {
        &self.evaluator
    }

    /// Mutable access to the evaluator, e.g. to move or resize the band.
    pub fn evaluator_mut(&mut self) -> &mut ApexEvaluator<C> {
        &mut self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::evaluator::NullFeedbackSink;
    use std::collections::VecDeque;

    struct MockDetector {
        frames: VecDeque<Vec<BoundingBox>>,
    }

    impl DetectionSource for MockDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<BoundingBox>, Self::Error> {
            Ok(self.frames.pop_front().unwrap_or_default())
        }
    }

    fn at(y: i32) -> BoundingBox {
        BoundingBox::from_center(200, y, 12, 12)
    }

    #[test]
    fn test_pipeline_scores_a_throw() {
        let detector = MockDetector {
            frames: VecDeque::from(vec![vec![at(120)], vec![at(90)], vec![at(80)], vec![at(95)]]),
        };
        let clock = ManualClock::new();
        let mut pipeline = ThrowPipeline::with_clock(
            detector,
            TrackerConfig::default(),
            EvaluatorConfig {
                band_start_y: 70,
                band_length: 20,
                frame_width: 640,
            },
            clock.clone(),
        );

        let mut outcomes = Vec::new();
        for _ in 0..4 {
            outcomes.extend(pipeline.process_frame(&[], 640, 480, &mut NullFeedbackSink).unwrap());
            clock.advance_secs(1.0 / 30.0);
        }

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].apex.y, 80);
        assert!(outcomes[0].is_successful);
        assert_eq!(pipeline.evaluator().successes(), 1);
    }

    #[test]
    fn test_pipeline_reset() {
        let detector = MockDetector {
            frames: VecDeque::from(vec![vec![at(120)]]),
        };
        let mut pipeline = ThrowPipeline::with_clock(
            detector,
            TrackerConfig::default(),
            EvaluatorConfig::default(),
            ManualClock::new(),
        );
        pipeline.process_frame(&[], 640, 480, &mut NullFeedbackSink).unwrap();
        assert_eq!(pipeline.tracker().tracked().len(), 1);

        pipeline.reset();
        assert!(pipeline.tracker().tracked().is_empty());
        assert_eq!(pipeline.tracker().next_id(), 0);
        assert_eq!(pipeline.evaluator().stats().total(), 0);
    }
}
