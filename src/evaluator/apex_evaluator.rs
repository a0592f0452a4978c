//! Throw apex detection and scoring.
//!
//! Consumes the tracker's per-frame mapping, scores each ball once when it is
//! first seen falling (or when it vanishes while still rising), and renders
//! markers, the target band and running counters through a [`FeedbackSink`].

use std::collections::BTreeMap;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::evaluator::feedback::{FeedbackMarker, FeedbackSink, Tone};
use crate::evaluator::statistics::ThrowStats;
use crate::evaluator::target_band::TargetBand;
use crate::evaluator::throw_state::{ScoreTrigger, ThrowOutcome, ThrowState};
use crate::tracker::{Centroid, TrackedBall};

/// Where the counters text is anchored.
const COUNTER_TEXT_POSITION: (i32, i32) = (0, 15);

/// Configuration for the ApexEvaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub band_start_y: i32,
    pub band_length: i32,
    /// Width of the boundary drawn for the band, normally the frame width.
    pub frame_width: i32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            band_start_y: 72,
            band_length: 28,
            frame_width: 512,
        }
    }
}

/// Scores every tracked ball once, by whether its apex lies in the target band.
pub struct ApexEvaluator<C: Clock = SystemClock> {
    throws: BTreeMap<u64, ThrowState>,
    markers: BTreeMap<u64, FeedbackMarker>,
    stats: ThrowStats,
    band: TargetBand,
    frame_width: i32,
    clock: C,
}

impl ApexEvaluator<SystemClock> {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> ApexEvaluator<C> {
    pub fn with_clock(config: EvaluatorConfig, clock: C) -> Self {
        Self {
            throws: BTreeMap::new(),
            markers: BTreeMap::new(),
            stats: ThrowStats::default(),
            band: TargetBand::new(config.band_start_y, config.band_length),
            frame_width: config.frame_width,
            clock,
        }
    }

    pub fn stats(&self) -> ThrowStats {
        self.stats
    }

    pub fn successes(&self) -> u64 {
        self.stats.successes
    }

    pub fn failures(&self) -> u64 {
        self.stats.failures
    }

    pub fn band(&self) -> TargetBand {
        self.band
    }

    /// Move the target band up (negative) or down (positive).
    pub fn shift_band(&mut self, delta: i32) {
        self.band.shift(delta);
    }

    /// Grow or shrink the target band; its length never drops below zero.
    pub fn resize_band(&mut self, delta: i32) {
        self.band.resize(delta);
    }

    /// Throw state of a ball, `None` if it has never been seen or has been
    /// dropped after leaving the tracker.
    pub fn throw_state(&self, id: u64) -> Option<ThrowState> {
        self.throws.get(&id).copied()
    }

    /// Markers still on screen as of the last update, keyed by ball id.
    pub fn markers(&self) -> &BTreeMap<u64, FeedbackMarker> {
        &self.markers
    }

    /// Forget all throws, markers and counters.
    ///
    /// Call together with the tracker's reset, since tracker ids restart.
    pub fn reset(&mut self) {
        self.throws.clear();
        self.markers.clear();
        self.stats = ThrowStats::default();
    }

    /// Evaluate one frame of tracker output and render feedback.
    pub fn update<S>(
        &mut self,
        tracked: &BTreeMap<u64, TrackedBall>,
        sink: &mut S,
    ) -> Vec<ThrowOutcome>
    where
        S: FeedbackSink + ?Sized,
    {
        let now = self.clock.now();
        let mut outcomes = Vec::new();

        for (&id, ball) in tracked {
            let state = self.throws.entry(id).or_insert(ThrowState::Pending {
                apex: ball.apex_centroid,
            });
            match state {
                ThrowState::Scored => continue,
                ThrowState::Pending { apex } => {
                    *apex = ball.apex_centroid;
                    if !ball.is_falling {
                        continue;
                    }
                }
            }
            *state = ThrowState::Scored;
            outcomes.push(self.score(id, ball.apex_centroid, ScoreTrigger::Fell, now, sink));
        }

        let gone: Vec<u64> = self
            .throws
            .keys()
            .filter(|id| !tracked.contains_key(id))
            .copied()
            .collect();
        for id in gone {
            if let Some(ThrowState::Pending { apex }) = self.throws.remove(&id) {
                outcomes.push(self.score(id, apex, ScoreTrigger::Disappeared, now, sink));
            }
        }

        self.render(now, sink);
        outcomes
    }

    fn score<S>(
        &mut self,
        id: u64,
        apex: Centroid,
        trigger: ScoreTrigger,
        now: Duration,
        sink: &mut S,
    ) -> ThrowOutcome
    where
        S: FeedbackSink + ?Sized,
    {
        let is_successful = self.band.contains(apex.y);
        self.stats.record(is_successful);
        sink.play_tone(Tone::for_outcome(is_successful));
        self.markers.insert(
            id,
            FeedbackMarker {
                position: apex,
                is_successful,
                created_at: now,
            },
        );

        log::info!(
            "ball {id} apex y={} {} ({:?}), band {}..={}, {}",
            apex.y,
            if is_successful { "success" } else { "failure" },
            trigger,
            self.band.start_y(),
            self.band.end_y(),
            self.stats.summary()
        );

        ThrowOutcome {
            id,
            apex,
            is_successful,
            trigger,
        }
    }

    fn render<S>(&mut self, now: Duration, sink: &mut S)
    where
        S: FeedbackSink + ?Sized,
    {
        self.markers.retain(|_, marker| !marker.is_expired(now));
        for marker in self.markers.values() {
            sink.draw_marker(marker.position, marker.color());
        }

        sink.draw_boundary(self.band.start_y(), self.band.length(), self.frame_width);

        let (x, y) = COUNTER_TEXT_POSITION;
        sink.draw_text(&self.stats.summary(), Centroid::new(x, y));
    }
}
