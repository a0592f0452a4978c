//! Centroid tracker assigning persistent identities to juggling balls.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::tracker::matching::{
    self, AssignmentResult, AssignmentStrategy, ReacquisitionPolicy,
};
use crate::tracker::rect::{BoundingBox, Centroid};
use crate::tracker::tracked_ball::TrackedBall;

/// Configuration for the IdentityTracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Maximum pixel distance at which a detection can be matched to a ball.
    pub reacquisition_distance: f64,
    /// How long a ball may go unmatched before it is deregistered.
    pub max_disappeared_time: Duration,
    pub reacquisition: ReacquisitionPolicy,
    pub assignment: AssignmentStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            reacquisition_distance: 50.0,
            max_disappeared_time: Duration::from_millis(200),
            reacquisition: ReacquisitionPolicy::Static,
            assignment: AssignmentStrategy::Greedy,
        }
    }
}

/// Centroid tracker that keeps a stable id for each ball across frames.
///
/// Ids are handed out in increasing order and never reused until [`reset`].
///
/// [`reset`]: IdentityTracker::reset
pub struct IdentityTracker<C: Clock = SystemClock> {
    balls: BTreeMap<u64, TrackedBall>,
    next_id: u64,
    config: TrackerConfig,
    clock: C,
}

impl IdentityTracker<SystemClock> {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> IdentityTracker<C> {
    pub fn with_clock(config: TrackerConfig, clock: C) -> Self {
        Self {
            balls: BTreeMap::new(),
            next_id: 0,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Currently tracked balls, ordered by id (oldest first).
    pub fn tracked(&self) -> &BTreeMap<u64, TrackedBall> {
        &self.balls
    }

    /// Id the next registered ball will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Drop all identities and restart id numbering.
    pub fn reset(&mut self) {
        self.balls.clear();
        self.next_id = 0;
    }

    /// Advance the tracker by one frame of detections.
    pub fn update(&mut self, detections: &[BoundingBox]) -> &BTreeMap<u64, TrackedBall> {
        let now = self.clock.now();

        // Step 1: Forget balls that have been missing for too long
        self.deregister_expired(now);

        let centroids: Vec<Centroid> = detections.iter().map(BoundingBox::centroid).collect();

        // Step 2: Nothing to match against, every detection is a new ball
        if self.balls.is_empty() {
            for centroid in centroids {
                self.register(centroid, now);
            }
            return &self.balls;
        }

        if centroids.is_empty() {
            for ball in self.balls.values_mut() {
                ball.mark_missed(now);
            }
            return &self.balls;
        }

        // Step 3: Gated distance matrix
        let ids: Vec<u64> = self.balls.keys().copied().collect();
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = {
            let balls: Vec<&TrackedBall> = self.balls.values().collect();
            let radii: Vec<f64> = balls
                .iter()
                .map(|ball| self.reacquisition_radius(ball, now))
                .collect();
            let mut dists = matching::distance_matrix(&balls, &centroids);
            matching::gate(&mut dists, &balls, &centroids, &radii);
            self.assign(&dists)
        };

        // Step 4: Apply matches
        for (row, col) in matches {
            if let Some(ball) = self.balls.get_mut(&ids[row]) {
                let previous = ball.centroid;
                ball.update(centroids[col], now);
                log::debug!(
                    "ball {} matched ({}, {}) -> ({}, {}), falling={}",
                    ball.id,
                    previous.x,
                    previous.y,
                    ball.centroid.x,
                    ball.centroid.y,
                    ball.is_falling
                );
            }
        }

        for row in unmatched_tracks {
            if let Some(ball) = self.balls.get_mut(&ids[row]) {
                ball.mark_missed(now);
            }
        }

        // Step 5: Register leftover detections
        for col in unmatched_detections {
            self.register(centroids[col], now);
        }

        &self.balls
    }

    fn register(&mut self, centroid: Centroid, now: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("registered ball {id} at ({}, {})", centroid.x, centroid.y);
        self.balls.insert(id, TrackedBall::new(id, centroid, now));
        id
    }

    fn deregister_expired(&mut self, now: Duration) {
        let window = self.config.max_disappeared_time;
        self.balls.retain(|id, ball| {
            let expired = ball.is_expired(now, window);
            if expired {
                log::debug!(
                    "deregistered ball {id} after {:?} unseen",
                    now.saturating_sub(ball.last_seen)
                );
            }
            !expired
        });
    }

    fn reacquisition_radius(&self, ball: &TrackedBall, now: Duration) -> f64 {
        let distance = self.config.reacquisition_distance;
        match self.config.reacquisition {
            ReacquisitionPolicy::Static => distance,
            ReacquisitionPolicy::Decaying => {
                let missing = ball.time_since_disappeared(now).as_secs_f64();
                let window = self.config.max_disappeared_time.as_secs_f64();
                let scale = if window > 0.0 {
                    1.0 - missing / window
                } else if missing > 0.0 {
                    0.0
                } else {
                    1.0
                };
                distance * scale.max(0.0)
            }
        }
    }

    fn assign(&self, dists: &ndarray::Array2<f64>) -> AssignmentResult {
        match self.config.assignment {
            AssignmentStrategy::Greedy => matching::greedy_assignment(dists),
            AssignmentStrategy::Optimal => matching::optimal_assignment(dists).unwrap_or_else(|e| {
                log::warn!("optimal assignment failed, falling back to greedy: {e}");
                matching::greedy_assignment(dists)
            }),
        }
    }
}
