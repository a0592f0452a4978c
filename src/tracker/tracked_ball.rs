//! Single tracked juggling ball.

use std::time::Duration;

use crate::tracker::rect::Centroid;

/// Tracked identity of one ball across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedBall {
    /// Unique identifier, never reused within a tracker's lifetime
    pub id: u64,
    /// Latest matched position
    pub centroid: Centroid,
    /// Highest point (smallest y) reached before the ball started falling
    pub apex_centroid: Centroid,
    /// Set once the ball moves downward; never cleared
    pub is_falling: bool,
    /// Frame time of the most recent successful match
    pub last_seen: Duration,
    /// Frame time of the first unmatched frame since the last match
    pub disappeared_at: Option<Duration>,
}

impl TrackedBall {
    /// Create a newly registered, rising ball.
    pub fn new(id: u64, centroid: Centroid, now: Duration) -> Self {
        Self {
            id,
            centroid,
            apex_centroid: centroid,
            is_falling: false,
            last_seen: now,
            disappeared_at: None,
        }
    }

    /// Apply a matched detection.
    ///
    /// The apex only moves while rising, and the falling flag is sticky.
    pub fn update(&mut self, centroid: Centroid, now: Duration) {
        let previous = self.centroid;
        if !self.is_falling && centroid.y < self.apex_centroid.y {
            self.apex_centroid = centroid;
        }
        self.is_falling = self.is_falling || previous.y < centroid.y;
        self.centroid = centroid;
        self.last_seen = now;
        self.disappeared_at = None;
    }

    /// Note a frame without a matching detection.
    pub fn mark_missed(&mut self, now: Duration) {
        if self.disappeared_at.is_none() {
            self.disappeared_at = Some(now);
        }
    }

    /// Whether the ball has gone unmatched for longer than `window`.
    pub fn is_expired(&self, now: Duration, window: Duration) -> bool {
        now.saturating_sub(self.last_seen) > window
    }

    /// Time since the ball was first missed, zero while it is being matched.
    pub fn time_since_disappeared(&self, now: Duration) -> Duration {
        self.disappeared_at
            .map(|since| now.saturating_sub(since))
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_new_ball_is_rising_at_its_apex() {
        let ball = TrackedBall::new(3, Centroid::new(10, 200), ms(0));
        assert_eq!(ball.apex_centroid, ball.centroid);
        assert!(!ball.is_falling);
        assert_eq!(ball.disappeared_at, None);
    }

    #[test]
    fn test_apex_follows_rise_then_freezes() {
        let mut ball = TrackedBall::new(0, Centroid::new(100, 200), ms(0));
        ball.update(Centroid::new(100, 150), ms(33));
        ball.update(Centroid::new(100, 120), ms(66));
        assert_eq!(ball.apex_centroid, Centroid::new(100, 120));
        assert!(!ball.is_falling);

        ball.update(Centroid::new(100, 130), ms(99));
        assert!(ball.is_falling);
        assert_eq!(ball.apex_centroid, Centroid::new(100, 120));

        // A noisy upward blip after falling must not move the apex or clear the flag
        ball.update(Centroid::new(100, 110), ms(132));
        assert!(ball.is_falling);
        assert_eq!(ball.apex_centroid, Centroid::new(100, 120));
    }

    #[test]
    fn test_level_movement_is_not_falling() {
        let mut ball = TrackedBall::new(0, Centroid::new(100, 200), ms(0));
        ball.update(Centroid::new(120, 200), ms(33));
        assert!(!ball.is_falling);
    }

    #[test]
    fn test_missed_keeps_first_timestamp_until_rematched() {
        let mut ball = TrackedBall::new(0, Centroid::new(0, 0), ms(0));
        ball.mark_missed(ms(10));
        ball.mark_missed(ms(20));
        assert_eq!(ball.disappeared_at, Some(ms(10)));
        assert_eq!(ball.time_since_disappeared(ms(50)), ms(40));

        ball.update(Centroid::new(0, 0), ms(60));
        assert_eq!(ball.disappeared_at, None);
        assert_eq!(ball.time_since_disappeared(ms(70)), Duration::ZERO);
    }

    #[test]
    fn test_expiry_is_strictly_after_window() {
        let ball = TrackedBall::new(0, Centroid::new(0, 0), ms(100));
        assert!(!ball.is_expired(ms(300), ms(200)));
        assert!(ball.is_expired(ms(301), ms(200)));
    }
}
