use std::time::Duration;

use juggle_apex::{BoundingBox, Centroid, IdentityTracker, ManualClock, TrackerConfig};

const FRAME: f64 = 1.0 / 30.0;

fn ball_box(x: i32, y: i32) -> BoundingBox {
    BoundingBox::new(x - 8, y - 8, x + 8, y + 8)
}

fn tracker() -> (IdentityTracker<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let config = TrackerConfig {
        reacquisition_distance: 50.0,
        max_disappeared_time: Duration::from_millis(200),
        ..TrackerConfig::default()
    };
    (IdentityTracker::with_clock(config, clock.clone()), clock)
}

#[test]
fn test_identity_is_stable_along_a_throw() {
    let (mut tracker, clock) = tracker();
    let heights = [300, 260, 228, 204, 188, 180, 180, 188, 204, 228, 260, 300];

    let first = tracker.update(&[ball_box(200, heights[0])]);
    let id = *first.keys().next().unwrap();

    for &y in &heights[1..] {
        clock.advance_secs(FRAME);
        let tracked = tracker.update(&[ball_box(200, y)]);
        assert_eq!(tracked.len(), 1);
        assert!(tracked.contains_key(&id));
        assert_eq!(tracked[&id].centroid, Centroid::new(200, y));
    }
}

#[test]
fn test_falling_flag_never_reverts() {
    let (mut tracker, clock) = tracker();
    let heights = [300, 260, 240, 250, 245, 270, 265, 300];
    let mut seen_falling = false;

    tracker.update(&[ball_box(200, heights[0])]);
    for &y in &heights[1..] {
        clock.advance_secs(FRAME);
        let tracked = tracker.update(&[ball_box(200, y)]);
        let ball = &tracked[&0];
        if seen_falling {
            assert!(ball.is_falling, "ball stopped falling at y={y}");
        }
        seen_falling |= ball.is_falling;
    }
    assert!(seen_falling);
    assert_eq!(tracker.tracked()[&0].apex_centroid.y, 240);
}

#[test]
fn test_unmatched_detection_gets_next_id() {
    let (mut tracker, clock) = tracker();
    tracker.update(&[ball_box(100, 100), ball_box(400, 100)]);

    clock.advance_secs(FRAME);
    let tracked = tracker.update(&[ball_box(100, 105), ball_box(400, 105), ball_box(700, 300)]);
    let max_before = 1;
    assert_eq!(tracked.len(), 3);
    assert!(tracked.contains_key(&(max_before + 1)));
    assert_eq!(tracked[&(max_before + 1)].centroid, Centroid::new(700, 300));
}

#[test]
fn test_ids_are_never_reused() {
    let (mut tracker, clock) = tracker();
    tracker.update(&[ball_box(100, 100)]);

    clock.advance_secs(1.0);
    assert!(tracker.update(&[]).is_empty());

    let tracked = tracker.update(&[ball_box(100, 100)]);
    assert_eq!(tracked.keys().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_disappeared_ball_is_pruned_after_window() {
    let (mut tracker, clock) = tracker();
    tracker.update(&[ball_box(100, 100)]);

    clock.advance_secs(0.1);
    assert_eq!(tracker.update(&[]).len(), 1);

    clock.advance_secs(0.1);
    assert_eq!(tracker.update(&[]).len(), 1, "exactly at the window edge the ball survives");

    clock.advance_secs(0.05);
    assert!(tracker.update(&[]).is_empty());
}

#[test]
fn test_closer_identity_wins_contested_detection() {
    let (mut tracker, clock) = tracker();
    let first = tracker.update(&[ball_box(100, 50), ball_box(100, 52)]);
    assert_eq!(first.len(), 2);

    clock.advance_secs(FRAME);
    let tracked = tracker.update(&[ball_box(100, 80)]);
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[&1].centroid, Centroid::new(100, 80));
    assert_eq!(tracked[&0].centroid, Centroid::new(100, 50));
    assert!(tracked[&0].disappeared_at.is_some());

    // The unmatched ball is dropped once its disappearance window elapses
    clock.advance_secs(0.19);
    let tracked = tracker.update(&[ball_box(100, 90)]);
    assert!(!tracked.contains_key(&0));
    assert!(tracked.contains_key(&1));
}

#[test]
fn test_falling_ball_does_not_take_rising_detection() {
    let (mut tracker, clock) = tracker();
    tracker.update(&[ball_box(200, 100)]);
    clock.advance_secs(FRAME);
    let tracked = tracker.update(&[ball_box(200, 120)]);
    assert!(tracked[&0].is_falling);

    // A second ball crossing upward right next to the falling one
    clock.advance_secs(FRAME);
    let tracked = tracker.update(&[ball_box(205, 110)]);
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[&0].centroid, Centroid::new(200, 120));
    assert_eq!(tracked[&1].centroid, Centroid::new(205, 110));
}

#[test]
fn test_malformed_boxes_keep_tracker_usable() {
    let (mut tracker, clock) = tracker();
    tracker.update(&[BoundingBox::new(300, 300, 100, 100), BoundingBox::new(i32::MIN, 0, i32::MIN, 0)]);

    clock.advance_secs(FRAME);
    let tracked = tracker.update(&[BoundingBox::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX)]);
    assert_eq!(tracked.len(), 3);

    clock.advance_secs(FRAME);
    let tracked = tracker.update(&[ball_box(200, 205)]);
    assert_eq!(tracked[&0].centroid, Centroid::new(200, 205));
}
