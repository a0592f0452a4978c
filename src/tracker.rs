mod identity_tracker;
mod matching;
mod rect;
mod tracked_ball;

pub use identity_tracker::{IdentityTracker, TrackerConfig};
pub use matching::{AssignmentResult, AssignmentStrategy, ReacquisitionPolicy};
pub use matching::{distance_matrix, gate, greedy_assignment, optimal_assignment};
pub use rect::{BoundingBox, Centroid, centroid_distance};
pub use tracked_ball::TrackedBall;
