use crate::tracker::Centroid;

/// Evaluation state of one tracked ball's throw.
///
/// A ball is implicitly unseen until it first appears in the tracker output,
/// then stays pending while rising and is scored exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowState {
    /// Seen and still rising; holds the highest point reached so far
    Pending { apex: Centroid },
    /// Outcome recorded, terminal
    Scored,
}

/// What caused a pending throw to be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTrigger {
    /// The ball was observed moving downward
    Fell,
    /// The tracker dropped the ball before it was seen falling
    Disappeared,
}

/// A scored throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrowOutcome {
    pub id: u64,
    pub apex: Centroid,
    pub is_successful: bool,
    pub trigger: ScoreTrigger,
}
