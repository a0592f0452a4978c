/// Vertical pixel range in which a throw's apex counts as a success.
///
/// The band spans `start_y..=start_y + length`; both edges are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBand {
    start_y: i32,
    length: i32,
}

impl TargetBand {
    /// Negative lengths are clamped to zero.
    pub fn new(start_y: i32, length: i32) -> Self {
        Self {
            start_y,
            length: length.max(0),
        }
    }

    pub fn start_y(&self) -> i32 {
        self.start_y
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn end_y(&self) -> i32 {
        self.start_y.saturating_add(self.length)
    }

    pub fn contains(&self, y: i32) -> bool {
        self.start_y <= y && y <= self.end_y()
    }

    /// Move the band up (negative) or down (positive).
    pub fn shift(&mut self, delta: i32) {
        self.start_y = self.start_y.saturating_add(delta);
    }

    /// Grow or shrink the band, never below zero length.
    pub fn resize(&mut self, delta: i32) {
        self.length = self.length.saturating_add(delta).max(0);
    }
}
