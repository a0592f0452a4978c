//! Feedback output: the sink trait the evaluator renders through, and the
//! transient markers it draws at scored apexes.

use std::time::Duration;

use crate::tracker::Centroid;

/// How long a marker stays on screen after its throw is scored.
pub const MARKER_DISPLAY_TIME: Duration = Duration::from_millis(500);

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const SUCCESS: Color = Color::new(0, 255, 0);
    pub const FAILURE: Color = Color::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn for_outcome(is_successful: bool) -> Self {
        if is_successful {
            Self::SUCCESS
        } else {
            Self::FAILURE
        }
    }
}

/// Audio cue played when a throw is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

impl Tone {
    pub fn for_outcome(is_successful: bool) -> Self {
        if is_successful {
            Tone::Success
        } else {
            Tone::Failure
        }
    }

    /// Pitch of the sine tone.
    pub fn frequency_hz(&self) -> f32 {
        match self {
            Tone::Success => 1000.0,
            Tone::Failure => 300.0,
        }
    }

    /// How long the tone plays.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(100)
    }
}

/// Marker drawn at a scored apex until it expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackMarker {
    pub position: Centroid,
    pub is_successful: bool,
    pub created_at: Duration,
}

impl FeedbackMarker {
    pub fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.created_at) > MARKER_DISPLAY_TIME
    }

    pub fn color(&self) -> Color {
        Color::for_outcome(self.is_successful)
    }
}

/// Rendering and audio backend driven by the evaluator.
///
/// Implement this to connect the evaluator to a display and speaker. The
/// evaluator owns no pixel or audio buffers itself.
pub trait FeedbackSink {
    /// Draw a filled dot at a scored apex.
    fn draw_marker(&mut self, position: Centroid, color: Color);

    /// Draw the target band spanning the full frame width.
    fn draw_boundary(&mut self, y: i32, length: i32, width: i32);

    fn draw_text(&mut self, text: &str, position: Centroid);

    fn play_tone(&mut self, tone: Tone);
}

/// Sink that discards everything.
pub struct NullFeedbackSink;

impl FeedbackSink for NullFeedbackSink {
    fn draw_marker(&mut self, _position: Centroid, _color: Color) {}
    fn draw_boundary(&mut self, _y: i32, _length: i32, _width: i32) {}
    fn draw_text(&mut self, _text: &str, _position: Centroid) {}
    fn play_tone(&mut self, _tone: Tone) {}
}

/// Headless sink that reports feedback through the `log` facade.
///
/// Cues are logged at info level, per-frame drawing at trace level.
#[derive(Debug, Default)]
pub struct LogFeedbackSink {
    tones_played: usize,
}

impl LogFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones_played(&self) -> usize {
        self.tones_played
    }
}

impl FeedbackSink for LogFeedbackSink {
    fn draw_marker(&mut self, position: Centroid, color: Color) {
        log::trace!("marker at ({}, {}) {:?}", position.x, position.y, color);
    }

    fn draw_boundary(&mut self, y: i32, length: i32, width: i32) {
        log::trace!("boundary y={y} length={length} width={width}");
    }

    fn draw_text(&mut self, text: &str, _position: Centroid) {
        log::trace!("{text}");
    }

    fn play_tone(&mut self, tone: Tone) {
        self.tones_played += 1;
        log::info!(
            "{:?} tone ({} Hz, {} ms)",
            tone,
            tone.frequency_hz(),
            tone.duration().as_millis()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_expiry_is_strict() {
        let marker = FeedbackMarker {
            position: Centroid::new(0, 0),
            is_successful: true,
            created_at: Duration::from_secs(1),
        };
        assert!(!marker.is_expired(Duration::from_millis(1500)));
        assert!(marker.is_expired(Duration::from_millis(1501)));
    }

    #[test]
    fn test_outcome_colors_and_tones() {
        assert_eq!(Color::for_outcome(true), Color::SUCCESS);
        assert_eq!(Color::for_outcome(false), Color::FAILURE);
        assert_eq!(Tone::for_outcome(true).frequency_hz(), 1000.0);
        assert_eq!(Tone::for_outcome(false).frequency_hz(), 300.0);
        assert_eq!(Tone::Success.duration(), Duration::from_millis(100));
        assert_eq!(Tone::Failure.duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_log_sink_counts_tones() {
        let mut sink = LogFeedbackSink::new();
        sink.play_tone(Tone::Success);
        sink.play_tone(Tone::Failure);
        sink.draw_text("0% = 0 / 0", Centroid::new(0, 15));
        assert_eq!(sink.tones_played(), 2);
    }
}
