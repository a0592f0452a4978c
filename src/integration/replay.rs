//! Detection source replaying recorded boxes from a JSON-lines file.
//!
//! Each non-empty line is one frame, either an object with an optional
//! timestamp in seconds:
//!
//! ```text
//! {"t": 0.033, "boxes": [[90, 40, 110, 60], [300, 200, 320, 220]]}
//! ```
//!
//! or a bare list of boxes. Lines starting with `#` are ignored.

use std::collections::VecDeque;
use std::io::BufRead;
use std::time::Duration;

use serde::Deserialize;

use crate::clock::ManualClock;
use crate::error::{Error, Result};
use crate::evaluator::{FeedbackSink, ThrowStats};
use crate::tracker::BoundingBox;

use super::{DetectionSource, ThrowPipeline};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Frame {
        #[serde(default)]
        t: Option<f64>,
        boxes: Vec<[i32; 4]>,
    },
    Boxes(Vec<[i32; 4]>),
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub timestamp: Option<Duration>,
    pub boxes: Vec<BoundingBox>,
}

/// Replays recorded detections one frame per `detect` call.
#[derive(Debug, Clone, Default)]
pub struct ReplayDetector {
    frames: VecDeque<ReplayFrame>,
    frames_served: usize,
}

impl ReplayDetector {
    pub fn new(frames: Vec<ReplayFrame>) -> Self {
        Self {
            frames: frames.into(),
            frames_served: 0,
        }
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut frames = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            frames.push(parse_line(trimmed, index + 1)?);
        }
        Ok(Self::new(frames))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time of the next frame: its recorded timestamp, or its index at `fps`.
    pub fn next_frame_time(&self, fps: f64) -> Option<Duration> {
        let frame = self.frames.front()?;
        Some(frame.timestamp.unwrap_or_else(|| {
            Duration::from_secs_f64(self.frames_served as f64 / fps)
        }))
    }
}

fn parse_line(line: &str, line_number: usize) -> Result<ReplayFrame> {
    let parsed: ReplayLine = serde_json::from_str(line).map_err(|e| Error::Replay {
        line: line_number,
        message: e.to_string(),
    })?;
    let (timestamp, boxes) = match parsed {
        ReplayLine::Frame { t, boxes } => (t, boxes),
        ReplayLine::Boxes(boxes) => (None, boxes),
    };
    let timestamp = match timestamp {
        Some(t) if t >= 0.0 => Some(Duration::try_from_secs_f64(t).map_err(|_| {
            Error::Replay {
                line: line_number,
                message: format!("timestamp out of range, got {t}"),
            }
        })?),
        Some(t) => {
            return Err(Error::Replay {
                line: line_number,
                message: format!("timestamp must be a non-negative number of seconds, got {t}"),
            });
        }
        None => None,
    };
    Ok(ReplayFrame {
        timestamp,
        boxes: boxes.into_iter().map(BoundingBox::from).collect(),
    })
}

impl DetectionSource for ReplayDetector {
    type Error = std::convert::Infallible;

    /// Return the next recorded frame, or no boxes once the recording ends.
    fn detect(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
    ) -> std::result::Result<Vec<BoundingBox>, Self::Error> {
        match self.frames.pop_front() {
            Some(frame) => {
                self.frames_served += 1;
                Ok(frame.boxes)
            }
            None => Ok(vec![]),
        }
    }
}

/// Play every recorded frame through `pipeline`, timing frames with `clock`.
///
/// After the last frame the clock is moved past the disappearance window so
/// balls still in flight are scored before the totals are returned.
pub fn run_replay<S>(
    pipeline: &mut ThrowPipeline<ReplayDetector, ManualClock>,
    clock: &ManualClock,
    fps: f64,
    debug: bool,
    sink: &mut S,
) -> Result<ThrowStats>
where
    S: FeedbackSink + ?Sized,
{
    if !(fps.is_finite() && fps > 0.0) {
        return Err(Error::Config(format!("fps must be positive, got {fps}")));
    }

    let mut last_time = Duration::ZERO;
    while let Some(frame_time) = pipeline.detector().next_frame_time(fps) {
        // Recorded timestamps never move the clock backwards
        last_time = frame_time.max(last_time);
        clock.set(last_time);

        pipeline
            .process_frame(&[], 0, 0, sink)
            .unwrap_or_else(|never| match never {});

        if debug {
            for (id, ball) in pipeline.tracker().tracked() {
                log::info!(
                    "t={:.3}s ID {id} at ({}, {}) apex y={} falling={}",
                    last_time.as_secs_f64(),
                    ball.centroid.x,
                    ball.centroid.y,
                    ball.apex_centroid.y,
                    ball.is_falling
                );
            }
        }
    }

    let window = pipeline.tracker().config().max_disappeared_time;
    clock.set(
        last_time
            .saturating_add(window)
            .saturating_add(Duration::from_millis(1)),
    );
    pipeline.process_detections(&[], sink);

    Ok(pipeline.evaluator().stats())
}
