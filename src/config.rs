//! User settings persisted between runs.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::evaluator::EvaluatorConfig;
use crate::tracker::{AssignmentStrategy, ReacquisitionPolicy, TrackerConfig};

/// User-configurable settings.
///
/// Pixel values in `track_range` and the frame size refer to the camera's
/// native resolution; the band is stored in already scaled frame pixels so it
/// matches what the user adjusted on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Factor applied to camera frames before detection.
    pub scale: f64,
    pub debug: bool,
    /// Seconds a ball may stay undetected before it is dropped.
    pub track_time: f64,
    /// Reacquisition distance in native pixels.
    pub track_range: f64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub success_area_y: i32,
    pub success_area_length: i32,
    pub reacquisition: ReacquisitionPolicy,
    pub assignment: AssignmentStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        let scale = 0.4;
        let frame_height = 720;
        Self {
            scale,
            debug: false,
            track_time: 0.2,
            track_range: 150.0,
            frame_width: 1280,
            frame_height,
            success_area_y: (f64::from(frame_height) / 4.0 * scale) as i32,
            success_area_length: (f64::from(frame_height) / 10.0 * scale) as i32,
            reacquisition: ReacquisitionPolicy::Static,
            assignment: AssignmentStrategy::Greedy,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::Config(format!("scale must be positive, got {}", self.scale)));
        }
        if !(self.track_time.is_finite() && self.track_time > 0.0) {
            return Err(Error::Config(format!(
                "track_time must be positive, got {}",
                self.track_time
            )));
        }
        if Duration::try_from_secs_f64(self.track_time).is_err() {
            return Err(Error::Config(format!(
                "track_time is too large, got {}",
                self.track_time
            )));
        }
        if !(self.track_range.is_finite() && self.track_range >= 0.0) {
            return Err(Error::Config(format!(
                "track_range must not be negative, got {}",
                self.track_range
            )));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(Error::Config(format!(
                "frame size must be non-zero, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides and validate the result.
    ///
    /// Only persisted fields are touched; run-only flags such as debug output
    /// stay with the caller so they are never saved.
    pub fn apply_overrides(
        &mut self,
        scale: Option<f64>,
        track_time: Option<f64>,
        track_range: Option<f64>,
    ) -> Result<()> {
        if let Some(scale) = scale {
            self.scale = scale;
        }
        if let Some(track_time) = track_time {
            self.track_time = track_time;
        }
        if let Some(track_range) = track_range {
            self.track_range = track_range;
        }
        self.validate()
    }

    pub fn scaled_frame_width(&self) -> i32 {
        (f64::from(self.frame_width) * self.scale) as i32
    }

    pub fn scaled_frame_height(&self) -> i32 {
        (f64::from(self.frame_height) * self.scale) as i32
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            reacquisition_distance: (self.track_range * self.scale).trunc(),
            max_disappeared_time: Duration::try_from_secs_f64(self.track_time)
                .unwrap_or(Duration::MAX),
            reacquisition: self.reacquisition,
            assignment: self.assignment,
        }
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            band_start_y: self.success_area_y,
            band_length: self.success_area_length,
            frame_width: self.scaled_frame_width(),
        }
    }
}
