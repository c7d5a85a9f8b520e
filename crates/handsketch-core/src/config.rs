//! Pipeline configuration

use crate::error::ConfigError;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for the gesture-to-stroke pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frames kept per label for the majority vote.
    pub gesture_history_size: usize,
    /// Raw positions kept for the weighted moving average.
    pub smoothing_buffer_size: usize,
    /// Minimum spacing between two detector calls.
    pub detection_interval_ms: u64,
    pub line_width_min: f64,
    pub line_width_max: f64,
    /// Numerator of the `scale / (distance + 1)` width formula.
    pub line_width_distance_scale: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gesture_history_size: 5,
            smoothing_buffer_size: 3,
            detection_interval_ms: 50,
            line_width_min: 2.0,
            line_width_max: 8.0,
            line_width_distance_scale: 150.0,
        }
    }
}

impl PipelineConfig {
    /// Check every parameter, returning the first violation.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.gesture_history_size == 0 {
            return Err(ConfigError::ZeroGestureHistory);
        }
        if self.smoothing_buffer_size == 0 {
            return Err(ConfigError::ZeroSmoothingBuffer);
        }
        if self.detection_interval_ms == 0 {
            return Err(ConfigError::ZeroDetectionInterval);
        }

        let (min, max) = (self.line_width_min, self.line_width_max);
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidLineWidth { min, max });
        }

        let scale = self.line_width_distance_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidDistanceScale(scale));
        }

        Ok(())
    }

    pub fn detection_interval(&self) -> Duration {
        Duration::from_millis(self.detection_interval_ms)
    }

    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", path))?;

        Ok(config)
    }
}
