//! Application settings file

use anyhow::{Context, Result};
use handsketch_core::{PipelineConfig, Rgb, Surface};
use handsketch_cv::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the replay tool can be configured with, as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub detector: DetectorConfig,
    pub canvas: CanvasSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            background: Rgb(255, 255, 255),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {:?}", path))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings: {:?}", path))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().context("Invalid pipeline settings")?;
        self.detector.frame().context("Invalid detector frame size")?;
        self.surface()?;
        Ok(())
    }

    pub fn surface(&self) -> Result<Surface> {
        Surface::new(self.canvas.width, self.canvas.height).context("Invalid canvas size")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_partial_settings() -> Result<()> {
        let settings: Settings = serde_json::from_str(
            r#"{ "pipeline": { "detection_interval_ms": 100 }, "canvas": { "width": 640 } }"#,
        )?;
        assert_eq!(settings.pipeline.detection_interval_ms, 100);
        assert_eq!(settings.pipeline.smoothing_buffer_size, 3);
        assert_eq!(settings.canvas.width, 640);
        assert_eq!(settings.canvas.height, 720);
        assert!(settings.detector.flip_horizontal);
        settings.validate()
    }

    #[test]
    fn zero_canvas_is_invalid() {
        let mut settings = Settings::default();
        settings.canvas.height = 0;
        assert!(settings.validate().is_err());
    }
}
