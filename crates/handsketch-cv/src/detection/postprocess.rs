//! Post-processing wrapper around any detector

use super::config::DetectorConfig;
use crate::Result;
use handsketch_core::{Detection, Detector};

/// Applies [`DetectorConfig::postprocess`] to every frame of `inner`.
pub struct Postprocessed<D> {
    inner: D,
    config: DetectorConfig,
}

impl<D: Detector> Postprocessed<D> {
    pub fn new(inner: D, config: DetectorConfig) -> Self {
        Self { inner, config }
    }
}

impl<D: Detector> Detector for Postprocessed<D> {
    fn detect(&mut self) -> Result<Option<Vec<Detection>>> {
        let frame = self.inner.detect()?;
        Ok(frame.map(|detections| self.config.postprocess(detections)))
    }
}
