//! Detector configuration

use crate::bbox::DetectionSet;
use handsketch_core::{ConfigError, Detection, Surface};
use serde::{Deserialize, Serialize};

/// Post-processing applied to raw hand-detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detections scoring below this are dropped.
    pub score_threshold: f64,
    /// Same-label boxes overlapping more than this are suppressed.
    pub iou_threshold: f64,
    pub max_boxes: usize,
    /// Mirror boxes so that moving the hand right moves the pen right on a
    /// selfie camera.
    pub flip_horizontal: bool,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.6,
            iou_threshold: 0.5,
            max_boxes: 5,
            flip_horizontal: true,
            frame_width: 300,
            frame_height: 200,
        }
    }
}

impl DetectorConfig {
    /// Pass detections through untouched, for recordings that were already
    /// filtered at capture time.
    pub fn passthrough() -> Self {
        Self {
            score_threshold: f64::MIN,
            iou_threshold: 1.0,
            max_boxes: usize::MAX,
            flip_horizontal: false,
            ..Default::default()
        }
    }

    /// Detector frame dimensions.
    pub fn frame(&self) -> Result<Surface, ConfigError> {
        Surface::new(self.frame_width, self.frame_height)
    }

    /// Score filter, per-label NMS, top `max_boxes`, optional mirroring.
    pub fn postprocess(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let set = DetectionSet::from_vec(detections)
            .filter_by_score(self.score_threshold)
            .apply_label_nms(self.iou_threshold)
            .keep_best(self.max_boxes);

        if self.flip_horizontal {
            set.mirrored(self.frame_width as f64).into_vec()
        } else {
            set.into_vec()
        }
    }
}
