//! Detection sets and non-maximum suppression
//!
//! Batch operations over one frame's raw detector output.

use handsketch_core::Detection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One frame's detections with batch filtering operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn from_vec(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.detections
    }

    pub fn into_vec(self) -> Vec<Detection> {
        self.detections
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Sort by score, best first
    pub fn sort_by_score(&mut self) {
        self.detections.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    pub fn filter_by_score(mut self, threshold: f64) -> Self {
        self.detections.retain(|d| d.score >= threshold);
        self
    }

    /// Keep the `max` best-scoring detections.
    pub fn keep_best(mut self, max: usize) -> Self {
        self.sort_by_score();
        self.detections.truncate(max);
        self
    }

    /// Mirror every box across a frame of the given width.
    pub fn mirrored(mut self, frame_width: f64) -> Self {
        for detection in &mut self.detections {
            detection.bbox = detection.bbox.mirrored(frame_width);
        }
        self
    }

    /// Greedy NMS across all labels: walk boxes best first and keep each one
    /// that overlaps no already-kept box.
    pub fn apply_nms(mut self, iou_threshold: f64) -> Self {
        self.sort_by_score();

        let mut kept: Vec<Detection> = Vec::with_capacity(self.detections.len());
        for candidate in self.detections {
            if !kept.iter().any(|k| k.bbox.overlaps(&candidate.bbox, iou_threshold)) {
                kept.push(candidate);
            }
        }

        Self::from_vec(kept)
    }

    /// NMS within each label; overlapping boxes of different labels survive.
    pub fn apply_label_nms(self, iou_threshold: f64) -> Self {
        let mut groups: HashMap<String, Vec<Detection>> = HashMap::new();
        for detection in self.detections {
            groups.entry(detection.label.clone()).or_default().push(detection);
        }

        let mut result: DetectionSet = groups
            .into_values()
            .flat_map(|group| DetectionSet::from_vec(group).apply_nms(iou_threshold))
            .collect();
        result.sort_by_score();
        result
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }
}

impl IntoIterator for DetectionSet {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.into_iter()
    }
}

impl FromIterator<Detection> for DetectionSet {
    fn from_iter<T: IntoIterator<Item = Detection>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
