//! Detector output as consumed by the pipeline

use crate::geometry::Point;
use crate::gesture::HandLabel;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in detector-frame pixels.
///
/// Serialized as `[x, y, w, h]`, the layout hand detectors emit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BBox) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) * (y2 - y1);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }

        intersection / union
    }

    pub fn overlaps(&self, other: &BBox, threshold: f64) -> bool {
        self.iou(other) > threshold
    }

    /// Mirror horizontally inside a frame of the given width.
    pub fn mirrored(&self, frame_width: f64) -> BBox {
        BBox::new(frame_width - self.x - self.width, self.y, self.width, self.height)
    }
}

impl From<[f64; 4]> for BBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BBox> for [f64; 4] {
    fn from(bbox: BBox) -> Self {
        [bbox.x, bbox.y, bbox.width, bbox.height]
    }
}

/// A single labeled hand box from one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub bbox: BBox,
    #[serde(default)]
    pub score: f64,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BBox, score: f64) -> Self {
        Self {
            label: label.into(),
            bbox,
            score,
        }
    }

    /// Tracked hand label, `None` for labels the pipeline ignores.
    pub fn hand_label(&self) -> Option<HandLabel> {
        HandLabel::parse(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_iou_partial_overlap() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 10.0, 10.0);

        let iou = a.iou(&b);
        assert!(iou > 0.0 && iou < 1.0);
        assert_eq!(a.iou(&BBox::new(50.0, 50.0, 5.0, 5.0)), 0.0);
    }

    #[test]
    fn detection_parses_detector_json() {
        let json = r#"{"label": "closed", "bbox": [10, 10, 20, 20], "score": 0.87}"#;
        let detection: Detection = serde_json::from_str(json).unwrap();

        assert_eq!(detection.hand_label(), Some(HandLabel::Closed));
        assert_eq!(detection.bbox.center(), Point::new(20.0, 20.0));
    }

    #[test]
    fn unknown_label_is_untracked() {
        let detection = Detection::new("face", BBox::new(0.0, 0.0, 4.0, 4.0), 0.9);
        assert_eq!(detection.hand_label(), None);
    }

    #[test]
    fn mirror_flips_across_frame() {
        let bbox = BBox::new(10.0, 5.0, 20.0, 20.0).mirrored(300.0);
        assert_eq!(bbox, BBox::new(270.0, 5.0, 20.0, 20.0));
    }
}
