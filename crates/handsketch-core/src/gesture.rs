//! Hand labels and stabilized gestures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detector labels the pipeline tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandLabel {
    /// Flat open palm.
    Open,
    /// Closed fist.
    Closed,
    /// Index finger extended.
    Point,
}

impl HandLabel {
    /// All tracked labels, highest priority first.
    ///
    /// Open must preempt the drawing gestures so a clear never leaves stray marks.
    pub const PRIORITY: [HandLabel; 3] = [HandLabel::Open, HandLabel::Closed, HandLabel::Point];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Point => "point",
        }
    }

    /// Parse a detector label. Unknown labels (e.g. "face") yield `None`.
    pub fn parse(label: &str) -> Option<HandLabel> {
        match label.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "point" => Some(Self::Point),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
            Self::Point => 2,
        }
    }
}

/// Debounced classification of one detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Open,
    Closed,
    Point,
    #[default]
    None,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Point => "point",
            Self::None => "none",
        }
    }
}

impl From<HandLabel> for Gesture {
    fn from(label: HandLabel) -> Self {
        match label {
            HandLabel::Open => Self::Open,
            HandLabel::Closed => Self::Closed,
            HandLabel::Point => Self::Point,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
