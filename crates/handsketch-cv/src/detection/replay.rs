//! Recorded detection streams
//!
//! A recording is a JSON array with one entry per frame. Each entry is the
//! list of detections for that frame, or `null` for a frame on which the
//! detector failed:
//!
//! ```json
//! [
//!   [{"label": "closed", "bbox": [10, 10, 20, 20], "score": 0.9}],
//!   null,
//!   []
//! ]
//! ```

use crate::Result;
use anyhow::{Context, bail};
use handsketch_core::{Detection, Detector};
use std::collections::VecDeque;
use std::path::Path;

/// Plays back a recorded detection stream frame by frame.
#[derive(Debug, Clone, Default)]
pub struct ReplayDetector {
    frames: VecDeque<Option<Vec<Detection>>>,
    served: usize,
}

impl ReplayDetector {
    pub fn from_frames(frames: Vec<Option<Vec<Detection>>>) -> Self {
        Self {
            frames: frames.into(),
            served: 0,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let frames: Vec<Option<Vec<Detection>>> =
            serde_json::from_str(json).context("Failed to parse detection recording")?;
        Ok(Self::from_frames(frames))
    }

    /// Load a recording from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording: {:?}", path))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid recording: {:?}", path))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Detector for ReplayDetector {
    fn detect(&mut self) -> Result<Option<Vec<Detection>>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        self.served += 1;

        match frame {
            Some(detections) => Ok(Some(detections)),
            None => bail!("recorded detector failure at frame {}", self.served),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_frames_then_exhausts() -> Result<()> {
        let mut replay = ReplayDetector::from_json_str(
            r#"[
                [{"label": "closed", "bbox": [10, 10, 20, 20], "score": 0.9}],
                null,
                []
            ]"#,
        )?;
        assert_eq!(replay.remaining(), 3);

        let first = replay.detect()?.unwrap();
        assert_eq!(first[0].label, "closed");

        let err = replay.detect().unwrap_err();
        assert!(err.to_string().contains("frame 2"));

        assert_eq!(replay.detect()?, Some(vec![]));
        assert_eq!(replay.detect()?, None);
        Ok(())
    }

    #[test]
    fn malformed_recording_is_an_error() {
        assert!(ReplayDetector::from_json_str(r#"{"frames": 3}"#).is_err());
    }
}
