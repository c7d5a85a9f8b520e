//! Handsketch Detection & Raster Library
//!
//! Detector-side plumbing for the gesture pipeline: score filtering and
//! non-maximum suppression of raw hand boxes, detector adapters (recorded
//! replays, post-processing, background worker) and a raster canvas sink.

pub mod bbox;
pub mod canvas;
pub mod detection;

// Re-export commonly used types
pub use bbox::DetectionSet;
pub use canvas::{CanvasError, RasterCanvas};
pub use detection::{BackgroundDetector, DetectorConfig, Postprocessed, ReplayDetector};

// Error handling
pub type Result<T> = anyhow::Result<T>;
