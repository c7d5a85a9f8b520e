//! Detector adapters

pub mod background;
pub mod config;
pub mod postprocess;
pub mod replay;

pub use background::BackgroundDetector;
pub use config::DetectorConfig;
pub use postprocess::Postprocessed;
pub use replay::ReplayDetector;
