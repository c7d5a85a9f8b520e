//! Handsketch Core Library
//!
//! Turns a noisy per-frame stream of labeled hand detections into drawing
//! operations: majority-vote gesture debouncing, weighted position smoothing
//! and the stroke state machine, driven by a rate-bounded detection loop.

pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod render;
pub mod ring;
pub mod scheduler;
pub mod smoother;
pub mod stabilizer;
pub mod stroke;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use detection::{BBox, Detection};
pub use error::ConfigError;
pub use geometry::{FrameMapping, Point, Surface};
pub use gesture::{Gesture, HandLabel};
pub use render::{RecordingSink, RenderOp, RenderSink, Rgb};
pub use scheduler::{Detector, Pacer, Session, SessionControl, SessionStats};
pub use smoother::PositionSmoother;
pub use stabilizer::GestureStabilizer;
pub use stroke::{StrokeMachine, StrokePhase, StrokeState};

// Error handling
pub type Result<T> = anyhow::Result<T>;
