//! Configuration errors raised at construction time.

use thiserror::Error;

/// Rejected pipeline configuration.
///
/// Components refuse to run with degenerate parameters (an empty smoothing
/// buffer would divide by zero in the weighting step).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("gesture history size must be at least 1")]
    ZeroGestureHistory,

    #[error("smoothing buffer size must be at least 1")]
    ZeroSmoothingBuffer,

    #[error("detection interval must be greater than 0 ms")]
    ZeroDetectionInterval,

    #[error("invalid line width range: min {min}, max {max}")]
    InvalidLineWidth { min: f64, max: f64 },

    #[error("line width distance scale must be positive and finite, got {0}")]
    InvalidDistanceScale(f64),

    #[error("surface dimensions must be non-zero, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
}
