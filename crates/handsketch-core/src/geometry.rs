//! Points, drawable surfaces and detector-frame to surface mapping

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// A position on the drawing surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Pixel dimensions of a drawable area or a detector frame. Never zero-sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceSize", into = "SurfaceSize")]
pub struct Surface {
    width: u32,
    height: u32,
}

/// Unchecked wire form of [`Surface`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SurfaceSize {
    width: u32,
    height: u32,
}

impl TryFrom<SurfaceSize> for Surface {
    type Error = ConfigError;

    fn try_from(size: SurfaceSize) -> Result<Self, Self::Error> {
        Surface::new(size.width, size.height)
    }
}

impl From<Surface> for SurfaceSize {
    fn from(surface: Surface) -> Self {
        SurfaceSize {
            width: surface.width,
            height: surface.height,
        }
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptySurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clamp a point into `[0, width] x [0, height]`.
    ///
    /// Non-finite coordinates collapse to the origin edge.
    pub fn clamp(&self, point: Point) -> Point {
        let clamp_axis = |v: f64, max: u32| {
            if v.is_finite() {
                v.clamp(0.0, max as f64)
            } else {
                0.0
            }
        };

        Point::new(
            clamp_axis(point.x, self.width),
            clamp_axis(point.y, self.height),
        )
    }
}

/// Scales detector-frame coordinates onto the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMapping {
    pub frame: Surface,
    pub surface: Surface,
}

impl FrameMapping {
    pub fn new(frame: Surface, surface: Surface) -> Self {
        Self { frame, surface }
    }

    /// Frame and surface share a coordinate space.
    pub fn identity(surface: Surface) -> Self {
        Self::new(surface, surface)
    }

    /// Map a frame-space point to surface space. The result is not clamped.
    pub fn map(&self, point: Point) -> Point {
        Point::new(
            point.x / self.frame.width() as f64 * self.surface.width() as f64,
            point.y / self.frame.height() as f64 * self.surface.height() as f64,
        )
    }

    pub fn with_surface(self, surface: Surface) -> Self {
        Self { surface, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pulls_edge_points_inside() {
        let surface = Surface::new(100, 50).unwrap();
        assert_eq!(surface.clamp(Point::new(-5.0, 70.0)), Point::new(0.0, 50.0));
        assert_eq!(surface.clamp(Point::new(40.0, 20.0)), Point::new(40.0, 20.0));
        assert_eq!(surface.clamp(Point::new(f64::NAN, 10.0)), Point::new(0.0, 10.0));
    }

    #[test]
    fn zero_surface_is_rejected() {
        assert_eq!(
            Surface::new(0, 10),
            Err(ConfigError::EmptySurface { width: 0, height: 10 })
        );
    }

    #[test]
    fn zero_surface_cannot_be_deserialized() {
        let err = serde_json::from_str::<Surface>(r#"{ "width": 0, "height": 200 }"#).unwrap_err();
        assert!(err.to_string().contains("non-zero"));

        let surface: Surface = serde_json::from_str(r#"{ "width": 300, "height": 200 }"#).unwrap();
        assert_eq!((surface.width(), surface.height()), (300, 200));
    }

    #[test]
    fn mapping_scales_video_frame_to_window() {
        let mapping = FrameMapping::new(
            Surface::new(300, 200).unwrap(),
            Surface::new(1200, 800).unwrap(),
        );
        assert_eq!(mapping.map(Point::new(150.0, 50.0)), Point::new(600.0, 200.0));
    }
}
