//! Linearly-weighted moving average over recent pointer positions

use crate::error::ConfigError;
use crate::geometry::Point;
use crate::ring::BoundedHistory;
use std::num::NonZeroUsize;

/// Weighted average where the i-th point (oldest first) has weight `i + 1`.
///
/// Returns `None` for an empty sequence.
pub fn weighted_average<'a, I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    let (mut x, mut y, mut total) = (0.0, 0.0, 0.0);
    for (i, point) in points.into_iter().enumerate() {
        let weight = (i + 1) as f64;
        x += point.x * weight;
        y += point.y * weight;
        total += weight;
    }

    (total > 0.0).then(|| Point::new(x / total, y / total))
}

/// Reduces hand tremor in the drawn line while keeping latency under
/// `capacity` frames.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    buffer: BoundedHistory<Point>,
}

impl PositionSmoother {
    pub fn new(buffer_size: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(buffer_size).ok_or(ConfigError::ZeroSmoothingBuffer)?;
        Ok(Self {
            buffer: BoundedHistory::new(capacity),
        })
    }

    /// Buffer a raw position and return the smoothed one.
    pub fn smooth(&mut self, raw: Point) -> Point {
        self.buffer.push(raw);
        weighted_average(&self.buffer).unwrap_or(raw)
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_passes_through() {
        let mut smoother = PositionSmoother::new(3).unwrap();
        assert_eq!(smoother.smooth(Point::new(7.0, -2.0)), Point::new(7.0, -2.0));
    }

    #[test]
    fn recent_points_dominate() {
        let mut smoother = PositionSmoother::new(3).unwrap();
        smoother.smooth(Point::new(0.0, 0.0));
        smoother.smooth(Point::new(10.0, 0.0));
        let out = smoother.smooth(Point::new(20.0, 0.0));

        assert!(out.x > 10.0 && out.x < 20.0, "got {}", out.x);
        assert!((out.x - 80.0 / 6.0).abs() < 1e-9);
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn oldest_point_falls_out_of_window() {
        let mut smoother = PositionSmoother::new(2).unwrap();
        smoother.smooth(Point::new(1000.0, 0.0));
        smoother.smooth(Point::new(0.0, 0.0));
        let out = smoother.smooth(Point::new(30.0, 0.0));

        assert_eq!(smoother.len(), 2);
        assert!((out.x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut smoother = PositionSmoother::new(3).unwrap();
        smoother.smooth(Point::new(1.0, 1.0));

        smoother.reset();
        smoother.reset();
        assert!(smoother.is_empty());
        assert_eq!(smoother.smooth(Point::new(4.0, 4.0)), Point::new(4.0, 4.0));
    }

    #[test]
    fn zero_buffer_is_rejected() {
        assert_eq!(
            PositionSmoother::new(0).unwrap_err(),
            ConfigError::ZeroSmoothingBuffer
        );
    }

    #[test]
    fn empty_average_is_none() {
        assert_eq!(weighted_average(std::iter::empty()), None);
    }
}
