//! Drawing operations and the sink that paints them

use crate::geometry::{Point, Surface};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);

    /// Uniformly random 24-bit color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Rgb(
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        )
    }

    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.0, self.1, self.2, alpha]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::RED
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// One drawing command, as recorded by a [`RenderSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    Clear,
    SetStrokeStyle { color: Rgb, width: f64 },
    MoveTo(Point),
    /// Quadratic curve from the current position to `end`.
    CurveTo { control: Point, end: Point },
}

impl RenderOp {
    /// Replay this operation onto a sink.
    pub fn apply<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            RenderOp::Clear => sink.clear(),
            RenderOp::SetStrokeStyle { color, width } => sink.set_stroke_style(color, width),
            RenderOp::MoveTo(point) => sink.move_to(point),
            RenderOp::CurveTo { control, end } => sink.curve_to(control, end),
        }
    }
}

/// Consumer of drawing operations. The pipeline never reads pixels back.
pub trait RenderSink {
    fn clear(&mut self);
    fn set_stroke_style(&mut self, color: Rgb, width: f64);
    fn move_to(&mut self, point: Point);
    fn curve_to(&mut self, control: Point, end: Point);

    /// The drawable area changed size. Sinks that own pixels reallocate here.
    fn resize(&mut self, _surface: Surface) {
        self.clear();
    }
}

/// Sink that keeps every operation it receives, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    ops: Vec<RenderOp>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of curve segments drawn.
    pub fn segments(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RenderOp::CurveTo { .. }))
            .count()
    }

    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| **op == RenderOp::Clear).count()
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) {
        self.ops.push(RenderOp::Clear);
    }

    fn set_stroke_style(&mut self, color: Rgb, width: f64) {
        self.ops.push(RenderOp::SetStrokeStyle { color, width });
    }

    fn move_to(&mut self, point: Point) {
        self.ops.push(RenderOp::MoveTo(point));
    }

    fn curve_to(&mut self, control: Point, end: Point) {
        self.ops.push(RenderOp::CurveTo { control, end });
    }
}
