//! Stroke state machine
//!
//! Owns pen state, color and the last drawn point, and turns one stabilized
//! gesture plus an optional hand position per cycle into drawing operations.
//!
//! | Gesture | Idle | Drawing |
//! |---|---|---|
//! | `open` | clear | clear, lift pen |
//! | `closed` | new color, pen down | extend stroke |
//! | `point` | pen down | extend stroke |
//! | `none` | - | - (stroke survives) |

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::geometry::{Point, Surface};
use crate::gesture::Gesture;
use crate::render::{RenderSink, Rgb};
use crate::smoother::PositionSmoother;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokePhase {
    /// Pen up.
    Idle,
    /// Pen down; segments are drawn once a previous point exists.
    Drawing,
}

/// Mutable drawing state carried across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeState {
    pub pen_down: bool,
    /// `None` while the pen is up or before the first point after pen-down.
    pub last_point: Option<Point>,
    pub color: Rgb,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self {
            pen_down: false,
            last_point: None,
            color: Rgb::default(),
        }
    }
}

/// Width bounds for the speed-dependent pen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineWidth {
    pub min: f64,
    pub max: f64,
    pub distance_scale: f64,
}

impl LineWidth {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            min: config.line_width_min,
            max: config.line_width_max,
            distance_scale: config.line_width_distance_scale,
        }
    }

    /// `clamp(scale / (d + 1), min, max)`: slow motion draws thick, fast
    /// motion draws thin. Non-increasing in `distance`.
    pub fn for_distance(&self, distance: f64) -> f64 {
        let distance = if distance.is_finite() { distance.max(0.0) } else { f64::MAX };
        (self.distance_scale / (distance + 1.0)).clamp(self.min, self.max)
    }
}

/// What a single [`StrokeMachine::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    /// Nothing changed.
    Unchanged,
    /// Canvas cleared and pen lifted.
    Cleared,
    /// Pen lowered; `at` is the first recorded point if a position was known.
    PenDown { color: Rgb, at: Option<Point> },
    /// First point of the stroke recorded; nothing drawn yet.
    Anchored(Point),
    /// One curve segment emitted.
    Segment { from: Point, to: Point, width: f64 },
}

/// Gesture-driven drawing state machine.
#[derive(Debug, Clone)]
pub struct StrokeMachine {
    state: StrokeState,
    smoother: PositionSmoother,
    width: LineWidth,
    surface: Surface,
    rng: StdRng,
}

impl StrokeMachine {
    pub fn new(config: &PipelineConfig, surface: Surface) -> Result<Self, ConfigError> {
        Self::with_rng(config, surface, StdRng::from_entropy())
    }

    /// Deterministic color sequence, for tests and replays.
    pub fn seeded(config: &PipelineConfig, surface: Surface, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, surface, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(
        config: &PipelineConfig,
        surface: Surface,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            state: StrokeState::default(),
            smoother: PositionSmoother::new(config.smoothing_buffer_size)?,
            width: LineWidth::from_config(config),
            surface,
            rng,
        })
    }

    /// Advance one detection cycle.
    ///
    /// `position` is the hand position in surface coordinates; it is clamped
    /// to the surface before use. Drawing gestures without a position leave
    /// the state untouched.
    pub fn advance<S>(&mut self, gesture: Gesture, position: Option<Point>, sink: &mut S) -> StrokeEvent
    where
        S: RenderSink + ?Sized,
    {
        match gesture {
            Gesture::Open => {
                sink.clear();
                self.lift_pen();
                StrokeEvent::Cleared
            }
            Gesture::Closed | Gesture::Point if !self.state.pen_down => {
                self.lower_pen(gesture == Gesture::Closed, position)
            }
            Gesture::Closed | Gesture::Point => match position {
                Some(raw) => self.extend(raw, sink),
                None => StrokeEvent::Unchanged,
            },
            Gesture::None => StrokeEvent::Unchanged,
        }
    }

    fn lower_pen(&mut self, new_color: bool, position: Option<Point>) -> StrokeEvent {
        if new_color {
            self.state.color = Rgb::random(&mut self.rng);
        }

        self.smoother.reset();
        self.state.pen_down = true;
        self.state.last_point = position.map(|raw| self.smoother.smooth(self.surface.clamp(raw)));

        debug!(color = %self.state.color, "pen down");
        StrokeEvent::PenDown {
            color: self.state.color,
            at: self.state.last_point,
        }
    }

    fn extend<S>(&mut self, raw: Point, sink: &mut S) -> StrokeEvent
    where
        S: RenderSink + ?Sized,
    {
        let point = self.smoother.smooth(self.surface.clamp(raw));

        let Some(from) = self.state.last_point.replace(point) else {
            return StrokeEvent::Anchored(point);
        };

        let width = self.width.for_distance(from.distance_to(&point));
        sink.set_stroke_style(self.state.color, width);
        sink.move_to(from);
        sink.curve_to(from.midpoint(&point), point);

        trace!(?from, to = ?point, width, "segment");
        StrokeEvent::Segment {
            from,
            to: point,
            width,
        }
    }

    fn lift_pen(&mut self) {
        self.state.pen_down = false;
        self.state.last_point = None;
        self.smoother.reset();
    }

    /// Force the pen up and drop buffered positions. The color survives.
    pub fn reset(&mut self) {
        if self.state.pen_down {
            debug!("stroke reset");
        }
        self.lift_pen();
    }

    /// Adopt new surface bounds and reset.
    pub fn resize(&mut self, surface: Surface) {
        self.surface = surface;
        self.reset();
    }

    pub fn phase(&self) -> StrokePhase {
        if self.state.pen_down {
            StrokePhase::Drawing
        } else {
            StrokePhase::Idle
        }
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn line_width(&self) -> LineWidth {
        self.width
    }
}
