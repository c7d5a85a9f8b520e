//! Detection loop
//!
//! A [`Session`] pulls detections from a [`Detector`], stabilizes them,
//! advances the [`StrokeMachine`] and pushes operations to a [`RenderSink`].
//! Cycles run to completion one at a time on the calling thread, so draw
//! operations come out in frame order and no state needs locking. How often
//! a cycle may start is decided by a replaceable [`Pacer`].

use crate::config::PipelineConfig;
use crate::detection::{BBox, Detection};
use crate::error::ConfigError;
use crate::geometry::{FrameMapping, Surface};
use crate::gesture::{Gesture, HandLabel};
use crate::render::RenderSink;
use crate::stabilizer::GestureStabilizer;
use crate::stroke::{StrokeEvent, StrokeMachine};
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Source of per-frame detections. The adapter owns its frame source.
pub trait Detector {
    /// Detections for the next frame, or `Ok(None)` once no frames remain.
    fn detect(&mut self) -> Result<Option<Vec<Detection>>>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self) -> Result<Option<Vec<Detection>>> {
        (**self).detect()
    }
}

// ── Pacing strategies ──────────────────────────────────────

/// Decides when the next detection cycle may start.
pub trait Pacer {
    /// Block until the next cycle is due. `false` ends the session.
    fn wait(&mut self) -> bool;
}

impl<P: Pacer + ?Sized> Pacer for Box<P> {
    fn wait(&mut self) -> bool {
        (**self).wait()
    }
}

/// Runs cycles back to back. Used for offline replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait(&mut self) -> bool {
        true
    }
}

/// Timer-driven pacing: at most one cycle per `interval`.
#[derive(Debug, Clone)]
pub struct IntervalPacer {
    interval: Duration,
    last_start: Option<Instant>,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: None,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.detection_interval())
    }
}

impl Pacer for IntervalPacer {
    fn wait(&mut self) -> bool {
        if let Some(last) = self.last_start {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last_start = Some(Instant::now());
        true
    }
}

/// Paint-driven pacing: waits for display ticks and starts a cycle on the
/// first tick at least `interval` after the previous cycle.
pub struct PaintSyncedPacer {
    ticks: Receiver<()>,
    interval: Duration,
    last_start: Option<Instant>,
}

impl PaintSyncedPacer {
    pub fn new(ticks: Receiver<()>, interval: Duration) -> Self {
        Self {
            ticks,
            interval,
            last_start: None,
        }
    }
}

impl Pacer for PaintSyncedPacer {
    fn wait(&mut self) -> bool {
        // Disconnected tick source means the display is gone
        while self.ticks.recv().is_ok() {
            let due = self
                .last_start
                .is_none_or(|last| last.elapsed() >= self.interval);
            if due {
                self.last_start = Some(Instant::now());
                return true;
            }
        }
        false
    }
}

// ── External control ───────────────────────────────────────

#[derive(Debug, Default)]
struct ControlState {
    stop: AtomicBool,
    reset: AtomicBool,
    resize: Mutex<Option<Surface>>,
}

/// Cloneable handle for requests from outside the detection loop.
///
/// Requests are observed at the next cycle boundary; a running cycle is never
/// interrupted.
#[derive(Debug, Clone, Default)]
pub struct SessionControl {
    inner: Arc<ControlState>,
}

impl SessionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
    }

    /// Drop the current stroke and gesture history.
    pub fn request_reset(&self) {
        self.inner.reset.store(true, Ordering::SeqCst);
    }

    /// The drawable area changed size; implies a reset.
    pub fn request_resize(&self, surface: Surface) {
        *self.inner.resize.lock().unwrap_or_else(PoisonError::into_inner) = Some(surface);
    }

    pub fn stop_requested(&self) -> bool {
        self.inner.stop.load(Ordering::SeqCst)
    }

    fn take_reset(&self) -> bool {
        self.inner.reset.swap(false, Ordering::SeqCst)
    }

    fn take_resize(&self) -> Option<Surface> {
        self.inner
            .resize
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

// ── Session ────────────────────────────────────────────────

/// Result of one [`Session::run_cycle`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    Advanced { gesture: Gesture, event: StrokeEvent },
    /// The detector returned an error; state was left untouched.
    DetectorFailed,
    /// The detector has no more frames.
    Exhausted,
    Stopped,
}

/// Counters collected over a session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub cycles: usize,
    pub detector_failures: usize,
    pub segments: usize,
    pub clears: usize,
    pub resets: usize,
    pub gesture_counts: HashMap<Gesture, usize>,
}

/// Highest-scoring box for the stabilized drawing gesture.
///
/// A stable gesture can be missing from the current frame; the other drawing
/// label stands in for it so the stroke keeps following the hand.
pub fn hand_position(gesture: Gesture, detections: &[Detection]) -> Option<BBox> {
    let preference = match gesture {
        Gesture::Closed => [HandLabel::Closed, HandLabel::Point],
        Gesture::Point => [HandLabel::Point, HandLabel::Closed],
        Gesture::Open | Gesture::None => return None,
    };

    preference.into_iter().find_map(|label| {
        detections
            .iter()
            .filter(|d| d.hand_label() == Some(label))
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|d| d.bbox)
    })
}

/// Owns all pipeline state for one drawing session.
pub struct Session<P: Pacer> {
    stabilizer: GestureStabilizer,
    machine: StrokeMachine,
    mapping: FrameMapping,
    pacer: P,
    control: SessionControl,
    stats: SessionStats,
}

impl<P: Pacer> Session<P> {
    pub fn new(
        config: &PipelineConfig,
        mapping: FrameMapping,
        pacer: P,
    ) -> std::result::Result<Self, ConfigError> {
        let stabilizer = GestureStabilizer::new(config.gesture_history_size)?;
        let machine = StrokeMachine::new(config, mapping.surface)?;
        Ok(Self::from_parts(stabilizer, machine, mapping, pacer))
    }

    /// Like [`new`](Self::new) with a reproducible stroke color sequence.
    pub fn seeded(
        config: &PipelineConfig,
        mapping: FrameMapping,
        pacer: P,
        seed: u64,
    ) -> std::result::Result<Self, ConfigError> {
        let stabilizer = GestureStabilizer::new(config.gesture_history_size)?;
        let machine = StrokeMachine::seeded(config, mapping.surface, seed)?;
        Ok(Self::from_parts(stabilizer, machine, mapping, pacer))
    }

    pub fn from_parts(
        stabilizer: GestureStabilizer,
        machine: StrokeMachine,
        mapping: FrameMapping,
        pacer: P,
    ) -> Self {
        Self {
            stabilizer,
            machine,
            mapping,
            pacer,
            control: SessionControl::new(),
            stats: SessionStats::default(),
        }
    }

    /// Handle for stop/reset/resize requests from other threads.
    pub fn control(&self) -> SessionControl {
        self.control.clone()
    }

    /// Run cycles until the detector is exhausted, the pacer gives up or a
    /// stop is requested.
    pub fn run<D, S>(&mut self, detector: &mut D, sink: &mut S) -> &SessionStats
    where
        D: Detector + ?Sized,
        S: RenderSink + ?Sized,
    {
        info!(surface = ?self.mapping.surface, "detection loop started");

        while !self.control.stop_requested() && self.pacer.wait() {
            match self.run_cycle(detector, sink) {
                CycleOutcome::Exhausted | CycleOutcome::Stopped => break,
                CycleOutcome::Advanced { .. } | CycleOutcome::DetectorFailed => {}
            }
        }

        info!(
            cycles = self.stats.cycles,
            segments = self.stats.segments,
            failures = self.stats.detector_failures,
            "detection loop finished"
        );
        &self.stats
    }

    /// One full cycle: pending control requests, detect, then [`step`](Self::step).
    pub fn run_cycle<D, S>(&mut self, detector: &mut D, sink: &mut S) -> CycleOutcome
    where
        D: Detector + ?Sized,
        S: RenderSink + ?Sized,
    {
        self.apply_requests(sink);
        if self.control.stop_requested() {
            return CycleOutcome::Stopped;
        }

        match detector.detect() {
            Ok(Some(detections)) => {
                let event = self.step(&detections, sink);
                CycleOutcome::Advanced {
                    gesture: self.stabilizer.current(),
                    event,
                }
            }
            Ok(None) => CycleOutcome::Exhausted,
            Err(e) => {
                self.stats.detector_failures += 1;
                warn!("detection failed, skipping frame: {:#}", e);
                CycleOutcome::DetectorFailed
            }
        }
    }

    /// Feed one frame of detections through the pipeline.
    pub fn step<S>(&mut self, detections: &[Detection], sink: &mut S) -> StrokeEvent
    where
        S: RenderSink + ?Sized,
    {
        let gesture = self.stabilizer.classify(detections);
        let position = hand_position(gesture, detections).map(|bbox| self.mapping.map(bbox.center()));
        let event = self.machine.advance(gesture, position, sink);

        self.stats.cycles += 1;
        *self.stats.gesture_counts.entry(gesture).or_insert(0) += 1;
        match event {
            StrokeEvent::Segment { .. } => self.stats.segments += 1,
            StrokeEvent::Cleared => self.stats.clears += 1,
            _ => {}
        }
        event
    }

    fn apply_requests<S>(&mut self, sink: &mut S)
    where
        S: RenderSink + ?Sized,
    {
        if let Some(surface) = self.control.take_resize() {
            debug!(?surface, "resizing drawing surface");
            self.mapping = self.mapping.with_surface(surface);
            self.machine.resize(surface);
            self.stabilizer.reset();
            sink.resize(surface);
            self.stats.resets += 1;
            // a resize subsumes any pending plain reset
            self.control.take_reset();
        } else if self.control.take_reset() {
            self.machine.reset();
            self.stabilizer.reset();
            self.stats.resets += 1;
        }
    }

    pub fn machine(&self) -> &StrokeMachine {
        &self.machine
    }

    pub fn stabilizer(&self) -> &GestureStabilizer {
        &self.stabilizer
    }

    pub fn mapping(&self) -> FrameMapping {
        self.mapping
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
