//! Drives a recorded detection stream through the drawing pipeline

use crate::settings::Settings;
use anyhow::{Context, Result};
use handsketch_core::scheduler::{IntervalPacer, Unpaced};
use handsketch_core::{Detector, FrameMapping, Pacer, Session, SessionStats};
use handsketch_cv::{BackgroundDetector, Postprocessed, RasterCanvas, ReplayDetector};
use std::path::{Path, PathBuf};
use tracing::info;

/// How a replay should run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub recording: PathBuf,
    /// Honor the detection interval instead of replaying as fast as possible.
    pub realtime: bool,
    /// Run the detector on a worker thread.
    pub background: bool,
    /// Fixed seed for stroke colors.
    pub seed: Option<u64>,
}

/// Replay output: the painted canvas plus session counters.
pub struct ReplayOutcome {
    pub canvas: RasterCanvas,
    pub stats: SessionStats,
}

pub fn run_replay(settings: &Settings, options: &ReplayOptions) -> Result<ReplayOutcome> {
    let surface = settings.surface()?;
    let frame = settings.detector.frame()?;
    let mapping = FrameMapping::new(frame, surface);

    let recording = ReplayDetector::load(&options.recording)?;
    info!(frames = recording.remaining(), path = ?options.recording, "loaded recording");

    let filtered = Postprocessed::new(recording, settings.detector.clone());
    let mut detector: Box<dyn Detector> = if options.background {
        Box::new(BackgroundDetector::spawn(filtered))
    } else {
        Box::new(filtered)
    };

    let pacer: Box<dyn Pacer> = if options.realtime {
        Box::new(IntervalPacer::from_config(&settings.pipeline))
    } else {
        Box::new(Unpaced)
    };

    let mut session = match options.seed {
        Some(seed) => Session::seeded(&settings.pipeline, mapping, pacer, seed)?,
        None => Session::new(&settings.pipeline, mapping, pacer)?,
    };

    let mut canvas = RasterCanvas::new(surface, settings.canvas.background);
    let stats = session.run(&mut detector, &mut canvas).clone();

    Ok(ReplayOutcome { canvas, stats })
}

/// Write session counters as pretty JSON
pub fn export_stats(stats: &SessionStats, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize session stats")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write stats to: {:?}", path))?;
    Ok(())
}
