use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod replay;
mod settings;

use replay::{ReplayOptions, export_stats, run_replay};
use settings::Settings;

#[derive(Parser)]
#[command(name = "handsketch")]
#[command(about = "Replay recorded hand detections as a gesture drawing")]
#[command(version)]
struct Cli {
    /// Recorded detections (JSON array of frames).
    #[arg(long)]
    detections: PathBuf,

    /// Settings file (JSON); defaults apply to anything missing.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the drawing.
    #[arg(long, default_value = "handtrack_drawing.png")]
    out: PathBuf,

    /// Override canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Override canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Seed stroke colors for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Pace detection cycles at the configured interval.
    #[arg(long)]
    realtime: bool,

    /// Run the detector on a worker thread.
    #[arg(long)]
    background: bool,

    /// Write session statistics (JSON).
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handsketch=info,handsketch_core=info,handsketch_cv=info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(width) = cli.width {
        settings.canvas.width = width;
    }
    if let Some(height) = cli.height {
        settings.canvas.height = height;
    }
    settings.validate()?;

    let options = ReplayOptions {
        recording: cli.detections,
        realtime: cli.realtime,
        background: cli.background,
        seed: cli.seed,
    };

    let outcome = run_replay(&settings, &options)?;
    outcome
        .canvas
        .save_png(&cli.out)
        .with_context(|| format!("Could not export drawing to {:?}", cli.out))?;

    if let Some(path) = &cli.stats {
        export_stats(&outcome.stats, path)?;
    }

    let stats = &outcome.stats;
    println!("Replay completed:");
    println!("  - Cycles: {}", stats.cycles);
    println!("  - Segments drawn: {}", stats.segments);
    println!("  - Clears: {}", stats.clears);
    println!("  - Detector failures: {}", stats.detector_failures);
    println!("  - Drawing saved: {:?}", cli.out);

    Ok(())
}
