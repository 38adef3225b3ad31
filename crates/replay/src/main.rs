mod utils;
use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use people_counter::{CounterConfig, FrameCycle, MatchingKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use utils::*;

/// Count people crossing the frame from a file of per-frame detections
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV of detections with header `frame,slot,left,top,right,bottom,confidence`
    #[arg(short, long)]
    input: PathBuf,

    /// Write the live tracks of every frame to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the final counts to this JSON file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// JSON configuration file. Command line values take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the detector every N frames [default: 30]
    #[arg(short, long)]
    skip_frames: Option<usize>,

    /// The minimum detection confidence [default: 0.5]
    #[arg(short, long)]
    confidence: Option<f32>,

    /// The maximum center distance in pixels for matching a track [default: 30.0]
    #[arg(short, long)]
    distance: Option<f64>,

    /// The matching strategy, `greedy` or `optimal` [default: greedy]
    #[arg(short, long)]
    matching: Option<MatchingKind>,

    /// The frame rate of the source, used to report elapsed time [default: 30]
    #[arg(long)]
    fps: Option<u32>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "people_counter={0},replay={0}",
            args.log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let summary = run(&args)?;
    println!(
        "Time: {} Up: {} Down: {} Total: {}",
        summary.elapsed, summary.up, summary.down, summary.total
    );
    Ok(())
}

/// Load the configuration file if any, then apply the command line overrides.
fn load_config(args: &Args) -> Result<CounterConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => CounterConfig::default(),
    };

    if let Some(skip_frames) = args.skip_frames {
        config.with_skip_frames(skip_frames);
    }
    if let Some(confidence) = args.confidence {
        config.with_confidence(confidence);
    }
    if let Some(distance) = args.distance {
        config.with_distance_threshold(distance);
    }
    if let Some(matching) = args.matching {
        config.with_matching(matching);
    }
    if let Some(fps) = args.fps {
        config.with_fps(fps);
    }

    config
        .validate()
        .context("invalid counter configuration")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<CounterConfig> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("failed to parse {}", path.display()))
}

fn run(args: &Args) -> Result<report::Summary> {
    let config = load_config(args)?;
    let log = frame_source::DetectionLog::read(&args.input)?;
    info!(
        input = %args.input.display(),
        detections = log.len(),
        frames = log.frame_count(),
        skip_frames = config.skip_frames,
        distance_threshold = config.distance_threshold,
        matching = %config.matching,
        "starting replay"
    );

    let mut writer = args
        .output
        .as_deref()
        .map(report::TrackWriter::create)
        .transpose()?;

    let mut cycle = FrameCycle::new(frame_source::CsvDetector, &config)?;

    (0..log.frame_count()).try_for_each(|index| {
        let frame = log.frame(index);
        let report = cycle.process(&frame)?;

        if let Some(writer) = writer.as_mut() {
            writer.write_frame(&report, cycle.counter())?;
        }

        if !report.update.finished.is_empty() {
            debug!(
                frame = frame.index,
                finished = %report
                    .update
                    .finished
                    .iter()
                    .map(|track| format!("{}:{:?}", track.track_id, track.direction))
                    .join(","),
                "tracks left the scene"
            );
        }

        Ok::<_, anyhow::Error>(())
    })?;

    if let Some(writer) = writer.as_mut() {
        writer.flush()?;
    }

    let summary = report::Summary::new(log.frame_count(), cycle.counter(), &config);
    if let Some(path) = &args.summary {
        summary.write_json(path)?;
    }

    info!(
        up = summary.up,
        down = summary.down,
        total = summary.total,
        live = summary.live,
        "replay finished"
    );

    Ok(summary)
}
