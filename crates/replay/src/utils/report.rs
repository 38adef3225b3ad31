use anyhow::{Context, Result};
use people_counter::{CounterConfig, FrameReport, MatchingKind, PeopleCounter, Status};
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};

/// One live track in one frame.
///
/// Output format
/// <frame>,<id>,<left>,<top>,<right>,<bottom>,<status>
/// 12,0,40,60,60,100,Tracking
#[derive(Debug, Serialize)]
struct TrackRecord {
    frame: usize,
    id: usize,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    status: Status,
}

/// Writes the live tracks of every frame to a CSV file.
pub struct TrackWriter {
    writer: csv::Writer<File>,
}

impl TrackWriter {
    pub fn create(path: &Path) -> Result<TrackWriter> {
        let writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(TrackWriter { writer })
    }

    pub fn write_frame(&mut self, report: &FrameReport, counter: &PeopleCounter) -> Result<()> {
        counter.tracks().try_for_each(|track| {
            let bbox = track.bbox();
            self.writer.serialize(TrackRecord {
                frame: report.frame_index,
                id: track.track_id(),
                left: bbox.left(),
                top: bbox.top(),
                right: bbox.right(),
                bottom: bbox.bottom(),
                status: report.status,
            })
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// The outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub frames: usize,
    pub elapsed: String,
    pub up: usize,
    pub down: usize,
    pub total: usize,
    pub live: usize,
    pub matching: MatchingKind,
    pub distance_threshold: f64,
}

impl Summary {
    pub fn new(frames: usize, counter: &PeopleCounter, config: &CounterConfig) -> Summary {
        Summary {
            frames,
            // time stamp of the last frame, the first frame is at zero
            elapsed: format_elapsed(frames.saturating_sub(1), config.fps),
            up: counter.total_up(),
            down: counter.total_down(),
            total: counter.total(),
            live: counter.track_store().len(),
            matching: config.matching,
            distance_threshold: config.distance_threshold,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

/// Format the stream time of frame index `frame` as `H:MM:SS[.ffffff]`, at millisecond resolution.
pub fn format_elapsed(frame: usize, fps: u32) -> String {
    let micros = frame as u64 * 1_000 / u64::from(fps.max(1)) * 1_000;
    let seconds = micros / 1_000_000;
    let fraction = micros % 1_000_000;
    let clock = format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    );
    if fraction == 0 {
        clock
    } else {
        format!("{clock}.{fraction:06}")
    }
}
