use crate::MatchingKind;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Parameters of a counting run.
///
/// Only `distance_threshold` and `matching` are consumed by the association step. The remaining fields drive the
/// detect/track cadence and the detector collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Maximum center-to-center distance in pixels for a track to match a bounding box (inclusive).
    pub distance_threshold: f64,
    /// Re-detect every `skip_frames` frames, advance the low-level trackers otherwise.
    pub skip_frames: usize,
    /// Minimum detector confidence for a detection to seed a tracker.
    pub confidence: f32,
    /// Frame rate of the source, used to report elapsed video time.
    pub fps: u32,
    /// Strategy used to associate bounding boxes with live tracks.
    pub matching: MatchingKind,
}

impl Default for CounterConfig {
    fn default() -> Self {
        CounterConfig {
            distance_threshold: 30.0,
            skip_frames: 30,
            confidence: 0.5,
            fps: 30,
            matching: MatchingKind::Greedy,
        }
    }
}

impl CounterConfig {
    /// Set distance_threshold
    pub fn with_distance_threshold(&mut self, distance_threshold: f64) -> &mut Self {
        self.distance_threshold = distance_threshold;
        self
    }

    /// Set skip_frames
    pub fn with_skip_frames(&mut self, skip_frames: usize) -> &mut Self {
        self.skip_frames = skip_frames;
        self
    }

    /// Set confidence
    pub fn with_confidence(&mut self, confidence: f32) -> &mut Self {
        self.confidence = confidence;
        self
    }

    /// Set fps
    pub fn with_fps(&mut self, fps: u32) -> &mut Self {
        self.fps = fps;
        self
    }

    /// Set matching
    pub fn with_matching(&mut self, matching: MatchingKind) -> &mut Self {
        self.matching = matching;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.distance_threshold.is_finite() && self.distance_threshold >= 0.0,
            "distance threshold must be a finite, non-negative number of pixels, got {}",
            self.distance_threshold
        );
        ensure!(self.skip_frames > 0, "skip frames must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.confidence),
            "confidence must be within [0, 1], got {}",
            self.confidence
        );
        ensure!(self.fps > 0, "fps must be at least 1");
        Ok(())
    }
}
