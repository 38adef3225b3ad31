use crate::*;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fmt, marker::PhantomData};
use tracing::{debug, trace};

/// A single-object tracker bound to one region of a frame.
pub trait ObjectTracker<F> {
    /// Advance the tracker to a later frame.
    fn update(&mut self, frame: &F) -> Result<()>;

    /// Return the current position estimate.
    fn position(&self) -> BoundingBox;
}

/// Finds objects of the counted category in a frame.
pub trait Detector<F> {
    type Tracker: ObjectTracker<F>;

    /// Detect objects in `frame`.
    ///
    /// Returns only detections with a confidence of at least `confidence`, each paired with a tracker started on the
    /// detected region.
    fn detect(&mut self, frame: &F, confidence: f32) -> Result<Vec<(Detection, Self::Tracker)>>;
}

/// What the cycle did with the most recent frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// No detector ran and no tracker was advanced.
    #[default]
    Waiting,
    /// The detector ran and replaced every tracker.
    Detecting,
    /// At least one tracker was advanced.
    Tracking,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Waiting => write!(f, "Waiting"),
            Status::Detecting => write!(f, "Detecting"),
            Status::Tracking => write!(f, "Tracking"),
        }
    }
}

/// The result of processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: usize,
    pub status: Status,
    /// Number of active trackers after the frame.
    pub trackers: usize,
    /// Detections that started a tracker on this frame. Empty on tracking frames.
    pub detections: Vec<Detection>,
    pub update: FrameUpdate,
}

/// Drives the detector and the low-level trackers frame by frame and feeds their output to a [`PeopleCounter`].
///
/// Every `skip_frames` frames (starting with the first) the detector replaces all trackers. On the remaining frames each
/// tracker is advanced. Either way the positions of the active trackers are then associated with the live tracks.
pub struct FrameCycle<F, D: Detector<F>> {
    detector: D,
    trackers: Vec<D::Tracker>,
    counter: PeopleCounter,
    skip_frames: usize,
    confidence: f32,
    frame_index: usize,
    status: Status,
    _frame: PhantomData<fn(&F)>,
}

impl<F, D: Detector<F>> fmt::Debug for FrameCycle<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCycle")
            .field("trackers", &self.trackers.len())
            .field("counter", &self.counter)
            .field("skip_frames", &self.skip_frames)
            .field("confidence", &self.confidence)
            .field("frame_index", &self.frame_index)
            .field("status", &self.status)
            .finish()
    }
}

impl<F, D: Detector<F>> FrameCycle<F, D> {
    /// Returns a new FrameCycle
    ///
    /// # Parameters
    ///
    /// * `detector`: The detector collaborator.
    /// * `config`: The run configuration. It is validated before use.
    pub fn new(detector: D, config: &CounterConfig) -> Result<FrameCycle<F, D>> {
        config.validate()?;
        Ok(FrameCycle {
            detector,
            trackers: vec![],
            counter: PeopleCounter::from_config(config),
            skip_frames: config.skip_frames,
            confidence: config.confidence,
            frame_index: 0,
            status: Status::Waiting,
            _frame: PhantomData,
        })
    }

    /// Return the counter fed by this cycle
    pub fn counter(&self) -> &PeopleCounter {
        &self.counter
    }

    /// Return the status of the most recent frame
    pub fn status(&self) -> Status {
        self.status
    }

    /// Return the index of the next frame to be processed
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Return the number of active low-level trackers
    pub fn trackers(&self) -> usize {
        self.trackers.len()
    }

    /// Consume the cycle and return its counter
    pub fn into_counter(self) -> PeopleCounter {
        self.counter
    }

    /// Process the next frame of the stream.
    ///
    /// Frames must be supplied in stream order. On error the frame is not counted and the cycle should be abandoned.
    pub fn process(&mut self, frame: &F) -> Result<FrameReport> {
        let frame_index = self.frame_index;
        self.status = Status::Waiting;
        let mut detected = Vec::new();

        if frame_index % self.skip_frames == 0 {
            self.status = Status::Detecting;
            let detections = self.detector.detect(frame, self.confidence)?;
            debug!(frame_index, detections = detections.len(), "detected");
            (detected, self.trackers) = detections
                .into_iter()
                .inspect(|(detection, _)| {
                    trace!(
                        frame_index,
                        id = %detection.id(),
                        confidence = detection.confidence(),
                        class_id = ?detection.class_id(),
                        bbox = ?detection.bbox().to_tlbr(),
                        "started tracker"
                    )
                })
                .unzip();
        } else {
            self.trackers.iter_mut().try_for_each(|tracker| {
                self.status = Status::Tracking;
                tracker.update(frame)
            })?;
            trace!(frame_index, trackers = self.trackers.len(), "tracked");
        }

        let positions = self
            .trackers
            .iter()
            .map(|tracker| tracker.position())
            .collect::<Vec<_>>();
        let update = self.counter.update(positions)?;

        self.frame_index += 1;

        Ok(FrameReport {
            frame_index,
            status: self.status,
            trackers: self.trackers.len(),
            detections: detected,
            update,
        })
    }
}
