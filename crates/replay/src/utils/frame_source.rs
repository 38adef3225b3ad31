use anyhow::{Context, Result};
use indexmap::IndexMap;
use people_counter::{BoundingBox, Detection, Detector, ObjectTracker};
use serde::Deserialize;
use std::{io::Read, path::Path};

/// One detected object in one frame.
///
/// Input format
/// <frame>,<slot>,<left>,<top>,<right>,<bottom>,<confidence>
/// 0,3,102,547,186,798,0.91
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionRecord {
    pub frame: usize,
    /// Which low-level tracker follows this object between detections.
    pub slot: usize,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub confidence: f32,
}

impl DetectionRecord {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.right, self.bottom)
    }
}

/// The records of a single frame.
#[derive(Debug, Clone, Default)]
pub struct ReplayFrame {
    pub index: usize,
    pub records: Vec<DetectionRecord>,
}

/// Every record of a detection file grouped by frame.
#[derive(Debug, Default)]
pub struct DetectionLog {
    frames: IndexMap<usize, Vec<DetectionRecord>>,
}

impl DetectionLog {
    /// Read a detection CSV file with a header row.
    pub fn read(path: &Path) -> Result<DetectionLog> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        DetectionLog::from_reader(file).with_context(|| format!("failed to read {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<DetectionLog> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut frames = IndexMap::<usize, Vec<DetectionRecord>>::new();
        for (line, record) in reader.deserialize::<DetectionRecord>().enumerate() {
            let record = record.with_context(|| format!("invalid detection on row {}", line + 1))?;
            frames.entry(record.frame).or_insert_with(Vec::new).push(record);
        }

        Ok(DetectionLog { frames })
    }

    /// Return the number of frames to replay, i.e. one past the highest frame index.
    pub fn frame_count(&self) -> usize {
        self.frames.keys().max().map_or(0, |frame| frame + 1)
    }

    /// Return the number of records in the log
    pub fn len(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    /// Return the records of a frame. Frames without records are empty.
    pub fn frame(&self, index: usize) -> ReplayFrame {
        ReplayFrame {
            index,
            records: self.frames.get(&index).cloned().unwrap_or_default(),
        }
    }
}

/// Detector collaborator backed by the records of a detection file.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvDetector;

impl Detector<ReplayFrame> for CsvDetector {
    type Tracker = SlotTracker;

    fn detect(
        &mut self,
        frame: &ReplayFrame,
        confidence: f32,
    ) -> Result<Vec<(Detection, SlotTracker)>> {
        Ok(frame
            .records
            .iter()
            .filter(|record| record.confidence >= confidence)
            .map(|record| {
                (
                    Detection::new(None, record.bbox(), record.confidence, None),
                    SlotTracker::new(record.slot, record.bbox()),
                )
            })
            .collect())
    }
}

/// Low-level tracker collaborator that follows one slot of the detection file.
///
/// When the slot has no record in a frame the previous position is kept.
#[derive(Debug, Clone)]
pub struct SlotTracker {
    slot: usize,
    bbox: BoundingBox,
}

impl SlotTracker {
    pub fn new(slot: usize, bbox: BoundingBox) -> SlotTracker {
        SlotTracker { slot, bbox }
    }
}

impl ObjectTracker<ReplayFrame> for SlotTracker {
    fn update(&mut self, frame: &ReplayFrame) -> Result<()> {
        if let Some(record) = frame.records.iter().find(|record| record.slot == self.slot) {
            self.bbox = record.bbox();
        }
        Ok(())
    }

    fn position(&self) -> BoundingBox {
        self.bbox
    }
}
