use anyhow::{bail, Result};
use people_counter::*;

/// A synthetic frame: the true position of every visible object, keyed by object slot.
struct Scene {
    objects: Vec<(usize, BoundingBox, f32)>,
}

struct SlotTracker {
    slot: usize,
    bbox: BoundingBox,
}

impl ObjectTracker<Scene> for SlotTracker {
    fn update(&mut self, frame: &Scene) -> Result<()> {
        if let Some((_, bbox, _)) = frame.objects.iter().find(|(slot, _, _)| *slot == self.slot) {
            self.bbox = *bbox;
        }
        Ok(())
    }

    fn position(&self) -> BoundingBox {
        self.bbox
    }
}

#[derive(Default)]
struct SceneDetector;

impl Detector<Scene> for SceneDetector {
    type Tracker = SlotTracker;

    fn detect(&mut self, frame: &Scene, confidence: f32) -> Result<Vec<(Detection, SlotTracker)>> {
        Ok(frame
            .objects
            .iter()
            .filter(|(_, _, score)| *score >= confidence)
            .map(|(slot, bbox, score)| {
                (
                    Detection::new(None, *bbox, *score, Some(15)),
                    SlotTracker {
                        slot: *slot,
                        bbox: *bbox,
                    },
                )
            })
            .collect())
    }
}

struct FailingDetector;

impl Detector<Scene> for FailingDetector {
    type Tracker = SlotTracker;

    fn detect(&mut self, _frame: &Scene, _confidence: f32) -> Result<Vec<(Detection, SlotTracker)>> {
        bail!("inference failed")
    }
}

fn centered_at(x: i32, y: i32) -> BoundingBox {
    BoundingBox::new(x - 10, y - 20, x + 10, y + 20)
}

fn scene(objects: &[(usize, (i32, i32))]) -> Scene {
    Scene {
        objects: objects
            .iter()
            .map(|(slot, (x, y))| (*slot, centered_at(*x, *y), 0.9))
            .collect(),
    }
}

#[test]
fn detects_on_cadence_and_tracks_in_between() -> Result<()> {
    let config = CounterConfig::default().with_skip_frames(3).to_owned();
    let mut cycle = FrameCycle::new(SceneDetector::default(), &config)?;

    let statuses = (0..7)
        .map(|i| {
            let report = cycle.process(&scene(&[(0, (50, 50 + i * 5))]))?;
            Ok(report.status)
        })
        .collect::<Result<Vec<_>>>()?;

    assert_eq!(
        statuses,
        vec![
            Status::Detecting,
            Status::Tracking,
            Status::Tracking,
            Status::Detecting,
            Status::Tracking,
            Status::Tracking,
            Status::Detecting,
        ]
    );
    assert_eq!(cycle.frame_index(), 7);

    // one person followed across detections without interruption
    assert_eq!(cycle.counter().total(), 1);
    let track = cycle.counter().tracks().next().map(Track::hits);
    assert_eq!(track, Some(7));
    Ok(())
}

#[test]
fn waiting_when_there_is_nothing_to_track() -> Result<()> {
    let config = CounterConfig::default().with_skip_frames(2).to_owned();
    let mut cycle = FrameCycle::new(SceneDetector::default(), &config)?;

    assert_eq!(cycle.process(&scene(&[]))?.status, Status::Detecting);
    assert_eq!(cycle.process(&scene(&[]))?.status, Status::Waiting);
    assert_eq!(cycle.status(), Status::Waiting);
    assert_eq!(cycle.trackers(), 0);
    Ok(())
}

#[test]
fn low_confidence_detections_are_ignored() -> Result<()> {
    let config = CounterConfig::default().with_confidence(0.95).to_owned();
    let mut cycle = FrameCycle::new(SceneDetector::default(), &config)?;

    let report = cycle.process(&scene(&[(0, (50, 50)), (1, (200, 50))]))?;
    assert_eq!(report.trackers, 0);
    assert!(report.detections.is_empty());
    assert!(report.update.created.is_empty());
    Ok(())
}

#[test]
fn detections_are_reported_on_detection_frames() -> Result<()> {
    let config = CounterConfig::default().with_skip_frames(2).to_owned();
    let mut cycle = FrameCycle::new(SceneDetector::default(), &config)?;

    let report = cycle.process(&scene(&[(0, (50, 50)), (1, (200, 50))]))?;
    assert_eq!(
        report
            .detections
            .iter()
            .map(|detection| *detection.bbox())
            .collect::<Vec<_>>(),
        vec![centered_at(50, 50), centered_at(200, 50)]
    );
    assert!(report
        .detections
        .iter()
        .all(|detection| detection.class_id() == Some(15) && detection.confidence() == 0.9));
    assert_ne!(report.detections[0].id(), report.detections[1].id());

    let report = cycle.process(&scene(&[(0, (50, 55)), (1, (200, 55))]))?;
    assert_eq!(report.status, Status::Tracking);
    assert!(report.detections.is_empty());
    Ok(())
}

#[test]
fn people_walking_both_ways_are_counted() -> Result<()> {
    let config = CounterConfig::default()
        .with_skip_frames(4)
        .with_distance_threshold(30.0)
        .to_owned();
    let mut cycle = FrameCycle::new(SceneDetector::default(), &config)?;

    // slot 0 walks down, slot 1 walks up, both leave the scene after frame 11
    for i in 0..12 {
        cycle.process(&scene(&[(0, (100, 40 + i * 10)), (1, (400, 300 - i * 10))]))?;
    }
    assert_eq!(cycle.counter().track_store().len(), 2);

    // frame 12 is a detection frame with an empty scene
    let report = cycle.process(&scene(&[]))?;
    assert_eq!(report.status, Status::Detecting);
    assert_eq!(report.update.finished.len(), 2);

    let counter = cycle.into_counter();
    assert_eq!(
        counter.counts(),
        Counts {
            up: 1,
            down: 1,
            total: 2
        }
    );
    Ok(())
}

#[test]
fn detector_errors_propagate() -> Result<()> {
    let mut cycle = FrameCycle::new(FailingDetector, &CounterConfig::default())?;
    let err = cycle.process(&scene(&[(0, (50, 50))])).unwrap_err();
    assert_eq!(err.to_string(), "inference failed");
    assert_eq!(cycle.frame_index(), 0);
    Ok(())
}

#[test]
fn invalid_config_is_rejected() {
    let config = CounterConfig::default().with_skip_frames(0).to_owned();
    assert!(FrameCycle::new(SceneDetector::default(), &config).is_err());
}
