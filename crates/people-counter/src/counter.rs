use crate::*;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A snapshot of the directional totals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Finished tracks that moved up (or did not move vertically).
    pub up: usize,
    /// Finished tracks that moved down.
    pub down: usize,
    /// Tracks ever created.
    pub total: usize,
}

/// A track that disappeared during an update and has been counted.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedTrack {
    pub track_id: usize,
    pub direction: Direction,
    pub history: Vec<BoundingBox>,
}

/// The outcome of associating one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameUpdate {
    /// Tracks extended with a bounding box from this frame.
    pub matched: Vec<Match>,
    /// Tracks created from unmatched bounding boxes.
    pub created: Vec<usize>,
    /// Tracks that found no match and were counted.
    pub finished: Vec<FinishedTrack>,
}

/// Associates the tracker output of each frame with known identities and counts the direction of every identity that
/// leaves the scene.
///
/// # Examples
///
/// ```
/// use people_counter::{BoundingBox, PeopleCounter};
///
/// let mut counter = PeopleCounter::default();
///
/// // a person enters, moves down and leaves
/// counter.update(vec![BoundingBox::new(40, 40, 60, 60)])?;
/// counter.update(vec![BoundingBox::new(40, 70, 60, 90)])?;
/// counter.update(vec![])?;
///
/// assert_eq!(counter.total_down(), 1);
/// assert_eq!(counter.total_up(), 0);
/// assert_eq!(counter.total(), 1);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct PeopleCounter {
    /// Gating threshold in pixels. Associations with a larger center distance are disregarded.
    max_distance: f64,
    /// The live tracks.
    store: TrackStore,
    /// The directional totals of finished tracks.
    directions: DirectionCounter,
    /// The association algorithm.
    matching: Box<dyn MatchingStrategy>,
}

impl Default for PeopleCounter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PeopleCounter {
    /// Returns a new PeopleCounter using greedy matching
    ///
    /// # Arguments
    ///
    /// * `max_distance`: Gating threshold in pixels. Default `30.0`.
    pub fn new(max_distance: Option<f64>) -> PeopleCounter {
        PeopleCounter {
            max_distance: max_distance.unwrap_or(30.0),
            store: TrackStore::new(),
            directions: DirectionCounter::new(),
            matching: Box::new(GreedyMatching),
        }
    }

    /// Returns a new PeopleCounter configured from `config`
    pub fn from_config(config: &CounterConfig) -> PeopleCounter {
        let mut counter = PeopleCounter::new(Some(config.distance_threshold));
        counter.with_matching(config.matching.strategy());
        counter
    }

    /// Set max_distance
    pub fn with_max_distance(&mut self, max_distance: f64) -> &mut Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the matching strategy
    pub fn with_matching(&mut self, matching: Box<dyn MatchingStrategy>) -> &mut Self {
        self.matching = matching;
        self
    }

    /// Return the gating threshold
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Return the live tracks
    pub fn track_store(&self) -> &TrackStore {
        &self.store
    }

    /// Return an iterator over the live tracks in creation order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.store.tracks()
    }

    /// Return the number of tracks counted as moving up
    pub fn total_up(&self) -> usize {
        self.directions.total_up()
    }

    /// Return the number of tracks counted as moving down
    pub fn total_down(&self) -> usize {
        self.directions.total_down()
    }

    /// Return the number of tracks ever created
    pub fn total(&self) -> usize {
        self.store.created()
    }

    /// Return a snapshot of the totals
    pub fn counts(&self) -> Counts {
        Counts {
            up: self.total_up(),
            down: self.total_down(),
            total: self.total(),
        }
    }

    /// Associate the bounding boxes of the current frame with the live tracks.
    ///
    /// Matched tracks are extended, unmatched tracks are removed and counted, and unmatched bounding boxes start new
    /// tracks in the order they were given.
    ///
    /// # Parameters
    ///
    /// * `bboxes`: One bounding box per active low-level tracker, in tracker order.
    pub fn update(&mut self, bboxes: Vec<BoundingBox>) -> Result<FrameUpdate> {
        let (matches, unmatched_tracks, unmatched_bboxes) = {
            let tracks = self.store.tracks().collect::<Vec<_>>();
            self.matching.assign(&tracks, bboxes, self.max_distance)?
        };

        trace!(
            matched = matches.len(),
            lost = unmatched_tracks.len(),
            new = unmatched_bboxes.len(),
            "associated frame"
        );

        // Step 1
        // Extend matched tracks
        matches.iter().try_for_each(|r#match| {
            debug!(
                track_id = r#match.track_id,
                distance = r#match.distance(),
                "extended track"
            );
            self.store.append(r#match.track_id, r#match.bbox)
        })?;

        // Step 2
        // Count and remove tracks without a match
        let finished = unmatched_tracks
            .into_iter()
            .map(|track_id| {
                let history = self.store.remove(track_id)?;
                let direction = self.directions.record(&history)?;
                Ok(FinishedTrack {
                    track_id,
                    direction,
                    history,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Step 3
        // Start a track for every remaining bounding box
        let created = unmatched_bboxes
            .into_iter()
            .map(|bbox| self.store.create(bbox))
            .collect::<Vec<_>>();

        Ok(FrameUpdate {
            matched: matches,
            created,
            finished,
        })
    }
}
