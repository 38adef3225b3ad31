use std::hash::{Hash, Hasher};

use crate::*;

/// The position history of a single identity.
///
/// A track is created with exactly one bounding box and only ever grows, so the history is never empty.
#[derive(Debug, Clone)]
pub struct Track {
    /// A unique track identifier.
    track_id: usize,
    /// One bounding box per frame in which the identity was observed, oldest first.
    history: Vec<BoundingBox>,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.track_id == other.track_id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.track_id.hash(state);
    }
}

impl Track {
    /// Returns a new Track
    ///
    /// # Parameters
    ///
    /// * `track_id`: A unique track identifier.
    /// * `bbox`: The bounding box the track originates from.
    pub fn new(track_id: usize, bbox: BoundingBox) -> Track {
        Track {
            track_id,
            history: vec![bbox],
        }
    }

    /// Return the identifier of the track
    pub fn track_id(&self) -> usize {
        self.track_id
    }

    /// Return the full position history, oldest first
    pub fn history(&self) -> &[BoundingBox] {
        &self.history
    }

    /// Return the bounding box the track was created with
    pub fn first(&self) -> &BoundingBox {
        &self.history[0]
    }

    /// Return the most recently observed bounding box
    pub fn bbox(&self) -> &BoundingBox {
        &self.history[self.history.len() - 1]
    }

    /// Return the number of frames in which the track was observed
    pub fn hits(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn push(&mut self, bbox: BoundingBox) {
        self.history.push(bbox);
    }

    pub(crate) fn into_history(self) -> Vec<BoundingBox> {
        self.history
    }
}
