use crate::*;
use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Owns every live track, keyed by identifier in creation order.
///
/// Iteration order is the order in which identities were created. Association relies on this order to decide
/// which identity claims a contested bounding box, so removal must never reorder the remaining tracks.
#[derive(Debug, Default)]
pub struct TrackStore {
    /// The live tracks in insertion order.
    tracks: IndexMap<usize, Track>,
    /// Used to allocate identifiers to new tracks.
    next_id: usize,
}

impl TrackStore {
    /// Returns a new, empty TrackStore
    pub fn new() -> TrackStore {
        TrackStore::default()
    }

    /// Create a new track from a single bounding box and return its identifier.
    pub fn create(&mut self, bbox: BoundingBox) -> usize {
        let track_id = self.next_id;
        self.next_id += 1;
        self.tracks.insert(track_id, Track::new(track_id, bbox));
        debug!(track_id, center = ?bbox.center(), "created track");
        track_id
    }

    /// Append a bounding box to the history of an existing track.
    ///
    /// # Parameters
    ///
    /// * `track_id`: The identifier of a live track.
    /// * `bbox`: The bounding box observed for the track in the current frame.
    pub fn append(&mut self, track_id: usize, bbox: BoundingBox) -> Result<()> {
        let track = self
            .tracks
            .get_mut(&track_id)
            .ok_or_else(|| anyhow!("unknown track identifier {track_id}"))?;
        track.push(bbox);
        Ok(())
    }

    /// Remove a track and return its full position history, oldest first.
    pub fn remove(&mut self, track_id: usize) -> Result<Vec<BoundingBox>> {
        // shift_remove keeps the remaining tracks in creation order
        let track = self
            .tracks
            .shift_remove(&track_id)
            .ok_or_else(|| anyhow!("unknown track identifier {track_id}"))?;
        debug!(track_id, hits = track.hits(), "removed track");
        Ok(track.into_history())
    }

    /// Return a read view of the live tracks in creation order.
    pub fn all(&self) -> &IndexMap<usize, Track> {
        &self.tracks
    }

    /// Return an iterator over the live tracks in creation order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Return the live track with the given identifier
    pub fn get(&self, track_id: usize) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    /// Return the number of live tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Return true when no track is live
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Return the number of tracks ever created
    pub fn created(&self) -> usize {
        self.next_id
    }
}
