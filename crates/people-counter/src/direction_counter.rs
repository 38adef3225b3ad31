use crate::*;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Enumeration type for the vertical direction of a finished track:
///
/// - `Down` means the last observed center is strictly lower in the frame than the first one.
/// - `Up` covers everything else, including tracks that did not move vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Classify a position history by comparing its first and last vertical center.
    ///
    /// Returns `None` for an empty history.
    pub fn of(history: &[BoundingBox]) -> Option<Direction> {
        let (_, first_y) = history.first()?.center();
        let (_, last_y) = history.last()?.center();
        if first_y < last_y {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

/// Accumulates the direction of every finished track.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectionCounter {
    total_up: usize,
    total_down: usize,
}

impl DirectionCounter {
    /// Returns a new DirectionCounter with both totals at zero
    pub fn new() -> DirectionCounter {
        DirectionCounter::default()
    }

    /// Classify the history of a finished track and increment the matching total.
    ///
    /// # Parameters
    ///
    /// * `history`: The position history of the track, oldest first. Must not be empty.
    pub fn record(&mut self, history: &[BoundingBox]) -> Result<Direction> {
        let Some(direction) = Direction::of(history) else {
            bail!("cannot count an empty track history");
        };
        match direction {
            Direction::Up => self.total_up += 1,
            Direction::Down => self.total_down += 1,
        }
        info!(
            ?direction,
            hits = history.len(),
            total_up = self.total_up,
            total_down = self.total_down,
            "counted track"
        );
        Ok(direction)
    }

    /// Return the number of tracks counted as moving up
    pub fn total_up(&self) -> usize {
        self.total_up
    }

    /// Return the number of tracks counted as moving down
    pub fn total_down(&self) -> usize {
        self.total_down
    }
}
