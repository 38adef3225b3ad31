use crate::*;
use anyhow::{anyhow, Result};
use fixedbitset::FixedBitSet;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The matched pairs, the unmatched track identifiers and the unmatched candidates of one association pass.
pub type Assignment = (Vec<Match>, Vec<usize>, Vec<BoundingBox>);

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub track_id: usize,
    pub bbox: BoundingBox,
    pub distance: f64,
}

impl Match {
    /// Return a new Match
    ///
    /// # Parameters
    ///
    /// * `track_id`: The matched track identifier.
    /// * `bbox`: The matched candidate bounding box.
    /// * `distance`: The center distance between the track and the candidate.
    pub fn new(track_id: usize, bbox: BoundingBox, distance: f64) -> Match {
        Match {
            track_id,
            bbox,
            distance,
        }
    }

    /// Return the distance of the match
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// Assigns the candidate bounding boxes of a frame to live tracks.
///
/// Implementations must:
///
/// - match each track to at most one candidate and each candidate to at most one track,
/// - never match a pair whose center distance is larger than `max_distance`,
/// - return matches and unmatched tracks in the order of `tracks`,
/// - return unmatched candidates in the order of `candidates`.
pub trait MatchingStrategy: fmt::Debug {
    /// Solve the assignment for one frame.
    ///
    /// # Parameters
    ///
    /// * `tracks`: The live tracks in creation order.
    /// * `candidates`: The bounding boxes produced for the current frame.
    /// * `max_distance`: Gating threshold in pixels (inclusive).
    fn assign(
        &self,
        tracks: &[&Track],
        candidates: Vec<BoundingBox>,
        max_distance: f64,
    ) -> Result<Assignment>;
}

/// Greedy nearest-neighbour matching.
///
/// Tracks are visited in creation order and each one claims the nearest candidate that is still unclaimed and within
/// `max_distance`. Equal distances resolve to the candidate that appears first.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyMatching;

impl MatchingStrategy for GreedyMatching {
    fn assign(
        &self,
        tracks: &[&Track],
        candidates: Vec<BoundingBox>,
        max_distance: f64,
    ) -> Result<Assignment> {
        let cost_matrix = distance_matching::center_distance_cost(tracks, &candidates);
        let mut claimed = FixedBitSet::with_capacity(candidates.len());
        let mut matches = Vec::with_capacity(tracks.len().min(candidates.len()));
        let mut unmatched_tracks = Vec::new();

        for (row, track) in tracks.iter().enumerate() {
            let nearest = cost_matrix
                .row(row)
                .indexed_iter()
                .filter(|(col, distance)| !claimed.contains(*col) && **distance <= max_distance)
                .fold(None, |nearest: Option<(usize, f64)>, (col, &distance)| {
                    match nearest {
                        Some((_, best)) if best <= distance => nearest,
                        _ => Some((col, distance)),
                    }
                });

            match nearest {
                Some((col, distance)) => {
                    claimed.insert(col);
                    matches.push(Match::new(track.track_id(), candidates[col], distance));
                }
                None => unmatched_tracks.push(track.track_id()),
            }
        }

        let unmatched_candidates = candidates
            .into_iter()
            .enumerate()
            .filter(|(col, _)| !claimed.contains(*col))
            .map(|(_, bbox)| bbox)
            .collect();

        Ok((matches, unmatched_tracks, unmatched_candidates))
    }
}

/// Minimum total cost matching.
///
/// Solves the linear assignment problem over the center distance cost matrix with the Kuhn-Munkres (aka hungarian)
/// algorithm and then discards any pair above `max_distance`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimalMatching;

impl MatchingStrategy for OptimalMatching {
    fn assign(
        &self,
        tracks: &[&Track],
        candidates: Vec<BoundingBox>,
        max_distance: f64,
    ) -> Result<Assignment> {
        if tracks.is_empty() || candidates.is_empty() {
            return Ok((
                vec![],
                tracks.iter().map(|track| track.track_id()).collect(),
                candidates,
            ));
        }

        let cost_matrix = distance_matching::center_distance_cost(tracks, &candidates);

        // kuhn_munkres_min requires rows <= columns
        let (gated, transposed) = if cost_matrix.nrows() > cost_matrix.ncols() {
            (cost_matrix.t(), true)
        } else {
            (cost_matrix.view(), false)
        };

        // gate then scale to integer millipixels as the solver needs an `Ord` weight
        let gate = max_distance + 1.0;
        let weights = Matrix::from_vec(
            gated.nrows(),
            gated.ncols(),
            gated
                .iter()
                .map(|v| (v.min(gate) * 1_000.0).round() as i64)
                .collect(),
        )
        .map_err(|err| anyhow!("invalid cost matrix: {err:?}"))?;

        let (_, col_indices) = kuhn_munkres_min(&weights);

        let mut assigned: Vec<Option<usize>> = vec![None; tracks.len()];
        col_indices.into_iter().enumerate().for_each(|(row, col)| {
            let (track_idx, candidate_idx) = if transposed { (col, row) } else { (row, col) };
            if cost_matrix[[track_idx, candidate_idx]] <= max_distance {
                assigned[track_idx] = Some(candidate_idx);
            }
        });

        let mut claimed = FixedBitSet::with_capacity(candidates.len());
        let mut matches = Vec::with_capacity(tracks.len().min(candidates.len()));
        let mut unmatched_tracks = Vec::new();
        tracks
            .iter()
            .zip(assigned)
            .enumerate()
            .for_each(|(track_idx, (track, candidate_idx))| match candidate_idx {
                Some(col) => {
                    claimed.insert(col);
                    matches.push(Match::new(
                        track.track_id(),
                        candidates[col],
                        cost_matrix[[track_idx, col]],
                    ));
                }
                None => unmatched_tracks.push(track.track_id()),
            });

        let unmatched_candidates = candidates
            .into_iter()
            .enumerate()
            .filter(|(col, _)| !claimed.contains(*col))
            .map(|(_, bbox)| bbox)
            .collect();

        Ok((matches, unmatched_tracks, unmatched_candidates))
    }
}

/// Selects a matching strategy by name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingKind {
    #[default]
    Greedy,
    Optimal,
}

impl MatchingKind {
    /// Return a boxed instance of the selected strategy
    pub fn strategy(&self) -> Box<dyn MatchingStrategy> {
        match self {
            MatchingKind::Greedy => Box::new(GreedyMatching),
            MatchingKind::Optimal => Box::new(OptimalMatching),
        }
    }
}

impl FromStr for MatchingKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(MatchingKind::Greedy),
            "optimal" => Ok(MatchingKind::Optimal),
            other => Err(format!(
                "unknown matching strategy '{other}', expected 'greedy' or 'optimal'"
            )),
        }
    }
}

impl fmt::Display for MatchingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingKind::Greedy => write!(f, "greedy"),
            MatchingKind::Optimal => write!(f, "optimal"),
        }
    }
}
