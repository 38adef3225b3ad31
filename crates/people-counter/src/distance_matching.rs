use crate::*;
use ndarray::*;

/// Compute the center distance between a bounding box and a list of candidates.
///
/// # Parameters
///
/// * `bbox`: A bounding box.
/// * `candidates`: A list of candidate bounding boxes.
///
/// # Returns
///
/// The Euclidean distance in pixels between the center of `bbox` and the center of each candidate.
pub fn center_distance(bbox: &BoundingBox, candidates: &[BoundingBox]) -> Array1<f64> {
    candidates
        .iter()
        .map(|candidate| bbox.distance(candidate))
        .collect()
}

/// Center distance cost metric.
///
/// # Parameters
///
/// * `tracks`: A list of tracks. The most recent bounding box of each track is used.
/// * `candidates`: A list of candidate bounding boxes.
///
/// # Returns
///
/// A cost matrix of shape `tracks.len(), candidates.len()` where entry (i, j) is the distance between the centers of
/// `tracks[i].bbox()` and `candidates[j]`.
pub fn center_distance_cost(tracks: &[&Track], candidates: &[BoundingBox]) -> Array2<f64> {
    Array2::from_shape_fn((tracks.len(), candidates.len()), |(row, col)| {
        tracks[row].bbox().distance(&candidates[col])
    })
}
