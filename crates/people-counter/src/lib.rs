mod bounding_box;
mod config;
mod counter;
mod detection;
mod direction_counter;
pub mod distance_matching;
mod frame_cycle;
pub mod linear_assignment;
mod track;
mod track_store;

pub use bounding_box::BoundingBox;
pub use config::CounterConfig;
pub use counter::{Counts, FinishedTrack, FrameUpdate, PeopleCounter};
pub use detection::Detection;
pub use direction_counter::{Direction, DirectionCounter};
pub use frame_cycle::{Detector, FrameCycle, FrameReport, ObjectTracker, Status};
pub use linear_assignment::{
    Assignment, GreedyMatching, Match, MatchingKind, MatchingStrategy, OptimalMatching,
};
pub use track::Track;
pub use track_store::TrackStore;
