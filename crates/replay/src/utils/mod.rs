pub mod frame_source;
pub mod report;
