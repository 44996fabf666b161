//! Video stitching of finished frame sequences.

/// `ffmpeg` command construction and execution.
pub mod ffmpeg;
