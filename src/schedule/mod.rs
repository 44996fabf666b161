//! Skip planning, the frame scheduler state machine and the ETA estimator.

/// Run configuration.
pub mod config;
/// Remaining-time forecast from render and copy timings.
pub mod eta;
/// Dry-run skip plan over a frame range.
pub mod plan;
/// Incremental render/copy scheduler.
pub mod scheduler;
