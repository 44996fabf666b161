//! holdframe renders an animated scene frame by frame and copies held frames instead of
//! re-rendering them.
//!
//! A frame is held when none of the scene's animation curves moved since the previous frame. The
//! public API is built around two passes that share one duplicate rule:
//!
//! - [`plan`] sweeps a range and reports which frames will be copied
//! - [`FrameScheduler`] steps a caller-owned [`SchedulerState`] through the same range, rendering
//!   or copying each frame and keeping progress and an ETA current
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Keyframed curves and interpolation shapes.
pub mod animation;
/// Change signatures and the duplicate rule.
pub mod detect;
/// Video stitching.
pub mod encode;
/// Frame types, errors and scoped time.
pub mod foundation;
/// Output layout, file sink and clock.
pub mod output;
/// Renderer contract and the preview rasterizer.
pub mod render;
/// Scene model and the animation source contract.
pub mod scene;
/// Planner, scheduler and ETA.
pub mod schedule;


pub use crate::animation::curve::{Curve, Extrapolation, Keyframe};
pub use crate::animation::ease::{Easing, Interpolation};
pub use crate::detect::signature::{
    ChangeSignal, DEFAULT_TOLERANCE, DuplicateRule, Signature, frame_signature, signature,
};
pub use crate::encode::ffmpeg::{StitchOpts, is_ffmpeg_on_path, stitch};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{HoldError, HoldResult};
pub use crate::foundation::time_scope::{ScopedTime, TimeCursor};
pub use crate::output::clock::{Clock, MonotonicClock};
pub use crate::output::format::{OutputFormat, frame_path, images_dir};
pub use crate::output::sink::{FileSink, FsSink};
pub use crate::render::Renderer;
pub use crate::render::preview::PreviewRenderer;
pub use crate::scene::model::{Channel, Object, Scene};
pub use crate::scene::source::{AnimatedEntity, AnimationSource, EntityKind};
pub use crate::schedule::config::RunConfig;
pub use crate::schedule::eta::{TimingStats, estimate};
pub use crate::schedule::plan::{PlanCounts, SkipPlan, plan};
pub use crate::schedule::scheduler::{
    FrameAction, FrameReport, FrameScheduler, RunState, RunStats, SchedulerState, StepOutcome,
    StopHandle,
};
