use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::{
    detect::signature::{Signature, frame_signature},
    foundation::core::FrameIndex,
    foundation::error::{HoldError, HoldResult},
    output::clock::{Clock, MonotonicClock},
    output::format::{frame_path, images_dir},
    output::sink::{FileSink, FsSink},
    render::Renderer,
    scene::source::AnimationSource,
    schedule::config::RunConfig,
    schedule::eta::{TimingStats, estimate},
    schedule::plan::{SkipPlan, plan},
};

/// Lifecycle of a [`SchedulerState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Built but not started.
    Idle,
    /// Producing frames.
    Running,
    /// Every frame of the range has an output.
    Completed,
    /// Stopped on request.
    Cancelled,
    /// Stopped by a render or evaluation error.
    Failed,
}

impl RunState {
    /// Return `true` for `Completed`, `Cancelled` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Cloneable stop request shared with whoever may cancel the run.
///
/// The flag is observed at the start of the next [`FrameScheduler::step`].
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request a stop. Idempotent.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Return `true` once a stop was requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Per-run frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunStats {
    /// Frames that received an output.
    pub frames_total: u64,
    /// Frames produced by the renderer, copy fallbacks included.
    pub frames_rendered: u64,
    /// Frames produced by copying the previous output.
    pub frames_copied: u64,
    /// Duplicates rendered because their copy failed.
    pub copy_fallbacks: u64,
}

/// How a frame's output was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameAction {
    /// Rendered from the source.
    Rendered,
    /// Copied from the previous frame's output.
    Copied {
        /// File that was copied.
        from: PathBuf,
    },
    /// A duplicate whose copy failed, rendered instead.
    CopyFallback,
}

/// What one step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame processed.
    pub frame: FrameIndex,
    /// Live duplicate decision.
    pub duplicate: bool,
    /// Output path taken.
    pub action: FrameAction,
    /// Written file.
    pub output: PathBuf,
    /// Number of channels that moved since the previous frame.
    pub changed: usize,
}

/// Result of [`FrameScheduler::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frame was produced; the run continues.
    Frame(FrameReport),
    /// The run is in a terminal state.
    Done(RunState),
}

/// Caller-owned state of one run.
///
/// Holds the cursor, the previous signature and output, timing accumulators, the plan and the
/// derived progress and ETA. Only one running state should target a given output directory.
#[derive(Clone, Debug)]
pub struct SchedulerState {
    config: RunConfig,
    images_dir: PathBuf,
    plan: SkipPlan,
    run_state: RunState,
    stop: StopHandle,
    current: FrameIndex,
    visited: u64,
    previous_signature: Option<Signature>,
    last_output: Option<PathBuf>,
    timing: TimingStats,
    stats: RunStats,
    progress: f64,
    eta: Duration,
}

impl SchedulerState {
    /// Idle state for `config`; pass it to [`FrameScheduler::start`].
    pub fn new(config: RunConfig) -> Self {
        let range = config.range;
        Self {
            config,
            images_dir: PathBuf::new(),
            plan: SkipPlan::empty(range),
            run_state: RunState::Idle,
            stop: StopHandle::default(),
            current: range.start,
            visited: 0,
            previous_signature: None,
            last_output: None,
            timing: TimingStats::default(),
            stats: RunStats::default(),
            progress: 0.0,
            eta: Duration::ZERO,
        }
    }

    /// Request a stop; the next step reports `Cancelled`.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Handle that stops this run from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Fraction of the range visited, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Forecast time left.
    pub fn eta(&self) -> Duration {
        self.eta
    }

    /// Lifecycle state.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Frame counters.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Timing accumulators.
    pub fn timing(&self) -> &TimingStats {
        &self.timing
    }

    /// Plan computed at start.
    pub fn plan(&self) -> &SkipPlan {
        &self.plan
    }

    /// Next frame to process.
    pub fn current_frame(&self) -> FrameIndex {
        self.current
    }

    /// Signature of the last processed frame.
    pub fn previous_signature(&self) -> Option<&Signature> {
        self.previous_signature.as_ref()
    }

    /// Output of the last processed frame.
    pub fn last_output(&self) -> Option<&Path> {
        self.last_output.as_deref()
    }

    /// Run parameters.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Directory the frames are written to; empty until started.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    fn reset(&mut self, images_dir: PathBuf, plan: SkipPlan) {
        self.images_dir = images_dir;
        self.plan = plan;
        self.run_state = RunState::Running;
        self.stop.clear();
        self.current = self.config.range.start;
        self.visited = 0;
        self.previous_signature = None;
        self.last_output = None;
        self.timing = TimingStats::default();
        self.stats = RunStats::default();
        self.progress = 0.0;
        self.eta = Duration::ZERO;
    }

    fn refresh(&mut self) {
        self.eta = estimate(self.plan.counts(), &self.timing);
        let total = self.config.range.len_frames();
        self.progress = match total {
            0 if self.run_state == RunState::Completed => 1.0,
            0 => 0.0,
            n => (self.visited as f64 / n as f64).clamp(0.0, 1.0),
        };
    }

    fn finish(&mut self, state: RunState) -> StepOutcome {
        self.run_state = state;
        self.refresh();
        if state == RunState::Completed {
            self.eta = Duration::ZERO;
        }
        tracing::info!(
            state = ?state,
            rendered = self.stats.frames_rendered,
            copied = self.stats.frames_copied,
            fallbacks = self.stats.copy_fallbacks,
            "run finished"
        );
        StepOutcome::Done(state)
    }
}

/// Drives a [`SchedulerState`] one frame at a time, rendering changed frames and copying held ones.
///
/// The scheduler owns the collaborators; all run data lives in the state, so a host can keep
/// several states and step whichever it likes from its own timer.
#[derive(Debug)]
pub struct FrameScheduler<R, F = FsSink, C = MonotonicClock> {
    renderer: R,
    sink: F,
    clock: C,
}

impl<R> FrameScheduler<R> {
    /// Scheduler writing to the local filesystem with the monotonic clock.
    pub fn on_disk(renderer: R) -> Self {
        Self::new(renderer, FsSink, MonotonicClock)
    }
}

impl<R, F: FileSink, C: Clock> FrameScheduler<R, F, C> {
    /// Assemble a scheduler from its collaborators.
    pub fn new(renderer: R, sink: F, clock: C) -> Self {
        Self {
            renderer,
            sink,
            clock,
        }
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The file sink.
    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// The file sink, mutably.
    pub fn sink_mut(&mut self) -> &mut F {
        &mut self.sink
    }

    /// Take the collaborators back.
    pub fn into_parts(self) -> (R, F, C) {
        (self.renderer, self.sink, self.clock)
    }

    /// Build a state for `config` and start it.
    pub fn begin<S: AnimationSource + ?Sized>(
        &mut self,
        source: &S,
        config: RunConfig,
    ) -> HoldResult<SchedulerState> {
        let mut state = SchedulerState::new(config);
        self.start(&mut state, source)?;
        Ok(state)
    }

    /// Validate the config, prepare the images directory, plan the range and move to `Running`.
    ///
    /// A terminal state may be started again; it restarts from the first frame.
    pub fn start<S: AnimationSource + ?Sized>(
        &mut self,
        state: &mut SchedulerState,
        source: &S,
    ) -> HoldResult<()> {
        if state.run_state == RunState::Running {
            return Err(HoldError::configuration("run is already in progress"));
        }
        let out_dir = state.config.validate()?;
        let images = images_dir(out_dir);
        self.sink
            .make_dirs(&images)
            .map_err(|e| HoldError::io(&images, e))?;

        let cfg = &state.config;
        let plan = plan(source, cfg.range, cfg.tolerance, cfg.rule)?;
        tracing::info!(
            start = cfg.range.start.0,
            end = cfg.range.end.0,
            render = plan.total_render,
            skip = plan.total_skip,
            images = %images.display(),
            "run started"
        );
        state.reset(images, plan);
        Ok(())
    }

    /// Process the next frame, or report the terminal state.
    ///
    /// Errors move the state to `Failed`; stepping an idle state is a configuration error.
    pub fn step<S>(&mut self, state: &mut SchedulerState, source: &mut S) -> HoldResult<StepOutcome>
    where
        S: AnimationSource + ?Sized,
        R: Renderer<S>,
    {
        match state.run_state {
            RunState::Idle => {
                return Err(HoldError::configuration("run has not been started"));
            }
            s if s.is_terminal() => return Ok(StepOutcome::Done(s)),
            _ => {}
        }
        if state.stop.is_requested() {
            return Ok(state.finish(RunState::Cancelled));
        }
        if state.visited >= state.config.range.len_frames() {
            return Ok(state.finish(RunState::Completed));
        }

        let frame = state.current;
        let sig = match frame_signature(
            &*source,
            state.config.range,
            frame,
            state.config.tolerance,
        ) {
            Ok(sig) => sig,
            Err(err) => {
                state.run_state = RunState::Failed;
                tracing::error!(frame = frame.0, error = %err, "change detection failed");
                return Err(err);
            }
        };
        let duplicate = state
            .config
            .rule
            .is_duplicate(&sig, state.previous_signature.as_ref());
        if let Some(planned) = state.plan.is_skip(frame)
            && planned != duplicate
        {
            tracing::debug!(frame = frame.0, planned, duplicate, "live decision differs from plan");
        }

        let output = frame_path(&state.images_dir, frame, state.config.format);
        let copy_from = if duplicate {
            state
                .last_output
                .clone()
                .filter(|p| self.sink.exists(p))
        } else {
            None
        };
        let action = match copy_from {
            Some(from) => {
                let started = self.clock.now();
                match self.sink.copy(&from, &output) {
                    Ok(()) => {
                        let took = self.clock.now().saturating_duration_since(started);
                        state.timing.record_copy(took);
                        state.stats.frames_copied += 1;
                        FrameAction::Copied { from }
                    }
                    Err(err) => {
                        tracing::warn!(
                            frame = frame.0,
                            from = %from.display(),
                            error = %err,
                            "copy failed, rendering instead"
                        );
                        self.render_into(state, source, frame, &output)?;
                        state.stats.copy_fallbacks += 1;
                        FrameAction::CopyFallback
                    }
                }
            }
            None => {
                self.render_into(state, source, frame, &output)?;
                FrameAction::Rendered
            }
        };

        let changed = sig.len();
        state.stats.frames_total += 1;
        state.previous_signature = Some(sig);
        state.last_output = Some(output.clone());
        state.current = frame.next();
        state.visited += 1;
        state.refresh();
        tracing::debug!(frame = frame.0, duplicate, changed, action = ?action, "frame done");

        Ok(StepOutcome::Frame(FrameReport {
            frame,
            duplicate,
            action,
            output,
            changed,
        }))
    }

    /// Step until the run is terminal, calling `on_step` after every step.
    pub fn run<S>(
        &mut self,
        state: &mut SchedulerState,
        source: &mut S,
        mut on_step: impl FnMut(&SchedulerState, &StepOutcome),
    ) -> HoldResult<RunState>
    where
        S: AnimationSource + ?Sized,
        R: Renderer<S>,
    {
        loop {
            let outcome = self.step(state, source)?;
            on_step(state, &outcome);
            if let StepOutcome::Done(s) = outcome {
                return Ok(s);
            }
        }
    }

    fn render_into<S>(
        &mut self,
        state: &mut SchedulerState,
        source: &mut S,
        frame: FrameIndex,
        output: &Path,
    ) -> HoldResult<()>
    where
        S: ?Sized,
        R: Renderer<S>,
    {
        let started = self.clock.now();
        if let Err(err) = self.renderer.render_frame(source, frame, output) {
            state.run_state = RunState::Failed;
            tracing::error!(frame = frame.0, error = %err, "render failed");
            return Err(match err {
                e @ HoldError::Render { .. } => e,
                other => HoldError::render(frame, other),
            });
        }
        let took = self.clock.now().saturating_duration_since(started);
        state.timing.record_render(took);
        state.stats.frames_rendered += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
