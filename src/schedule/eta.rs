use std::time::Duration;

use crate::schedule::plan::PlanCounts;

/// Weight of the newest render sample in the moving average.
pub const EMA_ALPHA: f64 = 0.3;

/// Per-run timing accumulators for the two output paths.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimingStats {
    /// Sum of successful copy durations.
    pub copy_time_total: Duration,
    /// Successful copies.
    pub copy_count: u64,
    /// Sum of render durations.
    pub render_time_total: Duration,
    /// Renders, including copy fallbacks.
    pub render_count: u64,
    /// Exponential moving average of render cost in seconds; seeded by the first sample.
    pub ema_render_secs: f64,
}

impl TimingStats {
    /// Account for one render-path frame.
    pub fn record_render(&mut self, cost: Duration) {
        let c = cost.as_secs_f64();
        self.ema_render_secs = if self.render_count == 0 {
            c
        } else {
            EMA_ALPHA * c + (1.0 - EMA_ALPHA) * self.ema_render_secs
        };
        self.render_time_total += cost;
        self.render_count += 1;
    }

    /// Account for one copied frame.
    pub fn record_copy(&mut self, cost: Duration) {
        self.copy_time_total += cost;
        self.copy_count += 1;
    }

    /// Mean copy cost, zero before the first copy.
    pub fn avg_copy_time(&self) -> Duration {
        if self.copy_count == 0 {
            return Duration::ZERO;
        }
        secs(self.copy_time_total.as_secs_f64() / self.copy_count as f64)
    }

    /// Smoothed render cost, zero before the first render.
    pub fn avg_render_time(&self) -> Duration {
        secs(self.ema_render_secs)
    }
}

/// Time left for the frames the plan still expects to render and copy.
///
/// Remaining counts are floored at zero so a live run that renders or copies more than planned
/// never yields a negative forecast. Until the first copy is measured, planned copies are priced
/// at the render average, so the forecast does not jump up when the first copy lands.
pub fn estimate(counts: PlanCounts, timing: &TimingStats) -> Duration {
    let renders_remaining = counts.total_render.saturating_sub(timing.render_count);
    let skips_remaining = counts.total_skip.saturating_sub(timing.copy_count);
    let avg_render = timing.avg_render_time().as_secs_f64();
    let avg_copy = if timing.copy_count == 0 {
        avg_render
    } else {
        timing.avg_copy_time().as_secs_f64()
    };
    secs(renders_remaining as f64 * avg_render + skips_remaining as f64 * avg_copy)
}

fn secs(s: f64) -> Duration {
    if s.is_nan() || s <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(s).unwrap_or(Duration::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/eta.rs"]
mod tests;
