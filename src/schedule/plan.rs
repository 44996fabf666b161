use crate::{
    detect::signature::{DuplicateRule, Signature, frame_signature},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::HoldResult,
    scene::source::AnimationSource,
};

/// Planned totals that seed the ETA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlanCounts {
    /// Frames expected to be copied.
    pub total_skip: u64,
    /// Frames expected to be rendered.
    pub total_render: u64,
}

/// Dry-run skip/render decision for every frame of a range.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkipPlan {
    /// Planned range.
    pub range: FrameRange,
    /// `true` where the frame duplicates its predecessor; index 0 is `range.start`.
    pub skips: Vec<bool>,
    /// Number of `true` entries.
    pub total_skip: u64,
    /// Number of `false` entries.
    pub total_render: u64,
}

impl SkipPlan {
    /// Plan with no frames.
    pub fn empty(range: FrameRange) -> Self {
        Self {
            range,
            skips: Vec::new(),
            total_skip: 0,
            total_render: 0,
        }
    }

    /// Totals only.
    pub fn counts(&self) -> PlanCounts {
        PlanCounts {
            total_skip: self.total_skip,
            total_render: self.total_render,
        }
    }

    /// Number of planned frames.
    pub fn frame_count(&self) -> u64 {
        self.skips.len() as u64
    }

    /// Planned decision for `frame`, `None` outside the range.
    pub fn is_skip(&self, frame: FrameIndex) -> Option<bool> {
        self.range
            .offset_of(frame)
            .and_then(|i| self.skips.get(i).copied())
    }

    /// `(frame, is_skip)` pairs in timeline order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, bool)> + '_ {
        self.range.frames().zip(self.skips.iter().copied())
    }
}

/// Sweep `range` once and decide, per frame, whether it duplicates its predecessor.
///
/// Uses the same signature and rule as the live scheduler, so both agree as long as the source
/// does not change in between. An empty range yields an empty plan.
#[tracing::instrument(skip(source), fields(frames = range.len_frames()))]
pub fn plan<S: AnimationSource + ?Sized>(
    source: &S,
    range: FrameRange,
    tolerance: f64,
    rule: DuplicateRule,
) -> HoldResult<SkipPlan> {
    if range.is_empty() {
        return Ok(SkipPlan::empty(range));
    }

    let mut out = SkipPlan::empty(range);
    out.skips.reserve(range.len_frames().min(1 << 20) as usize);
    let mut previous: Option<Signature> = None;
    for frame in range.frames() {
        let sig = frame_signature(source, range, frame, tolerance)?;
        let skip = rule.is_duplicate(&sig, previous.as_ref());
        out.skips.push(skip);
        if skip {
            out.total_skip += 1;
        } else {
            out.total_render += 1;
        }
        previous = Some(sig);
    }

    tracing::debug!(
        skip = out.total_skip,
        render = out.total_render,
        "skip plan ready"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/plan.rs"]
mod tests;
