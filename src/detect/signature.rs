use std::collections::BTreeSet;

use crate::{
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::HoldResult,
    scene::source::AnimationSource,
};

/// Tolerance used when none is configured.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// One animation channel whose value moved between two instants.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ChangeSignal {
    /// Key of the owning entity.
    pub owner: String,
    /// Channel path within the owner, `data_path[index]`.
    pub path: String,
}

impl ChangeSignal {
    /// Build a signal.
    pub fn new(owner: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for ChangeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.owner, self.path)
    }
}

/// The set of channels that changed for one frame.
pub type Signature = BTreeSet<ChangeSignal>;

/// Channels whose value differs by more than `tolerance` between `time` and `previous_time`.
///
/// A NaN difference counts as a change.
pub fn signature<S: AnimationSource + ?Sized>(
    source: &S,
    time: f64,
    previous_time: f64,
    tolerance: f64,
) -> HoldResult<Signature> {
    let mut out = Signature::new();
    for entity in source.animated_entities() {
        for channel in entity.channels {
            let now = source.evaluate(&entity, channel, time)?;
            let before = source.evaluate(&entity, channel, previous_time)?;
            let within = (now - before).abs() <= tolerance;
            if !within {
                out.insert(ChangeSignal::new(entity.key.as_ref(), channel.path()));
            }
        }
    }
    Ok(out)
}

/// Signature of `frame` against its predecessor inside `range`.
///
/// The first frame of the range is compared against itself.
pub fn frame_signature<S: AnimationSource + ?Sized>(
    source: &S,
    range: FrameRange,
    frame: FrameIndex,
    tolerance: f64,
) -> HoldResult<Signature> {
    signature(source, frame.as_time(), range.previous_time(frame), tolerance)
}

/// How a frame's signature decides whether it duplicates its predecessor.
///
/// The first frame of a range is never a duplicate under either rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateRule {
    /// Duplicate iff no channel moved since the predecessor.
    #[default]
    Unchanged,
    /// Duplicate iff the same channels moved as for the predecessor.
    MatchPrevious,
}

impl DuplicateRule {
    /// Decide for a frame with signature `current`; `previous` is `None` for the first frame.
    pub fn is_duplicate(self, current: &Signature, previous: Option<&Signature>) -> bool {
        let Some(previous) = previous else {
            return false;
        };
        match self {
            Self::Unchanged => current.is_empty(),
            Self::MatchPrevious => current == previous,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/detect/signature.rs"]
mod tests;
