use crate::foundation::error::{HoldError, HoldResult};

/// Absolute frame number on the scene timeline. May be negative.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub i64);

impl FrameIndex {
    /// Frame number as a curve sampling time.
    pub fn as_time(self) -> f64 {
        self.0 as f64
    }

    /// The preceding frame, saturating at `i64::MIN`.
    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// The following frame, saturating at `i64::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive frame range `[start, end]`.
///
/// `start > end` is a valid, empty range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame.
    pub start: FrameIndex,
    /// Last frame (inclusive).
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create an inclusive range.
    pub fn new(start: FrameIndex, end: FrameIndex) -> Self {
        Self { start, end }
    }

    /// Shorthand for `FrameRange::new(FrameIndex(start), FrameIndex(end))`.
    pub fn from_bounds(start: i64, end: i64) -> Self {
        Self::new(FrameIndex(start), FrameIndex(end))
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        if self.start.0 > self.end.0 {
            return 0;
        }
        self.end.0.abs_diff(self.start.0) + 1
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 > self.end.0
    }

    /// Return `true` when `f` is inside `[start, end]`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 <= self.end.0
    }

    /// Zero-based position of `f` inside the range.
    pub fn offset_of(self, f: FrameIndex) -> Option<usize> {
        if !self.contains(f) {
            return None;
        }
        usize::try_from(f.0.abs_diff(self.start.0)).ok()
    }

    /// Iterate the frames in timeline order.
    pub fn frames(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..=self.end.0).map(FrameIndex)
    }

    /// Sampling time of the predecessor of `f`, clamped to the range start.
    ///
    /// The first frame compares against itself, which always yields an empty change set.
    pub fn previous_time(self, f: FrameIndex) -> f64 {
        f.prev().max(self.start).as_time()
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> HoldResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    /// Reject zero numerators and denominators, e.g. after deserialization.
    pub fn validate(self) -> HoldResult<()> {
        if self.den == 0 {
            return Err(HoldError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(HoldError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// `num/den` form accepted by `ffmpeg -framerate`.
    pub fn ffmpeg_rate(self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 24, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
