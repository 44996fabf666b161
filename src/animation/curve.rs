use crate::{
    animation::ease::{Easing, Interpolation},
    foundation::error::{HoldError, HoldResult},
};

/// One key on a [`Curve`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Timeline position (frames, may be fractional).
    pub frame: f64,
    /// Value at `frame`.
    pub value: f64,
    /// Shape of the segment toward the next key.
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Easing applied to `interpolation`.
    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    /// Linear key.
    pub fn linear(frame: f64, value: f64) -> Self {
        Self {
            frame,
            value,
            interpolation: Interpolation::Linear,
            easing: Easing::Auto,
        }
    }

    /// Key that holds its value until the next key.
    pub fn constant(frame: f64, value: f64) -> Self {
        Self {
            interpolation: Interpolation::Constant,
            ..Self::linear(frame, value)
        }
    }
}

/// Behavior before the first key and after the last key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Hold the boundary key value.
    #[default]
    Constant,
    /// Continue the slope of the boundary segment.
    Linear,
}

/// Scalar animation curve sampled at arbitrary times.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    /// Keys sorted by frame.
    #[serde(default)]
    pub keys: Vec<Keyframe>,
    /// Out-of-range behavior.
    #[serde(default)]
    pub extrapolation: Extrapolation,
    /// Value of a curve without keys.
    #[serde(default)]
    pub default: Option<f64>,
}

impl Curve {
    /// Curve that evaluates to `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            keys: Vec::new(),
            extrapolation: Extrapolation::Constant,
            default: Some(value),
        }
    }

    /// Curve from keys, constant extrapolation.
    pub fn from_keys(keys: Vec<Keyframe>) -> Self {
        Self {
            keys,
            extrapolation: Extrapolation::Constant,
            default: None,
        }
    }

    /// Validate key ordering and finiteness.
    pub fn validate(&self) -> HoldResult<()> {
        if let Some(k) = self
            .keys
            .iter()
            .find(|k| !k.frame.is_finite() || !k.value.is_finite())
        {
            return Err(HoldError::animation(format!(
                "curve key at frame {} has a non-finite frame or value",
                k.frame
            )));
        }
        if !self.keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(HoldError::animation("curve keys must be sorted by frame"));
        }
        if let Some(d) = self.default
            && !d.is_finite()
        {
            return Err(HoldError::animation("curve default must be finite"));
        }
        Ok(())
    }

    /// Sample the curve at `time`.
    ///
    /// Keyless curves return `default` (or `0.0`).
    pub fn evaluate(&self, time: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.default.unwrap_or(0.0),
        };

        if time <= first.frame {
            return match self.extrapolation {
                Extrapolation::Constant => first.value,
                Extrapolation::Linear => first.value - self.edge_slope(0) * (first.frame - time),
            };
        }
        if time >= last.frame {
            let n = self.keys.len();
            return match self.extrapolation {
                Extrapolation::Constant => last.value,
                Extrapolation::Linear if n >= 2 => {
                    last.value + self.edge_slope(n - 2) * (time - last.frame)
                }
                Extrapolation::Linear => last.value,
            };
        }

        let idx = self.keys.partition_point(|k| k.frame <= time);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.frame - a.frame;
        if span <= 0.0 {
            return b.value;
        }
        let t = (time - a.frame) / span;
        a.value + (b.value - a.value) * a.interpolation.shape(a.easing, t)
    }

    /// Slope of the segment starting at key `i`, or zero when it does not exist.
    fn edge_slope(&self, i: usize) -> f64 {
        match (self.keys.get(i), self.keys.get(i + 1)) {
            (Some(a), Some(b)) if b.frame > a.frame && a.interpolation != Interpolation::Constant => {
                (b.value - a.value) / (b.frame - a.frame)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
