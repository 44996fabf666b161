/// Segment shape between a keyframe and the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Hold the key value until the next key.
    Constant,
    /// Straight line.
    #[default]
    Linear,
    /// Quadratic easing.
    Quad,
    /// Cubic easing.
    Cubic,
    /// Sinusoidal easing.
    Sine,
    /// Flat-tangent cubic (smoothstep), the usual default for hand-keyed curves.
    Bezier,
}

/// Which end of a segment an [`Interpolation`] eases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Per-shape default: `In` for the eased shapes.
    #[default]
    Auto,
    /// Slow start.
    In,
    /// Slow end.
    Out,
    /// Slow start and end.
    InOut,
}

impl Interpolation {
    /// Map normalized segment progress `t` to normalized value progress.
    ///
    /// `t` is clamped to `[0, 1]`. `Constant` returns `0` everywhere; the curve handles the jump
    /// at the next key.
    pub fn shape(self, easing: Easing, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let ease_in: fn(f64) -> f64 = match self {
            Self::Constant => return 0.0,
            Self::Linear => return t,
            Self::Bezier => return t * t * (3.0 - 2.0 * t),
            Self::Quad => |t| t * t,
            Self::Cubic => |t| t * t * t,
            Self::Sine => |t| 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
        };
        match easing {
            Easing::Auto | Easing::In => ease_in(t),
            Easing::Out => 1.0 - ease_in(1.0 - t),
            Easing::InOut => {
                if t < 0.5 {
                    ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - ease_in(2.0 - 2.0 * t) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
