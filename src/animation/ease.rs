/// Easing curve applied to a keyframe's normalized progress.
///
/// Path draws stay [`Ease::Linear`] so scrubbing maps scroll distance to drawn length
/// one-to-one. Cue fades default to [`Ease::OutQuad`] (the classic `power1.out`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity.
    Linear,
    /// Quadratic ease-in.
    #[serde(alias = "power1.in")]
    InQuad,
    /// Quadratic ease-out.
    #[default]
    #[serde(alias = "power1.out")]
    OutQuad,
    /// Quadratic ease-in-out.
    #[serde(alias = "power1.in_out")]
    InOutQuad,
    /// Cubic ease-in.
    #[serde(alias = "power2.in")]
    InCubic,
    /// Cubic ease-out.
    #[serde(alias = "power2.out")]
    OutCubic,
    /// Cubic ease-in-out.
    #[serde(alias = "power2.in_out")]
    InOutCubic,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = crate::foundation::math::clamp01(t);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
