use crate::animation::ease::Ease;
use crate::foundation::math::window_progress;

/// Interpolation contract for tweened value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Visual style a text cue tweens between.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CueStyle {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset from the resting position.
    pub offset_y: f64,
}

impl CueStyle {
    /// Hidden start state: transparent and pushed down by `offset_y`.
    pub fn hidden(offset_y: f64) -> Self {
        Self {
            opacity: 0.0,
            offset_y,
        }
    }

    /// Fully shown resting state.
    pub fn shown() -> Self {
        Self {
            opacity: 1.0,
            offset_y: 0.0,
        }
    }
}

impl Lerp for CueStyle {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            opacity: Lerp::lerp(&a.opacity, &b.opacity, t),
            offset_y: Lerp::lerp(&a.offset_y, &b.offset_y, t),
        }
    }
}

/// A `from -> to` tween over a local-time window.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    /// Value before the window starts.
    pub from: T,
    /// Value after the window ends.
    pub to: T,
    /// Window start in local time.
    pub start: f64,
    /// Window length in local time.
    pub duration: f64,
    /// Curve applied to window progress.
    pub ease: Ease,
}

impl<T: Lerp> Tween<T> {
    /// Raw (un-eased) progress through the window.
    pub fn progress(&self, t: f64) -> f64 {
        window_progress(t, self.start, self.duration)
    }

    /// Sample the tween at local time `t`; depends on `t` only.
    pub fn sample(&self, t: f64) -> T {
        T::lerp(&self.from, &self.to, self.ease.apply(self.progress(t)))
    }

    /// Window end in local time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
