use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp01;

/// Linear map from scroll offset to timeline local time.
///
/// The window starts when the panel top reaches the viewport top (`start`) and lasts
/// `distance` scroll units. While `pin` is set the host holds the panel in place for that
/// window.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollBinding {
    start: f64,
    distance: f64,
    pin: bool,
}

impl ScrollBinding {
    /// Binding over `[start, start + distance]`.
    pub fn new(start: f64, distance: f64, pin: bool) -> ReelResult<Self> {
        if !start.is_finite() {
            return Err(ReelError::validation("scroll start must be finite"));
        }
        if !distance.is_finite() || distance <= 0.0 {
            return Err(ReelError::validation(
                "scroll distance (duration) must be finite and > 0",
            ));
        }
        Ok(Self {
            start,
            distance,
            pin,
        })
    }

    /// Scroll offset where the sequence begins.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Scroll distance the sequence spans.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Whether the panel is pinned during the sequence.
    pub fn pinned(&self) -> bool {
        self.pin
    }

    /// Move the window, e.g. after the host recomputed the panel's page offset.
    pub fn set_start(&mut self, start: f64) {
        if start.is_finite() {
            self.start = start;
        }
    }

    /// Scroll progress through the window, in `[0, 1]`.
    pub fn progress(&self, scroll: f64) -> f64 {
        clamp01((scroll - self.start) / self.distance)
    }

    /// Local time for `scroll` on a timeline spanning `span` units.
    pub fn local_time(&self, scroll: f64, span: f64) -> f64 {
        self.progress(scroll) * span.max(0.0)
    }

    /// Translation that keeps a pinned panel fixed on screen.
    pub fn pin_translation(&self, scroll: f64) -> f64 {
        if !self.pin {
            return 0.0;
        }
        let d = scroll - self.start;
        if d.is_nan() {
            return 0.0;
        }
        d.clamp(0.0, self.distance)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scroll.rs"]
mod tests;
