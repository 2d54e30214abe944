use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::window_progress;

/// Time handed to an attached callback.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TimeSample {
    /// Current timeline local time.
    pub local_time: f64,
    /// Progress through the callback's window, in `[0, 1]`.
    pub progress: f64,
}

/// Anything driven by timeline local time, such as a frame-synced playback driver.
pub trait TimeDriven {
    /// Called when the timeline moves inside (or across the edges of) the attached window.
    fn on_time(&mut self, sample: TimeSample) -> anyhow::Result<()>;
}

impl<F> TimeDriven for F
where
    F: FnMut(TimeSample) -> anyhow::Result<()>,
{
    fn on_time(&mut self, sample: TimeSample) -> anyhow::Result<()> {
        self(sample)
    }
}

/// Handle returned by [`crate::ScrollTimeline::attach`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct CallbackId(pub(crate) u64);

pub(crate) struct CallbackSlot {
    pub(crate) id: CallbackId,
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) callback: Box<dyn TimeDriven>,
    pub(crate) last_progress: Option<f64>,
}

impl CallbackSlot {
    /// Deliver `local_time` if the clamped progress changed since the last delivery.
    ///
    /// Returns whether the callback ran. Errors are logged, never propagated.
    pub(crate) fn dispatch(&mut self, local_time: f64) -> bool {
        let progress = window_progress(local_time, self.start, self.end - self.start);
        if self.last_progress == Some(progress) {
            return false;
        }
        self.last_progress = Some(progress);
        if let Err(err) = self.callback.on_time(TimeSample {
            local_time,
            progress,
        }) {
            tracing::warn!(
                callback = self.id.0,
                error = %format!("{err:#}"),
                "attached callback failed"
            );
        }
        true
    }
}

/// Descriptor a secondary playback driver consumes to follow the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackDescriptor {
    /// Reference to the driven source (animation file, element id).
    pub source_ref: String,
    /// Local time at which source playback starts.
    pub start_time: f64,
    /// Local time at which source playback ends.
    pub end_time: f64,
    /// Repeat the source when it is shorter than the window.
    #[serde(rename = "loop", default)]
    pub looped: bool,
}

impl PlaybackDescriptor {
    /// Validate the window.
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.start_time.is_finite() && self.end_time.is_finite()) {
            return Err(ReelError::validation("playback window must be finite"));
        }
        if self.end_time < self.start_time {
            return Err(ReelError::validation(format!(
                "playback '{}' ends before it starts",
                self.source_ref
            )));
        }
        Ok(())
    }

    /// Source time for a timeline local time, given the source's own length.
    ///
    /// `None` outside the window. Looping sources wrap; others hold their last frame.
    pub fn source_time(&self, local_time: f64, source_length: f64) -> Option<f64> {
        if local_time < self.start_time || local_time > self.end_time {
            return None;
        }
        let elapsed = local_time - self.start_time;
        if source_length <= 0.0 {
            return Some(0.0);
        }
        if self.looped {
            Some(elapsed.rem_euclid(source_length))
        } else {
            Some(elapsed.min(source_length))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/callback.rs"]
mod tests;
