use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::animation::tween::{CueStyle, Tween};
use crate::foundation::core::ElementId;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::callback::{CallbackId, CallbackSlot, PlaybackDescriptor, TimeDriven};
use crate::timeline::keyframe::{KeyframeKind, Target, TextCue, TimelineKeyframe};

/// Every animated value of a panel at one local time.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineState {
    /// Local time the state was evaluated at.
    pub local_time: f64,
    /// Style of every cue that appears on the timeline.
    pub cues: BTreeMap<ElementId, CueStyle>,
    /// Reveal fraction per segment index.
    pub segments: Vec<f64>,
}

/// One ordered keyframe sequence for a panel, evaluated as a pure function of local time.
///
/// Keyframes are kept sorted by start time; equal start times keep declaration order.
/// When several keyframes drive the same target, the last one that has started wins;
/// before any has started the first one's initial value applies.
pub struct ScrollTimeline {
    keyframes: Vec<TimelineKeyframe>,
    segment_count: usize,
    next_order: usize,
    callbacks: Vec<CallbackSlot>,
    next_callback: u64,
}

impl std::fmt::Debug for ScrollTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTimeline")
            .field("keyframes", &self.keyframes)
            .field("segment_count", &self.segment_count)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl ScrollTimeline {
    /// Empty timeline over `segment_count` path segments.
    pub fn new(segment_count: usize) -> Self {
        Self {
            keyframes: Vec::new(),
            segment_count,
            next_order: 0,
            callbacks: Vec::new(),
            next_callback: 0,
        }
    }

    /// Fade `cues` in over `[at, at + duration]`, rising from `offset_y`.
    pub fn fade_in(
        &mut self,
        cues: &[ElementId],
        at: f64,
        duration: f64,
        ease: Ease,
        offset_y: f64,
    ) -> ReelResult<()> {
        if !offset_y.is_finite() {
            return Err(ReelError::validation("cue offset must be finite"));
        }
        let targets = cues.iter().cloned().map(Target::Cue).collect();
        self.push(KeyframeKind::CueFade, targets, at, duration, ease, offset_y)
    }

    /// Draw `segments` linearly over `[at, at + duration]`.
    pub fn draw(&mut self, segments: &[usize], at: f64, duration: f64) -> ReelResult<()> {
        if let Some(&bad) = segments.iter().find(|&&i| i >= self.segment_count) {
            return Err(ReelError::validation(format!(
                "draw targets segment {bad} but only {} exist",
                self.segment_count
            )));
        }
        if duration <= 0.0 {
            return Err(ReelError::validation("draw duration must be > 0"));
        }
        let targets = segments.iter().copied().map(Target::Segment).collect();
        self.push(KeyframeKind::PathDraw, targets, at, duration, Ease::Linear, 0.0)
    }

    fn push(
        &mut self,
        kind: KeyframeKind,
        targets: Vec<Target>,
        at: f64,
        duration: f64,
        ease: Ease,
        offset_y: f64,
    ) -> ReelResult<()> {
        if !(at.is_finite() && duration.is_finite()) || at < 0.0 || duration < 0.0 {
            return Err(ReelError::validation(
                "keyframe time and duration must be finite and >= 0",
            ));
        }
        if targets.is_empty() {
            return Err(ReelError::validation("keyframe needs at least one target"));
        }
        self.keyframes.push(TimelineKeyframe {
            local_time: at,
            duration,
            targets,
            kind,
            ease,
            offset_y,
            order: self.next_order,
        });
        self.next_order += 1;
        // Stable sort: ties stay in declaration order.
        self.keyframes
            .sort_by(|a, b| a.local_time.total_cmp(&b.local_time));
        Ok(())
    }

    /// Keyframes in evaluation order.
    pub fn keyframes(&self) -> &[TimelineKeyframe] {
        &self.keyframes
    }

    /// Number of segments the timeline addresses.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Local-time length of the sequence (end of the last keyframe).
    pub fn span(&self) -> f64 {
        self.keyframes
            .iter()
            .map(TimelineKeyframe::end)
            .fold(0.0, f64::max)
    }

    /// `[start, end]` during which segment `index` draws.
    pub fn segment_window(&self, index: usize) -> Option<(f64, f64)> {
        let mut draws = self
            .keyframes
            .iter()
            .filter(|k| k.targets.contains(&Target::Segment(index)));
        let first = draws.next()?;
        let end = draws.fold(first.end(), |acc, k| acc.max(k.end()));
        Some((first.local_time, end))
    }

    /// Text cues with their activation windows, in evaluation order.
    pub fn cues(&self) -> Vec<TextCue> {
        let mut out = Vec::new();
        for kf in &self.keyframes {
            for target in &kf.targets {
                if let Target::Cue(element) = target {
                    out.push(TextCue {
                        element: element.clone(),
                        activation_time: kf.local_time,
                        duration: kf.duration,
                    });
                }
            }
        }
        out
    }

    /// Evaluate every cue and segment at local time `t`.
    ///
    /// Depends on `t` alone: no direction, no memory of earlier evaluations.
    pub fn evaluate(&self, t: f64) -> TimelineState {
        let t = if t.is_nan() { 0.0 } else { t };
        let mut cues = BTreeMap::new();
        let mut segments = vec![0.0; self.segment_count];
        let mut seen = vec![false; self.segment_count];

        for kf in &self.keyframes {
            let started = kf.local_time <= t;
            for target in &kf.targets {
                match target {
                    Target::Cue(id) => {
                        if started || !cues.contains_key(id) {
                            cues.insert(id.clone(), cue_tween(kf).sample(t));
                        }
                    }
                    Target::Segment(i) => {
                        if started || !seen[*i] {
                            segments[*i] = draw_tween(kf).sample(t);
                            seen[*i] = true;
                        }
                    }
                }
            }
        }

        TimelineState {
            local_time: t,
            cues,
            segments,
        }
    }

    /// Attach a callback driven over `[start, end]` local time.
    pub fn attach(
        &mut self,
        start: f64,
        end: f64,
        callback: impl TimeDriven + 'static,
    ) -> ReelResult<CallbackId> {
        if !(start.is_finite() && end.is_finite()) || end < start {
            return Err(ReelError::validation(
                "callback window must be finite with end >= start",
            ));
        }
        let id = CallbackId(self.next_callback);
        self.next_callback += 1;
        self.callbacks.push(CallbackSlot {
            id,
            start,
            end,
            callback: Box::new(callback),
            last_progress: None,
        });
        Ok(id)
    }

    /// Attach a playback driver over the window of `descriptor`.
    pub fn attach_playback(
        &mut self,
        descriptor: &PlaybackDescriptor,
        callback: impl TimeDriven + 'static,
    ) -> ReelResult<CallbackId> {
        descriptor.validate()?;
        self.attach(descriptor.start_time, descriptor.end_time, callback)
    }

    /// Remove an attached callback.
    pub fn detach(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|c| c.id != id);
        before != self.callbacks.len()
    }

    /// Number of attached callbacks.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn dispatch(&mut self, t: f64) -> usize {
        self.callbacks
            .iter_mut()
            .map(|c| c.dispatch(t))
            .filter(|ran| *ran)
            .count()
    }

    pub(crate) fn release_callbacks(&mut self) {
        self.callbacks.clear();
    }
}

fn cue_tween(kf: &TimelineKeyframe) -> Tween<CueStyle> {
    Tween {
        from: CueStyle::hidden(kf.offset_y),
        to: CueStyle::shown(),
        start: kf.local_time,
        duration: kf.duration,
        ease: kf.ease,
    }
}

fn draw_tween(kf: &TimelineKeyframe) -> Tween<f64> {
    Tween {
        from: 0.0,
        to: 1.0,
        start: kf.local_time,
        duration: kf.duration,
        ease: kf.ease,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scroll_timeline.rs"]
mod tests;
