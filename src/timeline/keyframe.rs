use crate::animation::ease::Ease;
use crate::foundation::core::ElementId;

/// What a keyframe animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeKind {
    /// Opacity + vertical offset fade of text cues.
    CueFade,
    /// Progressive draw of path segments.
    PathDraw,
}

/// One animated element of a keyframe.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Text cue by element id.
    Cue(ElementId),
    /// Path segment by index into the panel's segment list.
    Segment(usize),
}

/// A tween placed on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineKeyframe {
    /// Window start in local time.
    pub local_time: f64,
    /// Window length in local time.
    pub duration: f64,
    /// Elements driven by this keyframe.
    pub targets: Vec<Target>,
    /// Kind of tween.
    pub kind: KeyframeKind,
    /// Curve applied to window progress.
    pub ease: Ease,
    /// Start offset for cue fades (cues rise from `offset_y` to 0).
    pub offset_y: f64,
    /// Declaration order; breaks ties between equal `local_time`s.
    pub order: usize,
}

impl TimelineKeyframe {
    /// Window end in local time.
    pub fn end(&self) -> f64 {
        self.local_time + self.duration
    }
}

/// A text cue's activation window.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextCue {
    /// Cue element.
    pub element: ElementId,
    /// Local time the fade starts.
    pub activation_time: f64,
    /// Fade length in local time.
    pub duration: f64,
}
