pub(crate) mod callback;
pub(crate) mod keyframe;
pub(crate) mod scroll;
pub(crate) mod scroll_timeline;
