//! Scroll-bound reveal choreography.
//!
//! A [`Stage`] owns mounted panels. Each panel maps the host's scroll offset onto a
//! [`ScrollTimeline`] whose keyframes fade text cues in and draw dotted connector paths,
//! keeps configured gaps between page elements with a bounded [`LayoutReconciler`], and
//! re-measures its paths through a [`RefreshCoordinator`] when the viewport reflows.
//!
//! - Describe a panel with a [`PanelConfig`] (JSON or [`PanelConfig::naming_sequence`])
//! - Provide a host document implementing [`DrawSurface`] + [`LayoutSurface`]
//!   ([`SceneSurface`] is an in-memory one, loadable from SVG)
//! - Drive it with [`Stage::scroll_to`], [`Stage::resize`] and one [`Stage::tick`] per frame
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod layout;
pub(crate) mod panel;
pub(crate) mod reveal;
pub(crate) mod stage;
pub(crate) mod surface;
pub(crate) mod timeline;

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{CueStyle, Lerp, Tween};
pub use crate::foundation::core::{
    BezPath, Edge, ElementId, MaskId, PanelId, Point, Rect, Vec2, Viewport,
};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::layout::constraint::{Axis, LayoutConstraint, Movable};
pub use crate::layout::reconciler::{
    CONVERGENCE_EPSILON, LayoutReconciler, MAX_ITERATIONS, ReconcileReport, ReconcileState,
};
pub use crate::panel::config::{ConstraintDef, PanelConfig, StepDef};
pub use crate::panel::instance::{CueSnapshot, Panel, PanelSnapshot, SegmentSnapshot};
pub use crate::panel::refresh::{RefreshCoordinator, RefreshReason, RefreshReport};
pub use crate::panel::synth::synthesize_scene;
pub use crate::reveal::preparer::PathRevealPreparer;
pub use crate::reveal::segment::{
    DEFAULT_PATH_LENGTH, MaskPrimitive, PathSegment, StrategyKind, visible_dash_intervals,
};
pub use crate::reveal::strategy::{MaskFallback, NativeDraw, RevealStrategy, select_strategy};
pub use crate::stage::listeners::{ListenerHandle, ListenerKind, ListenerRegistry};
pub use crate::stage::registry::{FrameReport, Stage};
pub use crate::surface::scene::{ABOVE_BLOCK, Reflow, SceneSurface};
pub use crate::surface::{
    CapabilityProbe, DrawSurface, LayoutSurface, PanelSurface, StaticCapabilities,
};
pub use crate::timeline::callback::{CallbackId, PlaybackDescriptor, TimeDriven, TimeSample};
pub use crate::timeline::keyframe::{KeyframeKind, Target, TextCue, TimelineKeyframe};
pub use crate::timeline::scroll::ScrollBinding;
pub use crate::timeline::scroll_timeline::{ScrollTimeline, TimelineState};
