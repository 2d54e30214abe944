use std::sync::Arc;

use crate::animation::tween::CueStyle;
use crate::foundation::core::{ElementId, PanelId, Viewport};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::reconciler::{LayoutReconciler, ReconcileReport, ReconcileState};
use crate::panel::config::{PanelConfig, StepDef};
use crate::panel::refresh::{RefreshCoordinator, RefreshReason, RefreshReport};
use crate::reveal::preparer::PathRevealPreparer;
use crate::reveal::segment::{PathSegment, StrategyKind};
use crate::reveal::strategy::RevealStrategy;
use crate::surface::PanelSurface;
use crate::timeline::scroll::ScrollBinding;
use crate::timeline::scroll_timeline::{ScrollTimeline, TimelineState};

/// One mounted reveal sequence and everything it owns.
///
/// Owns its surface, the prepared segments, the timeline and the layout reconciler.
/// Dropping (or unmounting) the panel releases all of it.
#[derive(Debug)]
pub struct Panel<S> {
    id: PanelId,
    config: PanelConfig,
    surface: S,
    binding: ScrollBinding,
    timeline: ScrollTimeline,
    preparer: PathRevealPreparer,
    segments: Vec<PathSegment>,
    cues: Vec<ElementId>,
    reconciler: LayoutReconciler,
    refresh: RefreshCoordinator,
    scroll: f64,
    applied: Option<TimelineState>,
}

/// Serializable view of a panel at its current scroll position.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PanelSnapshot {
    /// Panel id.
    pub panel: PanelId,
    /// Last applied scroll offset.
    pub scroll: f64,
    /// Scroll progress through the panel window.
    pub progress: f64,
    /// Local time the timeline was evaluated at.
    pub local_time: f64,
    /// Translation keeping a pinned panel in place.
    pub pin_translation: f64,
    /// Reveal technique in use.
    pub strategy: StrategyKind,
    /// Cue styles.
    pub cues: Vec<CueSnapshot>,
    /// Segment states, in path order.
    pub segments: Vec<SegmentSnapshot>,
    /// Reconciler state.
    pub reconcile: ReconcileState,
}

/// Cue entry of a [`PanelSnapshot`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CueSnapshot {
    /// Cue element.
    pub element: ElementId,
    /// Current style.
    #[serde(flatten)]
    pub style: CueStyle,
}

/// Segment entry of a [`PanelSnapshot`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SegmentSnapshot {
    /// Visible path.
    pub path: ElementId,
    /// Document id of the reveal mask.
    pub mask: String,
    /// Measured (or default) length.
    pub length: f64,
    /// `false` when the default length was substituted.
    pub measured: bool,
    /// Exposed fraction.
    pub reveal_fraction: f64,
}

impl<S: PanelSurface> Panel<S> {
    /// Validate `config` against `surface`, prepare every path and build the timeline.
    ///
    /// Fails when the container, a path or a cue element is missing, or when a constraint
    /// names an unset spacing token. On failure the surface is dropped.
    #[tracing::instrument(skip_all, fields(panel = %id))]
    pub fn mount(
        id: PanelId,
        config: PanelConfig,
        mut surface: S,
        strategy: Arc<dyn RevealStrategy>,
    ) -> ReelResult<Self> {
        config.validate()?;
        let constraints = config.layout_constraints()?;

        let container = ElementId::new(&config.container);
        if !surface.has_element(&container) {
            return Err(ReelError::validation(format!(
                "container '{container}' not found"
            )));
        }
        let paths = config.path_ids();
        let cues = config.cue_ids();
        if let Some(missing) = paths.iter().chain(&cues).find(|e| !surface.has_element(e)) {
            return Err(ReelError::validation(format!(
                "element '{missing}' not found"
            )));
        }

        let preparer = PathRevealPreparer::new(id.clone(), strategy);
        let segments = preparer.prepare_all(&mut surface, &paths)?;
        let timeline = build_timeline(&config, segments.len())?;
        let binding = ScrollBinding::new(config.start, config.duration, config.pin)?;

        tracing::info!(
            segments = segments.len(),
            cues = cues.len(),
            strategy = ?preparer.strategy(),
            span = timeline.span(),
            "mounted panel"
        );
        Ok(Self {
            id,
            config,
            surface,
            binding,
            timeline,
            preparer,
            segments,
            cues,
            reconciler: LayoutReconciler::new(constraints),
            refresh: RefreshCoordinator::new(),
            scroll: f64::NAN,
            applied: None,
        })
    }

    /// Panel id.
    pub fn id(&self) -> &PanelId {
        &self.id
    }

    /// Configuration the panel was mounted with.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Host surface, mutably (e.g. to simulate host-side layout changes).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Scroll binding.
    pub fn binding(&self) -> &ScrollBinding {
        &self.binding
    }

    /// Scroll binding, for hosts that recompute the panel's page offset.
    pub fn binding_mut(&mut self) -> &mut ScrollBinding {
        &mut self.binding
    }

    /// Timeline.
    pub fn timeline(&self) -> &ScrollTimeline {
        &self.timeline
    }

    /// Timeline, mutably (attach callbacks here).
    pub fn timeline_mut(&mut self) -> &mut ScrollTimeline {
        &mut self.timeline
    }

    /// Prepared segments, in path order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Layout reconciler.
    pub fn reconciler(&self) -> &LayoutReconciler {
        &self.reconciler
    }

    /// Refresh coordinator.
    pub fn refresh(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// Reveal technique in use.
    pub fn strategy(&self) -> StrategyKind {
        self.preparer.strategy()
    }

    /// Local time last applied to the surface.
    pub fn local_time(&self) -> f64 {
        self.applied.as_ref().map_or(0.0, |s| s.local_time)
    }

    /// Map `scroll` to local time and apply it.
    pub fn apply_scroll(&mut self, scroll: f64, frame: u64) -> ReelResult<bool> {
        self.scroll = scroll;
        let t = self.binding.local_time(scroll, self.timeline.span());
        self.apply_local_time(t, frame)
    }

    /// Evaluate the timeline at `t`, write changed values to the surface and run attached
    /// callbacks.
    ///
    /// Returns whether the surface changed; a change schedules reconciliation after `frame`.
    pub fn apply_local_time(&mut self, t: f64, frame: u64) -> ReelResult<bool> {
        let state = self.timeline.evaluate(t);
        let prev = self.applied.as_ref();
        let mut changed = false;

        for (element, style) in &state.cues {
            if prev.and_then(|p| p.cues.get(element)) != Some(style) {
                self.surface.set_cue_style(element, *style)?;
                changed = true;
            }
        }
        for (seg, &fraction) in self.segments.iter_mut().zip(&state.segments) {
            if prev.is_none() || seg.reveal_fraction != fraction {
                self.preparer.reveal(&mut self.surface, seg, fraction)?;
                changed = true;
            }
        }

        let ran = self.timeline.dispatch(state.local_time);
        if changed {
            self.reconciler.request(frame);
        }
        tracing::trace!(
            panel = %self.id,
            t = state.local_time,
            changed,
            callbacks = ran,
            "applied timeline state"
        );
        self.applied = Some(state);
        Ok(changed)
    }

    /// Cue and segment values currently on the surface.
    pub fn state(&self) -> TimelineState {
        match &self.applied {
            Some(s) => s.clone(),
            None => self.timeline.evaluate(0.0),
        }
    }

    /// Serializable view of the panel.
    pub fn snapshot(&self) -> PanelSnapshot {
        let state = self.state();
        let scroll = if self.scroll.is_nan() {
            self.binding.start()
        } else {
            self.scroll
        };
        PanelSnapshot {
            panel: self.id.clone(),
            scroll,
            progress: self.binding.progress(scroll),
            local_time: state.local_time,
            pin_translation: self.binding.pin_translation(scroll),
            strategy: self.strategy(),
            cues: state
                .cues
                .into_iter()
                .map(|(element, style)| CueSnapshot { element, style })
                .collect(),
            segments: self
                .segments
                .iter()
                .map(|s| SegmentSnapshot {
                    path: s.path().clone(),
                    mask: s.mask_id().dom_id(),
                    length: s.length(),
                    measured: s.is_measured(),
                    reveal_fraction: s.reveal_fraction(),
                })
                .collect(),
            reconcile: self.reconciler.state(),
        }
    }

    /// Queue a refresh for a new viewport.
    pub fn request_resize(&mut self, viewport: Viewport) -> bool {
        self.refresh.request(RefreshReason::Resize(viewport))
    }

    /// Queue a refresh after a host layout invalidation.
    pub fn request_invalidate(&mut self) -> bool {
        self.refresh.request(RefreshReason::Invalidate)
    }

    /// Ask for a reconciliation cycle after `frame`.
    pub fn request_reconcile(&mut self, frame: u64) -> bool {
        self.reconciler.request(frame)
    }

    /// Serve a pending refresh.
    pub fn run_refresh(&mut self, frame: u64) -> Option<RefreshReport> {
        self.refresh.run(
            &mut self.surface,
            &self.preparer,
            &mut self.segments,
            &mut self.reconciler,
            frame,
        )
    }

    /// Run one reconciliation pass if a cycle is due.
    pub fn step_reconcile(&mut self, frame: u64) -> Option<ReconcileReport> {
        self.reconciler.step(&mut self.surface, frame)
    }

    /// Run reconciliation to completion now.
    pub fn settle(&mut self) -> ReconcileReport {
        self.reconciler.reconcile_now(&mut self.surface)
    }

    /// Release timeline callbacks and pending work; the panel is inert afterwards.
    pub(crate) fn release(&mut self) {
        self.timeline.release_callbacks();
        self.reconciler.cancel();
        self.refresh.cancel();
    }

    /// Tear down and hand the surface back.
    pub fn into_surface(mut self) -> S {
        self.release();
        self.surface
    }
}

fn build_timeline(config: &PanelConfig, segments: usize) -> ReelResult<ScrollTimeline> {
    let mut tl = ScrollTimeline::new(segments);
    for step in &config.steps {
        match step {
            StepDef::Fade {
                target,
                at,
                duration,
                ease,
                offset,
            } => {
                let ids: Vec<ElementId> = target.iter().map(ElementId::new).collect();
                tl.fade_in(&ids, *at, *duration, *ease, *offset)?;
            }
            StepDef::Draw { path, at, duration } => tl.draw(&[*path], *at, *duration)?,
        }
    }
    Ok(tl)
}

#[cfg(test)]
#[path = "../../tests/unit/panel/instance.rs"]
mod tests;
