use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::core::{PanelId, Viewport};
use crate::foundation::error::ReelResult;
use crate::panel::config::PanelConfig;
use crate::panel::instance::Panel;
use crate::reveal::segment::StrategyKind;
use crate::reveal::strategy::{RevealStrategy, select_strategy};
use crate::stage::listeners::{ListenerHandle, ListenerKind, ListenerRegistry};
use crate::surface::{CapabilityProbe, PanelSurface};

struct Mounted<S> {
    panel: Panel<S>,
    listeners: Vec<ListenerHandle>,
}

/// Work done by one [`Stage::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameReport {
    /// Frame number (first tick is 1).
    pub frame: u64,
    /// Panels whose timeline was re-evaluated for a new scroll offset.
    pub evaluated: usize,
    /// Refreshes served.
    pub refreshed: usize,
    /// Panels that ran a reconciliation pass.
    pub reconcile_steps: usize,
    /// Reconciliation cycles that finished this frame.
    pub reconcile_finished: usize,
}

/// Registry of mounted panels and the frame loop driving them.
///
/// The reveal strategy is probed once at construction and shared by every panel. Host
/// operations never fail: degradations are logged and the affected panel is skipped.
pub struct Stage<S> {
    strategy: Arc<dyn RevealStrategy>,
    panels: BTreeMap<PanelId, Mounted<S>>,
    listeners: ListenerRegistry,
    viewport: Viewport,
    scroll: f64,
    pending_scroll: Option<f64>,
    frame: u64,
}

impl<S> std::fmt::Debug for Stage<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("strategy", &self.strategy.kind())
            .field("panels", &self.panels.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .field("scroll", &self.scroll)
            .field("frame", &self.frame)
            .finish()
    }
}

impl<S: PanelSurface> Stage<S> {
    /// Empty stage; `probe` is queried exactly once here.
    pub fn new(probe: &dyn CapabilityProbe, viewport: Viewport) -> Self {
        Self::with_strategy(select_strategy(probe), viewport)
    }

    /// Empty stage with an explicit strategy.
    pub fn with_strategy(strategy: Arc<dyn RevealStrategy>, viewport: Viewport) -> Self {
        Self {
            strategy,
            panels: BTreeMap::new(),
            listeners: ListenerRegistry::new(),
            viewport,
            scroll: 0.0,
            pending_scroll: None,
            frame: 0,
        }
    }

    /// Strategy every panel reveals with.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Mount a panel, replacing any panel with the same id.
    ///
    /// Returns `None` (after logging) when the panel cannot be mounted.
    pub fn mount(
        &mut self,
        id: impl Into<String>,
        config: PanelConfig,
        surface: S,
    ) -> Option<PanelId> {
        let id = PanelId::new(id);
        match self.try_mount(id.clone(), config, surface) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::error!(panel = %id, error = %err, "skipping panel");
                None
            }
        }
    }

    /// [`Stage::mount`] that reports why mounting failed.
    pub fn try_mount(
        &mut self,
        id: PanelId,
        config: PanelConfig,
        surface: S,
    ) -> ReelResult<PanelId> {
        if self.panels.contains_key(&id) {
            self.unmount(&id);
        }
        let mut panel = Panel::mount(id.clone(), config, surface, Arc::clone(&self.strategy))?;
        panel.apply_scroll(self.scroll, self.frame)?;
        let listeners = self.listeners.acquire_panel(&id);
        self.panels.insert(id.clone(), Mounted { panel, listeners });
        Ok(id)
    }

    /// Unmount a panel, releasing its listeners, callbacks and pending work.
    ///
    /// Returns the panel's surface.
    pub fn unmount(&mut self, id: &PanelId) -> Option<S> {
        let mounted = self.panels.remove(id)?;
        let mut released = 0;
        for handle in mounted.listeners {
            if self.listeners.release(handle) {
                released += 1;
            }
        }
        tracing::info!(panel = %id, listeners = released, "unmounted panel");
        Some(mounted.panel.into_surface())
    }

    /// Unmount everything.
    pub fn clear(&mut self) {
        let ids: Vec<PanelId> = self.panels.keys().cloned().collect();
        for id in ids {
            self.unmount(&id);
        }
    }

    /// Mounted panel by id.
    pub fn panel(&self, id: &PanelId) -> Option<&Panel<S>> {
        self.panels.get(id).map(|m| &m.panel)
    }

    /// Mounted panel by id, mutably.
    pub fn panel_mut(&mut self, id: &PanelId) -> Option<&mut Panel<S>> {
        self.panels.get_mut(id).map(|m| &mut m.panel)
    }

    /// Ids of mounted panels, sorted.
    pub fn panel_ids(&self) -> Vec<PanelId> {
        self.panels.keys().cloned().collect()
    }

    /// Number of mounted panels.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// No panels mounted.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Live host listeners; three per mounted panel.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Record a scroll offset; applied on the next tick.
    pub fn scroll_to(&mut self, offset: f64) {
        if offset.is_finite() {
            self.pending_scroll = Some(offset);
        } else {
            tracing::warn!(offset, "ignoring non-finite scroll offset");
        }
    }

    /// Record a viewport change; every resize-listening panel refreshes on the next tick.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for (id, m) in &mut self.panels {
            if self.listeners.is_listening(id, ListenerKind::Resize) {
                m.panel.request_resize(viewport);
            }
        }
    }

    /// Host signalled stale layout for one panel, or for all when `id` is `None`.
    pub fn invalidate(&mut self, id: Option<&PanelId>) {
        for (pid, m) in &mut self.panels {
            if id.is_none_or(|want| want == pid) {
                m.panel.request_invalidate();
            }
        }
    }

    /// Run one animation frame.
    ///
    /// Order: pending scroll is applied to every timeline, then pending refreshes run, then
    /// reconciliation cycles scheduled in an earlier frame take one pass each.
    pub fn tick(&mut self) -> FrameReport {
        self.frame += 1;
        let frame = self.frame;
        let mut report = FrameReport {
            frame,
            ..FrameReport::default()
        };

        if let Some(scroll) = self.pending_scroll.take() {
            self.scroll = scroll;
            for (id, m) in &mut self.panels {
                if !self.listeners.is_listening(id, ListenerKind::ScrollBinding) {
                    continue;
                }
                match m.panel.apply_scroll(scroll, frame) {
                    Ok(_) => report.evaluated += 1,
                    Err(err) => tracing::warn!(panel = %id, error = %err, "timeline apply failed"),
                }
            }
        }

        for (id, m) in &mut self.panels {
            if !self.listeners.is_listening(id, ListenerKind::FrameCallback) {
                continue;
            }
            if m.panel.run_refresh(frame).is_some() {
                report.refreshed += 1;
            }
        }

        for (id, m) in &mut self.panels {
            if !self.listeners.is_listening(id, ListenerKind::FrameCallback) {
                continue;
            }
            if !m.panel.reconciler().is_due(frame) {
                continue;
            }
            report.reconcile_steps += 1;
            if m.panel.step_reconcile(frame).is_some() {
                report.reconcile_finished += 1;
            }
        }

        tracing::debug!(?report, "frame");
        report
    }

    /// Tick until no panel has pending refresh or reconciliation work, at most `max_frames`.
    pub fn run_until_idle(&mut self, max_frames: u64) -> Vec<FrameReport> {
        let mut out = Vec::new();
        for _ in 0..max_frames {
            out.push(self.tick());
            if !self.has_pending_work() {
                break;
            }
        }
        out
    }

    /// Some panel still has scroll, refresh or reconciliation work queued.
    pub fn has_pending_work(&self) -> bool {
        self.pending_scroll.is_some()
            || self
                .panels
                .values()
                .any(|m| m.panel.refresh().is_pending() || m.panel.reconciler().in_flight())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/registry.rs"]
mod tests;
