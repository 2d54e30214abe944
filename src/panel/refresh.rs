use crate::foundation::core::Viewport;
use crate::layout::reconciler::LayoutReconciler;
use crate::reveal::preparer::PathRevealPreparer;
use crate::reveal::segment::PathSegment;
use crate::surface::PanelSurface;

/// Why a refresh was requested.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshReason {
    /// The viewport changed size.
    Resize(Viewport),
    /// The host signalled that layout is stale.
    Invalidate,
}

/// What one refresh did.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RefreshReport {
    /// Trigger that was served.
    pub reason: RefreshReason,
    /// Segments re-prepared.
    pub segments: usize,
    /// Segments that kept stale geometry.
    pub failures: usize,
    /// Whether a new reconciliation cycle was scheduled (`false` when coalesced).
    pub reconcile_scheduled: bool,
}

/// Re-measures path geometry after reflow and re-seeds layout reconciliation.
///
/// Triggers between two runs collapse into one; a resize wins over a plain invalidation and
/// the newest viewport is the one applied. The scroll binding is left alone.
#[derive(Clone, Debug, Default)]
pub struct RefreshCoordinator {
    pending: Option<RefreshReason>,
    runs: u64,
}

impl RefreshCoordinator {
    /// Coordinator with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a refresh. Returns `false` when merged into an already pending one.
    pub fn request(&mut self, reason: RefreshReason) -> bool {
        let fresh = self.pending.is_none();
        self.pending = match (self.pending, reason) {
            (Some(RefreshReason::Resize(vp)), RefreshReason::Invalidate) => {
                Some(RefreshReason::Resize(vp))
            }
            _ => Some(reason),
        };
        fresh
    }

    /// A refresh is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Completed refreshes.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Drop any pending refresh.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Serve the pending refresh, if any.
    #[tracing::instrument(skip_all, fields(frame = frame))]
    pub fn run<S: PanelSurface>(
        &mut self,
        surface: &mut S,
        preparer: &PathRevealPreparer,
        segments: &mut [PathSegment],
        reconciler: &mut LayoutReconciler,
        frame: u64,
    ) -> Option<RefreshReport> {
        let reason = self.pending.take()?;
        if let RefreshReason::Resize(viewport) = reason {
            surface.reflow(viewport);
        }
        let failures = preparer.refresh_all(surface, segments);
        let reconcile_scheduled = reconciler.request(frame);
        self.runs += 1;
        tracing::debug!(
            ?reason,
            segments = segments.len(),
            failures,
            reconcile_scheduled,
            "refreshed panel geometry"
        );
        Some(RefreshReport {
            reason,
            segments: segments.len(),
            failures,
            reconcile_scheduled,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/panel/refresh.rs"]
mod tests;
