use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::constraint::LayoutConstraint;
use crate::surface::LayoutSurface;

/// Gap error below which no correction is applied.
pub const CONVERGENCE_EPSILON: f64 = 0.5;
/// Correction passes per cycle.
pub const MAX_ITERATIONS: usize = 6;

/// Lifecycle of a reconciliation cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileState {
    /// Nothing scheduled; the last cycle (if any) hit the iteration cap.
    #[default]
    Idle,
    /// A cycle will start on the next frame.
    Scheduled,
    /// A cycle is in flight; one pass runs per frame.
    Running,
    /// The last cycle brought every constraint within epsilon.
    Converged,
}

/// Outcome of one finished cycle.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ReconcileReport {
    /// Correction passes applied.
    pub iterations: usize,
    /// Whether every measurable constraint ended within epsilon.
    pub converged: bool,
    /// Sum of absolute shifts applied.
    pub total_shift: f64,
    /// Largest remaining gap error.
    pub residual: f64,
}

enum Pass {
    Done,
    Corrected,
}

/// Bounded fixed-point loop restoring configured gaps after layout drift.
///
/// A cycle alternates measure and correct, at most [`MAX_ITERATIONS`] corrections, and stops
/// early once every constraint is within epsilon. Requests while a cycle is scheduled or
/// running are coalesced into it.
#[derive(Clone, Debug)]
pub struct LayoutReconciler {
    constraints: Vec<LayoutConstraint>,
    epsilon: f64,
    max_iterations: usize,
    state: ReconcileState,
    scheduled_at: u64,
    current: ReconcileReport,
    last: Option<ReconcileReport>,
}

impl LayoutReconciler {
    /// Reconciler with the default epsilon and iteration cap.
    pub fn new(constraints: Vec<LayoutConstraint>) -> Self {
        Self {
            constraints,
            epsilon: CONVERGENCE_EPSILON,
            max_iterations: MAX_ITERATIONS,
            state: ReconcileState::Idle,
            scheduled_at: 0,
            current: ReconcileReport::default(),
            last: None,
        }
    }

    /// Override epsilon and iteration cap.
    pub fn with_limits(mut self, epsilon: f64, max_iterations: usize) -> ReelResult<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(ReelError::validation("epsilon must be finite and > 0"));
        }
        if max_iterations == 0 {
            return Err(ReelError::validation("max_iterations must be > 0"));
        }
        self.epsilon = epsilon;
        self.max_iterations = max_iterations;
        Ok(self)
    }

    /// Tracked constraints.
    pub fn constraints(&self) -> &[LayoutConstraint] {
        &self.constraints
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// A cycle is scheduled or running.
    pub fn in_flight(&self) -> bool {
        matches!(self.state, ReconcileState::Scheduled | ReconcileState::Running)
    }

    /// Report of the last finished cycle.
    pub fn last_report(&self) -> Option<&ReconcileReport> {
        self.last.as_ref()
    }

    /// Schedule a cycle to start after `frame`. Returns `false` when coalesced.
    pub fn request(&mut self, frame: u64) -> bool {
        if self.in_flight() {
            tracing::trace!(frame, "reconciliation request coalesced");
            return false;
        }
        self.state = ReconcileState::Scheduled;
        self.scheduled_at = frame;
        self.current = ReconcileReport::default();
        true
    }

    /// Drop any scheduled or running cycle.
    pub fn cancel(&mut self) {
        if self.in_flight() {
            tracing::debug!("reconciliation cancelled");
        }
        self.state = ReconcileState::Idle;
    }

    /// Whether [`LayoutReconciler::step`] would run a pass at `frame`.
    pub fn is_due(&self, frame: u64) -> bool {
        match self.state {
            ReconcileState::Scheduled => frame > self.scheduled_at,
            ReconcileState::Running => true,
            _ => false,
        }
    }

    /// Run one pass if a cycle is due at `frame`.
    ///
    /// Cycles scheduled during `frame` wait for a later frame. Returns the report when the
    /// cycle finished in this step.
    pub fn step(
        &mut self,
        surface: &mut dyn LayoutSurface,
        frame: u64,
    ) -> Option<ReconcileReport> {
        if !self.is_due(frame) {
            return None;
        }
        self.state = ReconcileState::Running;
        match self.pass(surface) {
            Pass::Corrected => None,
            Pass::Done => Some(self.finish()),
        }
    }

    /// Run a whole cycle immediately, absorbing any scheduled one.
    #[tracing::instrument(skip_all, fields(constraints = self.constraints.len()))]
    pub fn reconcile_now(&mut self, surface: &mut dyn LayoutSurface) -> ReconcileReport {
        if !self.in_flight() {
            self.current = ReconcileReport::default();
        }
        self.state = ReconcileState::Running;
        while let Pass::Corrected = self.pass(surface) {}
        self.finish()
    }

    fn pass(&mut self, surface: &mut dyn LayoutSurface) -> Pass {
        let residual = self.residual(surface);
        self.current.residual = residual;
        if residual < self.epsilon {
            self.current.converged = true;
            return Pass::Done;
        }
        if self.current.iterations >= self.max_iterations {
            return Pass::Done;
        }

        for c in &self.constraints {
            let Some(err) = c.error(surface) else {
                continue;
            };
            if err.abs() < self.epsilon {
                continue;
            }
            let (element, dy) = c.correction(err);
            match surface.shift_y(element, dy) {
                Ok(()) => self.current.total_shift += dy.abs(),
                Err(e) => tracing::warn!(%element, error = %e, "layout correction failed"),
            }
        }
        self.current.iterations += 1;
        Pass::Corrected
    }

    fn residual(&self, surface: &dyn LayoutSurface) -> f64 {
        self.constraints
            .iter()
            .filter_map(|c| c.error(surface))
            .map(f64::abs)
            .fold(0.0, f64::max)
    }

    fn finish(&mut self) -> ReconcileReport {
        let report = std::mem::take(&mut self.current);
        self.state = if report.converged {
            ReconcileState::Converged
        } else {
            tracing::debug!(
                iterations = report.iterations,
                residual = report.residual,
                "reconciliation stopped at iteration cap"
            );
            ReconcileState::Idle
        };
        self.last = Some(report.clone());
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/reconciler.rs"]
mod tests;
