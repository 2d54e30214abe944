use std::sync::Arc;

use crate::foundation::core::{ElementId, PanelId};
use crate::foundation::error::ReelResult;
use crate::reveal::segment::{PathSegment, StrategyKind};
use crate::reveal::strategy::RevealStrategy;
use crate::surface::DrawSurface;

/// Turns stroke paths into [`PathSegment`]s for one panel.
///
/// Re-preparing a path that was prepared before keeps its mask identity, so timeline
/// bindings to the segment index stay valid across refreshes.
#[derive(Clone, Debug)]
pub struct PathRevealPreparer {
    panel: PanelId,
    strategy: Arc<dyn RevealStrategy>,
}

impl PathRevealPreparer {
    /// Preparer for `panel` using an already selected strategy.
    pub fn new(panel: PanelId, strategy: Arc<dyn RevealStrategy>) -> Self {
        Self { panel, strategy }
    }

    /// Strategy chosen at construction.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Prepare a single path.
    pub fn prepare(
        &self,
        surface: &mut dyn DrawSurface,
        path: &ElementId,
        previous: Option<&PathSegment>,
    ) -> ReelResult<PathSegment> {
        let seg = self.strategy.prepare(surface, &self.panel, path, previous)?;
        tracing::debug!(
            panel = %self.panel,
            %path,
            length = seg.length,
            measured = seg.measured,
            "prepared path segment"
        );
        Ok(seg)
    }

    /// Prepare every path in order; the first failure aborts.
    pub fn prepare_all(
        &self,
        surface: &mut dyn DrawSurface,
        paths: &[ElementId],
    ) -> ReelResult<Vec<PathSegment>> {
        paths
            .iter()
            .map(|p| self.prepare(surface, p, None))
            .collect()
    }

    /// Re-measure existing segments in place.
    ///
    /// A segment whose path can no longer be prepared keeps its previous state; the error is
    /// logged and counted in the returned value.
    pub fn refresh_all(
        &self,
        surface: &mut dyn DrawSurface,
        segments: &mut [PathSegment],
    ) -> usize {
        let mut failures = 0;
        for seg in segments.iter_mut() {
            let path = seg.path.clone();
            match self.prepare(surface, &path, Some(&*seg)) {
                Ok(next) => *seg = next,
                Err(err) => {
                    failures += 1;
                    tracing::warn!(panel = %self.panel, %path, %err, "refresh kept stale segment");
                }
            }
        }
        failures
    }

    /// Reveal `fraction` of `segment`.
    pub fn reveal(
        &self,
        surface: &mut dyn DrawSurface,
        segment: &mut PathSegment,
        fraction: f64,
    ) -> ReelResult<()> {
        self.strategy.apply(surface, segment, fraction)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/preparer.rs"]
mod tests;
