use std::sync::Arc;

use crate::foundation::core::{ElementId, MaskId, PanelId};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp01;
use crate::reveal::segment::{DEFAULT_PATH_LENGTH, MaskPrimitive, PathSegment, StrategyKind};
use crate::surface::{CapabilityProbe, DrawSurface};

/// Technique used to make a stroke appear to draw itself.
///
/// Chosen once per [`crate::Stage`] from a [`CapabilityProbe`]; call sites never branch on
/// host capabilities themselves.
pub trait RevealStrategy: std::fmt::Debug + Send + Sync {
    /// Which technique this is.
    fn kind(&self) -> StrategyKind;

    /// Measure `path` and install whatever the technique needs on the surface.
    ///
    /// `previous` is the segment from an earlier preparation of the same element; its mask
    /// identity and reveal fraction carry over.
    fn prepare(
        &self,
        surface: &mut dyn DrawSurface,
        panel: &PanelId,
        path: &ElementId,
        previous: Option<&PathSegment>,
    ) -> ReelResult<PathSegment>;

    /// Push `fraction` of `segment` to the surface and record it on the segment.
    fn apply(
        &self,
        surface: &mut dyn DrawSurface,
        segment: &mut PathSegment,
        fraction: f64,
    ) -> ReelResult<()>;
}

/// Host animates the drawn fraction directly.
#[derive(Debug, Default)]
pub struct NativeDraw;

/// Solid reveal path inside a luminance mask over the untouched dotted stroke.
#[derive(Debug, Default)]
pub struct MaskFallback;

/// Run the capability probe and pick a strategy.
pub fn select_strategy(probe: &dyn CapabilityProbe) -> Arc<dyn RevealStrategy> {
    let strategy: Arc<dyn RevealStrategy> = if probe.native_draw() {
        Arc::new(NativeDraw)
    } else {
        Arc::new(MaskFallback)
    };
    tracing::info!(strategy = ?strategy.kind(), "selected path reveal strategy");
    strategy
}

fn measure(surface: &dyn DrawSurface, path: &ElementId) -> (f64, bool) {
    match surface.path_length(path) {
        Ok(len) if len.is_finite() && len > 0.0 => (len, true),
        Ok(len) => {
            tracing::debug!(%path, len, "unusable path length, using default");
            (DEFAULT_PATH_LENGTH, false)
        }
        Err(err) => {
            tracing::warn!(%path, %err, "path length query failed, using default");
            (DEFAULT_PATH_LENGTH, false)
        }
    }
}

fn identity(panel: &PanelId, path: &ElementId, previous: Option<&PathSegment>) -> (MaskId, f64) {
    match previous {
        Some(prev) => (prev.mask_id, prev.reveal_fraction),
        None => (MaskId::derive(panel, path), 0.0),
    }
}

impl RevealStrategy for NativeDraw {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NativeDraw
    }

    fn prepare(
        &self,
        surface: &mut dyn DrawSurface,
        panel: &PanelId,
        path: &ElementId,
        previous: Option<&PathSegment>,
    ) -> ReelResult<PathSegment> {
        if !surface.has_element(path) {
            return Err(ReelError::geometry(format!("path '{path}' not found")));
        }
        let (length, measured) = measure(surface, path);
        let (mask_id, fraction) = identity(panel, path, previous);
        surface.set_draw_range(path, 0.0, fraction)?;
        Ok(PathSegment {
            path: path.clone(),
            length,
            measured,
            mask_id,
            strategy: StrategyKind::NativeDraw,
            mask: None,
            reveal_fraction: fraction,
        })
    }

    fn apply(
        &self,
        surface: &mut dyn DrawSurface,
        segment: &mut PathSegment,
        fraction: f64,
    ) -> ReelResult<()> {
        let fraction = clamp01(fraction);
        surface.set_draw_range(&segment.path, 0.0, fraction)?;
        segment.reveal_fraction = fraction;
        Ok(())
    }
}

impl RevealStrategy for MaskFallback {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MaskFallback
    }

    fn prepare(
        &self,
        surface: &mut dyn DrawSurface,
        panel: &PanelId,
        path: &ElementId,
        previous: Option<&PathSegment>,
    ) -> ReelResult<PathSegment> {
        let geometry = surface
            .path_geometry(path)
            .ok_or_else(|| ReelError::geometry(format!("path '{path}' not found")))?;
        let (length, measured) = measure(surface, path);
        let (mask_id, fraction) = identity(panel, path, previous);

        let mut mask = MaskPrimitive::hidden(mask_id, path.clone(), geometry, length);
        mask.dash_offset = mask.offset_for(fraction);
        surface.install_mask(&mask)?;

        Ok(PathSegment {
            path: path.clone(),
            length,
            measured,
            mask_id,
            strategy: StrategyKind::MaskFallback,
            mask: Some(mask),
            reveal_fraction: fraction,
        })
    }

    fn apply(
        &self,
        surface: &mut dyn DrawSurface,
        segment: &mut PathSegment,
        fraction: f64,
    ) -> ReelResult<()> {
        let fraction = clamp01(fraction);
        let Some(mask) = segment.mask.as_mut() else {
            return Err(ReelError::evaluation(format!(
                "segment '{}' has no mask installed",
                segment.path
            )));
        };
        let offset = mask.offset_for(fraction);
        surface.set_mask_dash_offset(mask.id, offset)?;
        mask.dash_offset = offset;
        segment.reveal_fraction = fraction;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/strategy.rs"]
mod tests;
