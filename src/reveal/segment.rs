use crate::foundation::core::{BezPath, ElementId, MaskId};
use crate::foundation::math::clamp01;

/// Length substituted when the host cannot measure a path.
///
/// The reveal still plays; only its speed relative to the true length is approximate.
pub const DEFAULT_PATH_LENGTH: f64 = 1000.0;

/// How a prepared segment is revealed on its host surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// The host animates the stroke's drawn fraction itself.
    NativeDraw,
    /// A solid duplicate path inside a luminance mask uncovers the styled path.
    MaskFallback,
}

/// Luminance mask that occludes a dotted/dashed stroke until it is revealed.
///
/// `reveal_path` duplicates the visible path's geometry and is stroked solid white with a
/// single dash spanning the whole length. Moving `dash_offset` from `length` to `0` grows
/// the uncovered window from the path start; the visible path's own dash pattern is never
/// touched, so its dots stay put.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MaskPrimitive {
    /// Stable mask identity.
    pub id: MaskId,
    /// Visible path the mask is attached to.
    pub target: ElementId,
    /// Solid duplicate of the target geometry.
    pub reveal_path: BezPath,
    /// `[dash, gap]` of the reveal path; both equal the measured length.
    pub dash_array: [f64; 2],
    /// Current dash offset; `length` is fully hidden, `0` fully shown.
    pub dash_offset: f64,
}

impl MaskPrimitive {
    pub(crate) fn hidden(id: MaskId, target: ElementId, reveal_path: BezPath, length: f64) -> Self {
        Self {
            id,
            target,
            reveal_path,
            dash_array: [length, length],
            dash_offset: length,
        }
    }

    /// Dash offset that exposes `fraction` of the path.
    pub fn offset_for(&self, fraction: f64) -> f64 {
        self.dash_array[0] * (1.0 - clamp01(fraction))
    }
}

/// A stroke path prepared for scroll-driven reveal.
///
/// `length` only changes when a refresh re-measures the path. `reveal_fraction` is written
/// exclusively from timeline evaluation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PathSegment {
    pub(crate) path: ElementId,
    pub(crate) length: f64,
    pub(crate) measured: bool,
    pub(crate) mask_id: MaskId,
    pub(crate) strategy: StrategyKind,
    pub(crate) mask: Option<MaskPrimitive>,
    pub(crate) reveal_fraction: f64,
}

impl PathSegment {
    /// Visible path element this segment reveals.
    pub fn path(&self) -> &ElementId {
        &self.path
    }

    /// Measured length (or [`DEFAULT_PATH_LENGTH`] if measuring failed).
    pub fn length(&self) -> f64 {
        self.length
    }

    /// `false` when `length` is the substituted default.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Stable mask identity, preserved across refreshes.
    pub fn mask_id(&self) -> MaskId {
        self.mask_id
    }

    /// Strategy the segment was prepared with.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Mask primitive, present for [`StrategyKind::MaskFallback`].
    pub fn mask(&self) -> Option<&MaskPrimitive> {
        self.mask.as_ref()
    }

    /// Fraction of the path currently exposed, in `[0, 1]`.
    pub fn reveal_fraction(&self) -> f64 {
        self.reveal_fraction
    }

    /// Length currently exposed.
    pub fn revealed_length(&self) -> f64 {
        self.length * self.reveal_fraction
    }
}

/// Dash periods past which [`visible_dash_intervals`] reports a solid span.
const MAX_DASH_PERIODS: f64 = 1e6;

/// Dash intervals of an authored pattern that lie inside the revealed prefix.
///
/// `pattern` alternates dash and gap lengths (SVG `stroke-dasharray`, odd-length patterns are
/// repeated once as in SVG), `dash_offset` is the visible path's own authored offset. The
/// result is the set of `[start, end)` dash spans, in path-length units, that a mask exposing
/// `fraction` of `length` uncovers. Spans are clipped at the reveal edge but never shifted.
pub fn visible_dash_intervals(
    pattern: &[f64],
    dash_offset: f64,
    length: f64,
    fraction: f64,
) -> Vec<(f64, f64)> {
    let revealed = length.max(0.0) * clamp01(fraction);
    if revealed <= 0.0 {
        return Vec::new();
    }

    let mut pattern: Vec<f64> = pattern.iter().map(|v| v.max(0.0)).collect();
    if pattern.len() % 2 == 1 {
        pattern.extend_from_within(..);
    }
    let period: f64 = pattern.iter().sum();
    // Patterns too fine to resolve at this length render as a solid stroke.
    if pattern.is_empty() || period <= 0.0 || revealed / period > MAX_DASH_PERIODS {
        return vec![(0.0, revealed)];
    }

    let mut out = Vec::new();
    let mut pos = -dash_offset.rem_euclid(period);
    let mut idx = 0usize;
    while pos < revealed {
        let len = pattern[idx % pattern.len()];
        let end = pos + len;
        if len > 0.0 && end <= pos {
            return vec![(0.0, revealed)];
        }
        if idx % 2 == 0 && len > 0.0 {
            let (a, b) = (pos.max(0.0), end.min(revealed));
            if b > a {
                out.push((a, b));
            }
        }
        pos = end;
        idx += 1;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/segment.rs"]
mod tests;
