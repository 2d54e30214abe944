use std::collections::{BTreeMap, BTreeSet};

use kurbo::{Affine, ParamCurveArclen, Shape};

use crate::animation::tween::CueStyle;
use crate::foundation::core::{BezPath, ElementId, MaskId, Point, Rect, Vec2, Viewport};
use crate::foundation::error::{ReelError, ReelResult};
use crate::reveal::segment::{MaskPrimitive, visible_dash_intervals};
use crate::surface::{CapabilityProbe, DrawSurface, LayoutSurface};

const ARCLEN_ACCURACY: f64 = 1e-4;

/// Id of the flow block standing in for the page content above a panel.
pub const ABOVE_BLOCK: &str = "__above";

/// How a flow block's height responds to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reflow {
    /// Height never changes.
    Fixed,
    /// Height scales with viewport width, like a responsive SVG.
    Scale,
    /// Text-like block: constant area, so narrower viewports make it taller.
    Wrap {
        /// `width * height` the block keeps.
        area: f64,
    },
}

#[derive(Clone, Debug)]
enum Placement {
    Flow {
        margin_top: f64,
        height: f64,
        reflow: Reflow,
    },
    Inside {
        parent: Option<ElementId>,
        local: Rect,
    },
    Stroke {
        parent: Option<ElementId>,
    },
}

#[derive(Clone, Debug)]
struct StrokeState {
    geometry: BezPath,
    dash_array: Vec<f64>,
    dash_offset: f64,
    mask: Option<MaskId>,
    draw_range: Option<(f64, f64)>,
}

#[derive(Clone, Debug)]
struct SceneElement {
    id: ElementId,
    placement: Placement,
    nudge: f64,
    stroke: Option<StrokeState>,
    cue: Option<CueStyle>,
}

/// In-memory host document.
///
/// Flow blocks stack top to bottom in insertion order; shifting one moves every later flow
/// block with it, the way a margin change does. Other elements sit inside a parent block
/// and follow it. With [`SceneSurface::scale_paths_with_viewport`] the contents of blocks
/// scale with viewport width, which changes measured path lengths on resize.
#[derive(Clone, Debug)]
pub struct SceneSurface {
    viewport: Viewport,
    base_viewport: Viewport,
    scale_paths: bool,
    native_draw: bool,
    elements: Vec<SceneElement>,
    masks: BTreeMap<MaskId, MaskPrimitive>,
    broken_lengths: BTreeSet<ElementId>,
}

impl SceneSurface {
    /// Empty document laid out for `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            base_viewport: viewport,
            scale_paths: false,
            native_draw: false,
            elements: Vec::new(),
            masks: BTreeMap::new(),
            broken_lengths: BTreeSet::new(),
        }
    }

    /// Advertise native stroke drawing through [`CapabilityProbe`].
    pub fn with_native_draw(mut self, enabled: bool) -> Self {
        self.native_draw = enabled;
        self
    }

    /// Scale nested contents with viewport width relative to the construction viewport.
    pub fn scale_paths_with_viewport(mut self, enabled: bool) -> Self {
        self.scale_paths = enabled;
        self
    }

    /// Append a fixed-height flow block.
    pub fn block(self, id: &str, margin_top: f64, height: f64) -> ReelResult<Self> {
        self.flow(id, margin_top, height, Reflow::Fixed)
    }

    /// Append a flow block with an explicit reflow rule.
    pub fn flow(
        mut self,
        id: &str,
        margin_top: f64,
        height: f64,
        reflow: Reflow,
    ) -> ReelResult<Self> {
        if !(margin_top.is_finite() && height.is_finite()) || height < 0.0 {
            return Err(ReelError::validation(format!(
                "block '{id}' needs finite margin and height >= 0"
            )));
        }
        self.push(
            id,
            Placement::Flow {
                margin_top,
                height,
                reflow,
            },
            None,
        )?;
        Ok(self)
    }

    /// Add a box positioned relative to `parent` (or the document origin).
    pub fn element(mut self, id: &str, parent: Option<&str>, local: Rect) -> ReelResult<Self> {
        let parent = self.parent_ref(parent)?;
        self.push(id, Placement::Inside { parent, local }, None)?;
        Ok(self)
    }

    /// Add a stroke path; `geometry` is relative to `parent`.
    pub fn stroke(
        mut self,
        id: &str,
        parent: Option<&str>,
        geometry: BezPath,
        dash_array: Vec<f64>,
    ) -> ReelResult<Self> {
        let parent = self.parent_ref(parent)?;
        self.push(
            id,
            Placement::Stroke { parent },
            Some(StrokeState {
                geometry,
                dash_array,
                dash_offset: 0.0,
                mask: None,
                draw_range: None,
            }),
        )?;
        Ok(self)
    }

    /// [`SceneSurface::stroke`] from SVG path data.
    pub fn stroke_svg(
        self,
        id: &str,
        parent: Option<&str>,
        d: &str,
        dash_array: Vec<f64>,
    ) -> ReelResult<Self> {
        let geometry = BezPath::from_svg(d)
            .map_err(|e| ReelError::validation(format!("invalid path data for '{id}': {e}")))?;
        self.stroke(id, parent, geometry, dash_array)
    }

    /// Set the authored `stroke-dashoffset` of a stroke path.
    pub fn with_dash_offset(mut self, path: &str, offset: f64) -> ReelResult<Self> {
        if !offset.is_finite() {
            return Err(ReelError::validation(format!(
                "dash offset of '{path}' must be finite"
            )));
        }
        let stroke = self
            .find_mut(&ElementId::new(path))
            .and_then(|e| e.stroke.as_mut())
            .ok_or_else(|| ReelError::validation(format!("'{path}' is not a stroke path")))?;
        stroke.dash_offset = offset;
        Ok(self)
    }

    /// Make length queries for `path` fail, as on hosts without a length API.
    pub fn break_length_query(&mut self, path: &str) {
        self.broken_lengths.insert(ElementId::new(path));
    }

    /// Drop an element (and any mask targeting it).
    pub fn remove(&mut self, id: &str) {
        let id = ElementId::new(id);
        self.elements.retain(|e| e.id != id);
        self.masks.retain(|_, m| m.target != id);
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Installed mask by identity.
    pub fn mask(&self, id: MaskId) -> Option<&MaskPrimitive> {
        self.masks.get(&id)
    }

    /// Number of installed masks.
    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    /// Mask attached to a visible path.
    pub fn attached_mask(&self, path: &str) -> Option<MaskId> {
        self.find(&ElementId::new(path))?.stroke.as_ref()?.mask
    }

    /// Authored dash pattern of a path.
    pub fn dash_array(&self, path: &str) -> Option<&[f64]> {
        self.find(&ElementId::new(path))?
            .stroke
            .as_ref()
            .map(|s| s.dash_array.as_slice())
    }

    /// Authored dash offset of a path.
    pub fn dash_offset(&self, path: &str) -> Option<f64> {
        Some(self.find(&ElementId::new(path))?.stroke.as_ref()?.dash_offset)
    }

    /// Native draw range last set on a path.
    pub fn draw_range(&self, path: &str) -> Option<(f64, f64)> {
        self.find(&ElementId::new(path))?.stroke.as_ref()?.draw_range
    }

    /// Cue style last applied to an element.
    pub fn cue_style(&self, id: &str) -> Option<CueStyle> {
        self.find(&ElementId::new(id))?.cue
    }

    /// Dash spans of `path` currently visible through its mask or native draw range.
    pub fn visible_dashes(&self, path: &str) -> Vec<(f64, f64)> {
        let id = ElementId::new(path);
        let Some(stroke) = self.find(&id).and_then(|e| e.stroke.as_ref()) else {
            return Vec::new();
        };
        let Ok(length) = self.path_length(&id) else {
            return Vec::new();
        };
        let fraction = match (stroke.mask.and_then(|m| self.masks.get(&m)), stroke.draw_range) {
            (Some(mask), _) if mask.dash_array[0] > 0.0 => {
                1.0 - mask.dash_offset / mask.dash_array[0]
            }
            (None, Some((_, end))) => end,
            _ => 1.0,
        };
        visible_dash_intervals(&stroke.dash_array, stroke.dash_offset, length, fraction)
    }

    fn parent_ref(&self, parent: Option<&str>) -> ReelResult<Option<ElementId>> {
        match parent {
            None => Ok(None),
            Some(p) => {
                let p = ElementId::new(p);
                if self.find(&p).is_none() {
                    return Err(ReelError::validation(format!("unknown parent '{p}'")));
                }
                Ok(Some(p))
            }
        }
    }

    fn push(
        &mut self,
        id: &str,
        placement: Placement,
        stroke: Option<StrokeState>,
    ) -> ReelResult<()> {
        let id = ElementId::new(id);
        if self.find(&id).is_some() {
            return Err(ReelError::validation(format!("duplicate element id '{id}'")));
        }
        self.elements.push(SceneElement {
            id,
            placement,
            nudge: 0.0,
            stroke,
            cue: None,
        });
        Ok(())
    }

    fn find(&self, id: &ElementId) -> Option<&SceneElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    fn find_mut(&mut self, id: &ElementId) -> Option<&mut SceneElement> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    fn content_scale(&self) -> f64 {
        if self.scale_paths {
            self.viewport.width / self.base_viewport.width
        } else {
            1.0
        }
    }

    fn origin(&self, parent: Option<&ElementId>) -> Option<Point> {
        match parent {
            None => Some(Point::ZERO),
            Some(p) => self.box_of(p).map(|r| r.origin()),
        }
    }

    fn flow_box(&self, target: &ElementId) -> Option<Rect> {
        let mut cursor = 0.0;
        for el in &self.elements {
            let Placement::Flow {
                margin_top,
                height,
                reflow,
            } = &el.placement
            else {
                continue;
            };
            let height = match reflow {
                Reflow::Fixed => *height,
                Reflow::Scale => *height * self.content_scale(),
                Reflow::Wrap { area } => area / self.viewport.width,
            };
            let y0 = cursor + margin_top + el.nudge;
            let rect = Rect::new(0.0, y0, self.viewport.width, y0 + height);
            if &el.id == target {
                return Some(rect);
            }
            cursor = rect.y1;
        }
        None
    }

    fn placed_geometry(&self, el: &SceneElement) -> Option<BezPath> {
        let (Placement::Stroke { parent }, Some(stroke)) = (&el.placement, &el.stroke) else {
            return None;
        };
        let o = self.origin(parent.as_ref())?;
        let xf = Affine::translate(o.to_vec2() + Vec2::new(0.0, el.nudge))
            * Affine::scale(self.content_scale());
        Some(xf * stroke.geometry.clone())
    }
}

impl CapabilityProbe for SceneSurface {
    fn native_draw(&self) -> bool {
        self.native_draw
    }
}

impl DrawSurface for SceneSurface {
    fn has_element(&self, id: &ElementId) -> bool {
        self.find(id).is_some()
    }

    fn path_length(&self, path: &ElementId) -> ReelResult<f64> {
        if self.broken_lengths.contains(path) {
            return Err(ReelError::geometry(format!(
                "length query unsupported for '{path}'"
            )));
        }
        let geometry = self
            .path_geometry(path)
            .ok_or_else(|| ReelError::geometry(format!("'{path}' is not a stroke path")))?;
        Ok(geometry
            .segments()
            .map(|seg| seg.arclen(ARCLEN_ACCURACY))
            .sum())
    }

    fn path_geometry(&self, path: &ElementId) -> Option<BezPath> {
        self.placed_geometry(self.find(path)?)
    }

    fn install_mask(&mut self, mask: &MaskPrimitive) -> ReelResult<()> {
        let stroke = self
            .find_mut(&mask.target)
            .and_then(|e| e.stroke.as_mut())
            .ok_or_else(|| {
                ReelError::geometry(format!("mask target '{}' is not a path", mask.target))
            })?;
        stroke.mask = Some(mask.id);
        self.masks.insert(mask.id, mask.clone());
        Ok(())
    }

    fn set_mask_dash_offset(&mut self, mask: MaskId, offset: f64) -> ReelResult<()> {
        let m = self
            .masks
            .get_mut(&mask)
            .ok_or_else(|| ReelError::geometry(format!("unknown mask {}", mask.dom_id())))?;
        m.dash_offset = offset;
        Ok(())
    }

    fn set_draw_range(&mut self, path: &ElementId, start: f64, end: f64) -> ReelResult<()> {
        let stroke = self
            .find_mut(path)
            .and_then(|e| e.stroke.as_mut())
            .ok_or_else(|| ReelError::geometry(format!("'{path}' is not a stroke path")))?;
        stroke.draw_range = Some((start, end));
        Ok(())
    }

    fn set_cue_style(&mut self, element: &ElementId, style: CueStyle) -> ReelResult<()> {
        let el = self
            .find_mut(element)
            .ok_or_else(|| ReelError::evaluation(format!("cue element '{element}' not found")))?;
        el.cue = Some(style);
        Ok(())
    }
}

impl LayoutSurface for SceneSurface {
    fn box_of(&self, element: &ElementId) -> Option<Rect> {
        let el = self.find(element)?;
        match &el.placement {
            Placement::Flow { .. } => self.flow_box(element),
            Placement::Inside { parent, local } => {
                let o = self.origin(parent.as_ref())?;
                let s = self.content_scale();
                let r = Rect::new(local.x0 * s, local.y0 * s, local.x1 * s, local.y1 * s);
                Some(r + o.to_vec2() + Vec2::new(0.0, el.nudge))
            }
            Placement::Stroke { .. } => self.placed_geometry(el).map(|g| g.bounding_box()),
        }
    }

    fn shift_y(&mut self, element: &ElementId, dy: f64) -> ReelResult<()> {
        let el = self
            .find_mut(element)
            .ok_or_else(|| ReelError::layout(format!("cannot shift unknown element '{element}'")))?;
        el.nudge += dy;
        Ok(())
    }

    fn reflow(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/scene.rs"]
mod tests;
