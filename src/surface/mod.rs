//! Host seams: everything the reveal core reads from or writes to the page.

pub(crate) mod scene;
pub(crate) mod svg;

use crate::animation::tween::CueStyle;
use crate::foundation::core::{BezPath, ElementId, MaskId, Rect, Viewport};
use crate::foundation::error::ReelResult;
use crate::reveal::segment::MaskPrimitive;

/// Drawing side of a host document.
pub trait DrawSurface {
    /// Whether an element with this id exists.
    fn has_element(&self, id: &ElementId) -> bool;

    /// Total stroke length of a path element.
    fn path_length(&self, path: &ElementId) -> ReelResult<f64>;

    /// Current geometry of a path element, in document coordinates.
    fn path_geometry(&self, path: &ElementId) -> Option<BezPath>;

    /// Create or replace the mask identified by `mask.id` and attach it to `mask.target`.
    fn install_mask(&mut self, mask: &MaskPrimitive) -> ReelResult<()>;

    /// Move the solid reveal dash of an installed mask.
    fn set_mask_dash_offset(&mut self, mask: MaskId, offset: f64) -> ReelResult<()>;

    /// Native stroke drawing: show the `[start, end]` fraction of a path.
    fn set_draw_range(&mut self, path: &ElementId, start: f64, end: f64) -> ReelResult<()>;

    /// Apply a cue's opacity and vertical offset.
    fn set_cue_style(&mut self, element: &ElementId, style: CueStyle) -> ReelResult<()>;
}

/// Layout side of a host document.
pub trait LayoutSurface {
    /// Rendered box of an element, if it exists.
    fn box_of(&self, element: &ElementId) -> Option<Rect>;

    /// Move an element vertically by `dy`.
    fn shift_y(&mut self, element: &ElementId, dy: f64) -> ReelResult<()>;

    /// Let the host re-run its responsive rules for a new viewport.
    fn reflow(&mut self, _viewport: Viewport) {}
}

/// A surface a panel can be mounted on.
pub trait PanelSurface: DrawSurface + LayoutSurface {}

impl<T: DrawSurface + LayoutSurface> PanelSurface for T {}

/// One-shot query of host drawing capabilities.
pub trait CapabilityProbe {
    /// `true` if the host can animate a stroke's drawn fraction itself.
    fn native_draw(&self) -> bool;
}

/// Fixed answer, for hosts that know their capabilities up front.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCapabilities {
    /// Native stroke drawing support.
    pub native_draw: bool,
}

impl CapabilityProbe for StaticCapabilities {
    fn native_draw(&self) -> bool {
        self.native_draw
    }
}
