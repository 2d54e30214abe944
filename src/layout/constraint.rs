use crate::foundation::core::{Edge, ElementId};
use crate::surface::LayoutSurface;

/// Axis a gap is measured along. Only vertical gaps are reconciled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Top-to-bottom.
    #[default]
    Vertical,
}

/// Which side of a constraint the reconciler moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movable {
    /// Move the subject toward/away from the anchor.
    #[default]
    Subject,
    /// Move the anchor instead.
    Anchor,
}

/// Desired gap `subject_edge - anchor_edge == target_gap`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutConstraint {
    /// Reference element.
    pub anchor: ElementId,
    /// Edge of the anchor the gap starts at.
    pub anchor_edge: Edge,
    /// Element positioned relative to the anchor.
    pub subject: ElementId,
    /// Edge of the subject the gap ends at.
    pub subject_edge: Edge,
    /// Gap to maintain.
    pub target_gap: f64,
    /// Measurement axis.
    pub axis: Axis,
    /// Side that gets moved.
    pub movable: Movable,
    /// Spacing token the gap was resolved from, for diagnostics.
    pub token: Option<String>,
}

impl LayoutConstraint {
    /// Current gap, if both elements are laid out.
    pub fn gap(&self, surface: &dyn LayoutSurface) -> Option<f64> {
        let a = surface.box_of(&self.anchor)?;
        let s = surface.box_of(&self.subject)?;
        Some(self.subject_edge.of(s) - self.anchor_edge.of(a))
    }

    /// `target - current`, if measurable.
    pub fn error(&self, surface: &dyn LayoutSurface) -> Option<f64> {
        self.gap(surface).map(|g| self.target_gap - g)
    }

    /// Element to move and by how much to cancel `error`.
    pub(crate) fn correction(&self, error: f64) -> (&ElementId, f64) {
        match self.movable {
            Movable::Subject => (&self.subject, error),
            Movable::Anchor => (&self.anchor, -error),
        }
    }
}
