use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::Fnv1a64;

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Reference to a host element (path, text node, container) by its document id.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one mounted reveal panel inside a [`crate::Stage`].
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PanelId(pub String);

impl PanelId {
    /// Build a panel id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identity of the mask primitive attached to one stroke path.
///
/// Derived from `(panel, path)` so re-preparing the same element yields the same handle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MaskId(pub(crate) u64);

impl MaskId {
    pub(crate) fn derive(panel: &PanelId, path: &ElementId) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(b"mask:");
        h.write_bytes(panel.0.as_bytes());
        h.write_u8(0);
        h.write_bytes(path.0.as_bytes());
        Self(h.finish())
    }

    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Document id used for the generated `<mask>` element.
    pub fn dom_id(self) -> String {
        format!("reveal-mask-{:016x}", self.0)
    }
}

/// Vertical edge of an element box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Top edge (`y0`).
    Top,
    /// Bottom edge (`y1`).
    Bottom,
}

impl Edge {
    /// Read this edge from a box.
    pub fn of(self, rect: Rect) -> f64 {
        match self {
            Self::Top => rect.y0,
            Self::Bottom => rect.y1,
        }
    }
}

/// Host viewport dimensions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS-pixel-equivalent units.
    pub width: f64,
    /// Height in CSS-pixel-equivalent units.
    pub height: f64,
}

impl Viewport {
    /// Build a validated viewport.
    pub fn new(width: f64, height: f64) -> ReelResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ReelError::validation(
                "viewport width/height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}
