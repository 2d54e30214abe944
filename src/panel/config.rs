use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::animation::ease::Ease;
use crate::foundation::core::{Edge, ElementId};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::constraint::{Axis, LayoutConstraint, Movable};

/// Panel configuration as authored in JSON.
///
/// Every field is optional. Spacing tokens have no defaults: a constraint naming a token that
/// is not configured fails validation rather than reconciling toward a made-up gap.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Scroll distance the sequence spans.
    pub duration: f64,
    /// Hold the panel on screen while the sequence plays.
    pub pin: bool,
    /// Scroll offset of the panel top.
    pub start: f64,
    /// Named spacing values (`dot-gap`, `intro-gap`, `footer-gap`, ...).
    pub spacing: BTreeMap<String, f64>,
    /// Id of the animated container (the SVG block).
    pub container: String,
    /// Stroke paths to reveal, in segment order.
    pub paths: Vec<String>,
    /// Keyframes in authoring order.
    pub steps: Vec<StepDef>,
    /// Gaps the layout reconciler maintains.
    pub constraints: Vec<ConstraintDef>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            duration: 2600.0,
            pin: true,
            start: 0.0,
            spacing: BTreeMap::new(),
            container: "naming-animation".to_owned(),
            paths: Vec::new(),
            steps: Vec::new(),
            constraints: Vec::new(),
        }
    }
}

/// One authored keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDef {
    /// Fade and raise one or more text cues.
    Fade {
        /// Cue element ids.
        #[serde(deserialize_with = "one_or_many")]
        target: Vec<String>,
        /// Local start time.
        at: f64,
        /// Local duration.
        #[serde(default = "default_step_duration")]
        duration: f64,
        /// Curve.
        #[serde(default)]
        ease: Ease,
        /// Starting vertical offset.
        #[serde(default = "default_cue_offset")]
        offset: f64,
    },
    /// Draw a path, by index into [`PanelConfig::paths`].
    Draw {
        /// Segment index.
        path: usize,
        /// Local start time.
        at: f64,
        /// Local duration.
        #[serde(default = "default_step_duration")]
        duration: f64,
    },
}

/// Authored gap constraint; `gap` names a spacing token.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintDef {
    /// Reference element id.
    pub anchor: String,
    /// Reference edge.
    #[serde(default = "default_anchor_edge")]
    pub anchor_edge: Edge,
    /// Positioned element id.
    pub subject: String,
    /// Positioned edge.
    #[serde(default = "default_subject_edge")]
    pub subject_edge: Edge,
    /// Spacing token holding the target gap.
    pub gap: String,
    /// Side that moves.
    #[serde(default)]
    pub movable: Movable,
}

fn default_step_duration() -> f64 {
    1.0
}

fn default_cue_offset() -> f64 {
    20.0
}

fn default_anchor_edge() -> Edge {
    Edge::Bottom
}

fn default_subject_edge() -> Edge {
    Edge::Top
}

fn one_or_many<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match <OneOrMany as serde::Deserialize>::deserialize(de)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

impl PanelConfig {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse panel config JSON: {e}")))
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| ReelError::serde(format!("parse panel config JSON: {e}")))
    }

    /// Parse from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open panel config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check values and cross references.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ReelError::validation("duration must be finite and > 0"));
        }
        if !self.start.is_finite() {
            return Err(ReelError::validation("start must be finite"));
        }
        if self.container.trim().is_empty() {
            return Err(ReelError::validation("container id must be non-empty"));
        }
        for (token, value) in &self.spacing {
            if !value.is_finite() {
                return Err(ReelError::validation(format!(
                    "spacing token '{token}' must be finite"
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for p in &self.paths {
            if !seen.insert(p.as_str()) {
                return Err(ReelError::validation(format!("path '{p}' listed twice")));
            }
        }

        for (i, step) in self.steps.iter().enumerate() {
            match step {
                StepDef::Fade {
                    target,
                    at,
                    duration,
                    offset,
                    ..
                } => {
                    check_window(i, *at, *duration)?;
                    if target.is_empty() {
                        return Err(ReelError::validation(format!("step {i} fades nothing")));
                    }
                    if !offset.is_finite() {
                        return Err(ReelError::validation(format!(
                            "step {i} offset must be finite"
                        )));
                    }
                }
                StepDef::Draw { path, at, duration } => {
                    check_window(i, *at, *duration)?;
                    if *duration <= 0.0 {
                        return Err(ReelError::validation(format!(
                            "step {i} draw duration must be > 0"
                        )));
                    }
                    if *path >= self.paths.len() {
                        return Err(ReelError::validation(format!(
                            "step {i} draws path {path} but only {} are listed",
                            self.paths.len()
                        )));
                    }
                }
            }
        }

        self.layout_constraints().map(|_| ())
    }

    /// Constraints with their spacing tokens resolved.
    pub fn layout_constraints(&self) -> ReelResult<Vec<LayoutConstraint>> {
        self.constraints
            .iter()
            .map(|c| {
                let target_gap = *self.spacing.get(&c.gap).ok_or_else(|| {
                    ReelError::validation(format!(
                        "spacing token '{}' is required by constraint '{}' -> '{}' but not configured",
                        c.gap, c.anchor, c.subject
                    ))
                })?;
                Ok(LayoutConstraint {
                    anchor: ElementId::new(&c.anchor),
                    anchor_edge: c.anchor_edge,
                    subject: ElementId::new(&c.subject),
                    subject_edge: c.subject_edge,
                    target_gap,
                    axis: Axis::Vertical,
                    movable: c.movable,
                    token: Some(c.gap.clone()),
                })
            })
            .collect()
    }

    /// Path ids as element references.
    pub fn path_ids(&self) -> Vec<ElementId> {
        self.paths.iter().map(ElementId::new).collect()
    }

    /// Every cue element referenced by a fade step, first use first.
    pub fn cue_ids(&self) -> Vec<ElementId> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for step in &self.steps {
            if let StepDef::Fade { target, .. } = step {
                for t in target {
                    if seen.insert(t.as_str()) {
                        out.push(ElementId::new(t));
                    }
                }
            }
        }
        out
    }
}

fn check_window(step: usize, at: f64, duration: f64) -> ReelResult<()> {
    if !(at.is_finite() && duration.is_finite()) || at < 0.0 || duration < 0.0 {
        return Err(ReelError::validation(format!(
            "step {step} needs finite at >= 0 and duration >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/panel/config.rs"]
mod tests;
