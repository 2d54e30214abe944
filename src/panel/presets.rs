use crate::animation::ease::Ease;
use crate::panel::config::{PanelConfig, StepDef};

const CUES: [(&str, f64); 5] = [
    ("introducing", 0.0),
    ("our", 0.6),
    ("new", 1.2),
    ("name", 1.8),
    ("logo-wrap", 2.3),
];
const DRAWS: [f64; 4] = [0.2, 0.8, 1.4, 2.0];

impl PanelConfig {
    /// The "introducing our new name" sequence: five cue fades interleaved with four
    /// connector draws, one local-time unit each.
    ///
    /// Paths are `path-0` to `path-3` inside `naming-animation`. No constraints are set;
    /// add spacing tokens and constraints for the host page.
    pub fn naming_sequence() -> Self {
        let mut steps = Vec::with_capacity(CUES.len() + DRAWS.len());
        for (i, (cue, at)) in CUES.iter().enumerate() {
            steps.push(StepDef::Fade {
                target: vec![(*cue).to_owned()],
                at: *at,
                duration: 1.0,
                ease: Ease::OutQuad,
                offset: 20.0,
            });
            if let Some(&draw_at) = DRAWS.get(i) {
                steps.push(StepDef::Draw {
                    path: i,
                    at: draw_at,
                    duration: 1.0,
                });
            }
        }
        Self {
            paths: (0..DRAWS.len()).map(|i| format!("path-{i}")).collect(),
            steps,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/panel/presets.rs"]
mod tests;
