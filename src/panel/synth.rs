use crate::foundation::core::{Rect, Viewport};
use crate::foundation::error::ReelResult;
use crate::panel::config::PanelConfig;
use crate::surface::scene::{ABOVE_BLOCK, Reflow, SceneSurface};

const BLOCK_HEIGHT: f64 = 80.0;
const CONTAINER_HEIGHT: f64 = 400.0;
const CUE_ROW: f64 = 40.0;
const PATH_LENGTH: f64 = 100.0;

/// Stand-in document for a configuration when no SVG is at hand.
///
/// A block as tall as `start` stands for the page above the panel. Elements named by
/// constraints become stacked flow blocks after it in order of first mention (the container
/// first when no constraint names it). Cues are rows inside the container and
/// every path is a straight dotted stroke of length 100 below them.
pub fn synthesize_scene(config: &PanelConfig, viewport: Viewport) -> ReelResult<SceneSurface> {
    let mut blocks: Vec<&str> = Vec::new();
    for c in &config.constraints {
        for id in [c.anchor.as_str(), c.subject.as_str()] {
            if id != ABOVE_BLOCK && !blocks.contains(&id) {
                blocks.push(id);
            }
        }
    }
    if !blocks.contains(&config.container.as_str()) {
        blocks.insert(0, config.container.as_str());
    }

    let mut scene = SceneSurface::new(viewport)
        .scale_paths_with_viewport(true)
        .block(ABOVE_BLOCK, 0.0, config.start.max(0.0))?;
    for id in blocks {
        scene = if id == config.container {
            scene.flow(id, 0.0, CONTAINER_HEIGHT, Reflow::Scale)?
        } else {
            scene.block(id, 0.0, BLOCK_HEIGHT)?
        };
    }

    let cues = config.cue_ids();
    for (row, cue) in cues.iter().enumerate() {
        let y = CUE_ROW * row as f64;
        let rect = Rect::new(0.0, y, 300.0, y + CUE_ROW * 0.8);
        scene = scene.element(cue.as_str(), Some(config.container.as_str()), rect)?;
    }
    let base = CUE_ROW * cues.len() as f64;
    for (i, path) in config.paths.iter().enumerate() {
        let y = base + 20.0 * (i as f64 + 1.0);
        let d = format!("M0,{y} L{PATH_LENGTH},{y}");
        scene = scene.stroke_svg(path, Some(config.container.as_str()), &d, vec![2.0, 6.0])?;
    }
    Ok(scene)
}

#[cfg(test)]
#[path = "../../tests/unit/panel/synth.rs"]
mod tests;
