use std::sync::Arc;

use anyhow::Context as _;
use kurbo::Affine;

use crate::foundation::core::{BezPath, Rect, Viewport};
use crate::foundation::error::ReelResult;
use crate::surface::scene::{ABOVE_BLOCK, Reflow, SceneSurface};

impl SceneSurface {
    /// Build a scene from an SVG document.
    ///
    /// The document becomes one scaling flow block named `container`, preceded by a block of
    /// height `top` (the content above the panel). Inside it every `<path>` with an `id` is a
    /// stroke path carrying its authored `stroke-dasharray`, and every other element with an
    /// `id` is a box at its absolute bounding box.
    pub fn from_svg_str(
        svg: &str,
        container: &str,
        top: f64,
        viewport: Viewport,
    ) -> ReelResult<Self> {
        let opts = usvg::Options {
            fontdb: build_fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse svg document")?;

        let mut items = Vec::new();
        collect(tree.root(), &mut items);

        let size = tree.size();
        let scale = viewport.width / f64::from(size.width());
        let mut scene = SceneSurface::new(viewport)
            .scale_paths_with_viewport(true)
            .block(ABOVE_BLOCK, 0.0, top.max(0.0))?
            .flow(
                container,
                0.0,
                f64::from(size.height()) * scale,
                Reflow::Scale,
            )?;

        let fit = Affine::scale(scale);
        for item in items {
            scene = match item {
                SvgItem::Stroke {
                    id,
                    path,
                    dashes,
                    dash_offset,
                } => scene
                    .stroke(&id, Some(container), fit * path, dashes)?
                    .with_dash_offset(&id, dash_offset)?,
                SvgItem::Box { id, rect } => {
                    let r = fit.transform_rect_bbox(rect);
                    scene.element(&id, Some(container), r)?
                }
            };
        }
        tracing::debug!(container, "loaded svg scene");
        Ok(scene)
    }
}

enum SvgItem {
    Stroke {
        id: String,
        path: BezPath,
        dashes: Vec<f64>,
        dash_offset: f64,
    },
    Box {
        id: String,
        rect: Rect,
    },
}

fn collect(group: &usvg::Group, out: &mut Vec<SvgItem>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => {
                if !g.id().is_empty() {
                    out.push(SvgItem::Box {
                        id: g.id().to_owned(),
                        rect: to_rect(g.abs_bounding_box()),
                    });
                }
                collect(g, out);
            }
            usvg::Node::Path(p) => {
                if p.id().is_empty() {
                    continue;
                }
                let stroke = p.stroke();
                let dashes = stroke
                    .and_then(|s| s.dasharray())
                    .map(|d| d.iter().map(|v| f64::from(*v)).collect())
                    .unwrap_or_default();
                out.push(SvgItem::Stroke {
                    id: p.id().to_owned(),
                    path: to_bez(p),
                    dashes,
                    dash_offset: stroke.map_or(0.0, |s| f64::from(s.dashoffset())),
                });
            }
            usvg::Node::Text(t) => {
                if !t.id().is_empty() {
                    out.push(SvgItem::Box {
                        id: t.id().to_owned(),
                        rect: to_rect(t.abs_bounding_box()),
                    });
                }
            }
            usvg::Node::Image(_) => {}
        }
    }
}

fn to_rect(r: usvg::Rect) -> Rect {
    Rect::new(
        f64::from(r.left()),
        f64::from(r.top()),
        f64::from(r.right()),
        f64::from(r.bottom()),
    )
}

fn to_bez(path: &usvg::Path) -> BezPath {
    use usvg::tiny_skia_path::PathSegment;

    let pt = |p: usvg::tiny_skia_path::Point| (f64::from(p.x), f64::from(p.y));
    let mut out = BezPath::new();
    for seg in path.data().segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p) => out.quad_to(pt(p1), pt(p)),
            PathSegment::CubicTo(p1, p2, p) => out.curve_to(pt(p1), pt(p2), pt(p)),
            PathSegment::Close => out.close_path(),
        }
    }
    let t = path.abs_transform();
    let xf = Affine::new([t.sx, t.ky, t.kx, t.sy, t.tx, t.ty].map(f64::from));
    xf * out
}

fn build_fontdb() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
}

#[cfg(test)]
#[path = "../../tests/unit/surface/svg.rs"]
mod tests;
