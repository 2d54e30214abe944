use super::*;
use crate::foundation::core::ElementId;
use crate::surface::{DrawSurface, LayoutSurface};

const DOC: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="200" viewBox="0 0 400 200">
  <path id="path-0" d="M0,50 L200,50" stroke="#111" stroke-width="2" stroke-dasharray="2 6" fill="none"/>
  <path id="path-1" d="M0,150 L100,150" stroke="#111" stroke-width="2" fill="none"/>
</svg>"##;

#[test]
fn svg_paths_become_stroke_paths_with_dashes() {
    let vp = Viewport::new(800.0, 600.0).unwrap();
    let scene = SceneSurface::from_svg_str(DOC, "naming-animation", 50.0, vp).unwrap();

    let container = scene.box_of(&ElementId::new("naming-animation")).unwrap();
    assert_eq!(container.y0, 50.0);
    assert!((container.height() - 400.0).abs() < 1e-9);

    // Document is fit to the viewport width (x2).
    let len = scene.path_length(&ElementId::new("path-0")).unwrap();
    assert!((len - 400.0).abs() < 1e-3);
    assert_eq!(scene.dash_array("path-0"), Some(&[2.0, 6.0][..]));
    assert_eq!(scene.dash_array("path-1"), Some(&[][..]));

    let geometry = scene.path_geometry(&ElementId::new("path-1")).unwrap();
    let bbox = kurbo::Shape::bounding_box(&geometry);
    assert!((bbox.y0 - 350.0).abs() < 1e-3);
}

#[test]
fn malformed_svg_is_an_error() {
    let err = SceneSurface::from_svg_str("<svg", "c", 0.0, Viewport::default()).unwrap_err();
    assert!(err.to_string().contains("parse svg document"));
}

#[test]
fn svg_dash_offset_is_kept() {
    let doc = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <path id="dotted" d="M0,10 L100,10" stroke="#111" stroke-dasharray="2 6" stroke-dashoffset="3" fill="none"/>
</svg>"##;
    let vp = Viewport::new(100.0, 100.0).unwrap();
    let scene = SceneSurface::from_svg_str(doc, "naming-animation", 0.0, vp).unwrap();
    assert_eq!(scene.dash_offset("dotted"), Some(3.0));
    assert_eq!(scene.visible_dashes("dotted").first(), Some(&(5.0, 7.0)));
    assert_eq!(scene.dash_offset("path-x"), None);
}
