use super::*;

fn scene() -> SceneSurface {
    SceneSurface::new(Viewport::new(1000.0, 800.0).unwrap())
        .block("headline", 0.0, 100.0)
        .unwrap()
        .flow("svg", 20.0, 400.0, Reflow::Scale)
        .unwrap()
        .flow("footer", 40.0, 0.0, Reflow::Wrap { area: 50_000.0 })
        .unwrap()
        .stroke_svg("path-0", Some("svg"), "M0,10 L300,10", vec![2.0, 6.0])
        .unwrap()
        .element("logo", Some("svg"), Rect::new(0.0, 300.0, 200.0, 360.0))
        .unwrap()
}

#[test]
fn flow_blocks_stack_with_margins() {
    let s = scene();
    assert_eq!(
        s.box_of(&"headline".into()),
        Some(Rect::new(0.0, 0.0, 1000.0, 100.0))
    );
    assert_eq!(
        s.box_of(&"svg".into()),
        Some(Rect::new(0.0, 120.0, 1000.0, 520.0))
    );
    assert_eq!(
        s.box_of(&"footer".into()),
        Some(Rect::new(0.0, 560.0, 1000.0, 610.0))
    );
}

#[test]
fn shifting_a_flow_block_moves_later_blocks_and_children() {
    let mut s = scene();
    s.shift_y(&"svg".into(), 15.0).unwrap();
    assert_eq!(s.box_of(&"svg".into()).unwrap().y0, 135.0);
    assert_eq!(s.box_of(&"footer".into()).unwrap().y0, 575.0);
    assert_eq!(s.box_of(&"logo".into()).unwrap().y0, 435.0);
    assert_eq!(s.box_of(&"headline".into()).unwrap().y0, 0.0);
    assert!(s.shift_y(&"missing".into(), 1.0).is_err());
}

#[test]
fn path_length_follows_geometry_and_scale() {
    let mut s = scene().scale_paths_with_viewport(true);
    let len = s.path_length(&"path-0".into()).unwrap();
    assert!((len - 300.0).abs() < 1e-6);

    s.reflow(Viewport::new(500.0, 800.0).unwrap());
    let len = s.path_length(&"path-0".into()).unwrap();
    assert!((len - 150.0).abs() < 1e-6);
    // Text-like block gets taller when narrower.
    let footer = s.box_of(&"footer".into()).unwrap();
    assert!((footer.height() - 100.0).abs() < 1e-9);
}

#[test]
fn broken_length_query_reports_geometry_error() {
    let mut s = scene();
    s.break_length_query("path-0");
    let err = s.path_length(&"path-0".into()).unwrap_err();
    assert!(err.to_string().contains("geometry error"));
    assert!(s.path_geometry(&"path-0".into()).is_some());
}

#[test]
fn masks_attach_to_their_target_and_track_offset() {
    let mut s = scene();
    let id = MaskId(7);
    let geometry = s.path_geometry(&"path-0".into()).unwrap();
    let mask = MaskPrimitive {
        id,
        target: "path-0".into(),
        reveal_path: geometry,
        dash_array: [300.0, 300.0],
        dash_offset: 300.0,
    };
    s.install_mask(&mask).unwrap();
    assert_eq!(s.attached_mask("path-0"), Some(id));
    assert!(s.visible_dashes("path-0").is_empty());

    s.set_mask_dash_offset(id, 150.0).unwrap();
    let spans = s.visible_dashes("path-0");
    assert_eq!(spans.first(), Some(&(0.0, 2.0)));
    assert!(spans.last().unwrap().1 <= 150.0 + 1e-6);
    assert_eq!(s.dash_array("path-0"), Some(&[2.0, 6.0][..]));

    s.remove("path-0");
    assert_eq!(s.mask_count(), 0);
}

#[test]
fn rejects_duplicates_and_unknown_parents() {
    assert!(scene().block("svg", 0.0, 1.0).is_err());
    assert!(
        SceneSurface::new(Viewport::default())
            .element("x", Some("nope"), Rect::ZERO)
            .is_err()
    );
}

#[test]
fn authored_dash_offset_moves_visible_dashes() {
    let s = scene().with_dash_offset("path-0", 1.0).unwrap();
    assert_eq!(s.dash_offset("path-0"), Some(1.0));
    let spans = s.visible_dashes("path-0");
    assert_eq!(&spans[..2], &[(0.0, 1.0), (7.0, 9.0)]);

    assert!(scene().with_dash_offset("logo", 1.0).is_err());
    assert!(scene().with_dash_offset("path-0", f64::NAN).is_err());
}
