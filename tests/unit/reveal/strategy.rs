use super::*;
use crate::foundation::core::Viewport;
use crate::surface::StaticCapabilities;
use crate::surface::scene::SceneSurface;

fn scene() -> SceneSurface {
    SceneSurface::new(Viewport::default())
        .block("svg", 0.0, 400.0)
        .unwrap()
        .stroke_svg("path-0", Some("svg"), "M0,0 L200,0", vec![1.0, 7.0])
        .unwrap()
}

fn ids() -> (PanelId, ElementId) {
    (PanelId::new("panel"), ElementId::new("path-0"))
}

#[test]
fn probe_picks_strategy_once() {
    let native = select_strategy(&StaticCapabilities { native_draw: true });
    let fallback = select_strategy(&StaticCapabilities { native_draw: false });
    assert_eq!(native.kind(), StrategyKind::NativeDraw);
    assert_eq!(fallback.kind(), StrategyKind::MaskFallback);
}

#[test]
fn mask_fallback_starts_fully_hidden() {
    let mut s = scene();
    let (panel, path) = ids();
    let seg = MaskFallback.prepare(&mut s, &panel, &path, None).unwrap();

    assert!(seg.is_measured());
    assert!((seg.length() - 200.0).abs() < 1e-6);
    let mask = seg.mask().unwrap();
    assert_eq!(mask.dash_array, [seg.length(), seg.length()]);
    assert_eq!(mask.dash_offset, seg.length());
    assert_eq!(s.attached_mask("path-0"), Some(seg.mask_id()));
    // Dotted pattern is left alone.
    assert_eq!(s.dash_array("path-0"), Some(&[1.0, 7.0][..]));
    assert!(s.visible_dashes("path-0").is_empty());
}

#[test]
fn mask_fallback_apply_moves_offset_toward_zero() {
    let mut s = scene();
    let (panel, path) = ids();
    let mut seg = MaskFallback.prepare(&mut s, &panel, &path, None).unwrap();

    MaskFallback.apply(&mut s, &mut seg, 0.5).unwrap();
    let half = seg.length() * 0.5;
    assert!((s.mask(seg.mask_id()).unwrap().dash_offset - half).abs() < 1e-9);
    assert_eq!(seg.reveal_fraction(), 0.5);

    MaskFallback.apply(&mut s, &mut seg, 1.5).unwrap();
    assert_eq!(s.mask(seg.mask_id()).unwrap().dash_offset, 0.0);
    assert_eq!(seg.reveal_fraction(), 1.0);
}

#[test]
fn failed_length_query_substitutes_default() {
    let mut s = scene();
    s.break_length_query("path-0");
    let (panel, path) = ids();
    let seg = MaskFallback.prepare(&mut s, &panel, &path, None).unwrap();
    assert!(!seg.is_measured());
    assert_eq!(seg.length(), DEFAULT_PATH_LENGTH);
    assert_eq!(seg.mask().unwrap().dash_offset, DEFAULT_PATH_LENGTH);
}

#[test]
fn missing_path_is_a_geometry_error() {
    let mut s = scene();
    let panel = PanelId::new("panel");
    let missing = ElementId::new("nope");
    assert!(matches!(
        MaskFallback.prepare(&mut s, &panel, &missing, None),
        Err(ReelError::Geometry(_))
    ));
    assert!(matches!(
        NativeDraw.prepare(&mut s, &panel, &missing, None),
        Err(ReelError::Geometry(_))
    ));
}

#[test]
fn native_draw_sets_draw_range_without_mask() {
    let mut s = scene().with_native_draw(true);
    let (panel, path) = ids();
    let mut seg = NativeDraw.prepare(&mut s, &panel, &path, None).unwrap();
    assert!(seg.mask().is_none());
    assert_eq!(s.mask_count(), 0);
    assert_eq!(s.draw_range("path-0"), Some((0.0, 0.0)));

    NativeDraw.apply(&mut s, &mut seg, 0.25).unwrap();
    assert_eq!(s.draw_range("path-0"), Some((0.0, 0.25)));
    assert_eq!(seg.reveal_fraction(), 0.25);
}

#[test]
fn re_preparing_keeps_identity_and_fraction() {
    let mut s = scene();
    let (panel, path) = ids();
    let mut first = MaskFallback.prepare(&mut s, &panel, &path, None).unwrap();
    MaskFallback.apply(&mut s, &mut first, 0.75).unwrap();

    let again = MaskFallback
        .prepare(&mut s, &panel, &path, Some(&first))
        .unwrap();
    assert_eq!(again.mask_id(), first.mask_id());
    assert_eq!(again.reveal_fraction(), 0.75);
    assert_eq!(s.mask_count(), 1);
    let offset = s.mask(again.mask_id()).unwrap().dash_offset;
    assert!((offset - again.length() * 0.25).abs() < 1e-9);
}
