use super::*;
use crate::foundation::core::Viewport;
use crate::reveal::strategy::{MaskFallback, NativeDraw};
use crate::surface::LayoutSurface;
use crate::surface::scene::SceneSurface;

fn scene() -> SceneSurface {
    SceneSurface::new(Viewport::new(1000.0, 800.0).unwrap())
        .scale_paths_with_viewport(true)
        .block("svg", 0.0, 400.0)
        .unwrap()
        .stroke_svg("a", Some("svg"), "M0,0 L100,0", vec![2.0, 4.0])
        .unwrap()
        .stroke_svg("b", Some("svg"), "M0,50 L0,250", vec![2.0, 4.0])
        .unwrap()
}

fn ids(names: &[&str]) -> Vec<ElementId> {
    names.iter().map(|n| ElementId::new(*n)).collect()
}

fn mask_preparer() -> PathRevealPreparer {
    PathRevealPreparer::new(PanelId::new("p"), Arc::new(MaskFallback))
}

#[test]
fn prepare_all_keeps_path_order() {
    let mut s = scene();
    let segs = mask_preparer()
        .prepare_all(&mut s, &ids(&["a", "b"]))
        .unwrap();
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].path().as_str(), "a");
    assert!((segs[1].length() - 200.0).abs() < 1e-6);
    assert_ne!(segs[0].mask_id(), segs[1].mask_id());
    assert_eq!(s.mask_count(), 2);
}

#[test]
fn prepare_all_fails_on_missing_path() {
    let mut s = scene();
    assert!(
        mask_preparer()
            .prepare_all(&mut s, &ids(&["a", "zzz"]))
            .is_err()
    );
}

#[test]
fn refresh_of_unchanged_path_returns_same_identity() {
    let mut s = scene();
    let prep = mask_preparer();
    let mut segs = prep.prepare_all(&mut s, &ids(&["a", "b"])).unwrap();
    let before: Vec<_> = segs.iter().map(|s| s.mask_id()).collect();
    let snapshot = segs.clone();

    assert_eq!(prep.refresh_all(&mut s, &mut segs), 0);
    let after: Vec<_> = segs.iter().map(|s| s.mask_id()).collect();
    assert_eq!(before, after);
    assert_eq!(segs, snapshot);
    assert_eq!(s.mask_count(), 2);
}

#[test]
fn refresh_remeasures_after_resize() {
    let mut s = scene();
    let prep = mask_preparer();
    let mut segs = prep.prepare_all(&mut s, &ids(&["a"])).unwrap();
    prep.reveal(&mut s, &mut segs[0], 0.5).unwrap();

    s.reflow(Viewport::new(500.0, 800.0).unwrap());
    prep.refresh_all(&mut s, &mut segs);

    assert!((segs[0].length() - 50.0).abs() < 1e-6);
    assert_eq!(segs[0].reveal_fraction(), 0.5);
    let mask = s.mask(segs[0].mask_id()).unwrap();
    assert!((mask.dash_array[0] - 50.0).abs() < 1e-6);
    assert!((mask.dash_offset - 25.0).abs() < 1e-6);
}

#[test]
fn refresh_keeps_stale_segment_when_path_disappears() {
    let mut s = scene();
    let prep = mask_preparer();
    let mut segs = prep.prepare_all(&mut s, &ids(&["a", "b"])).unwrap();
    let stale = segs[1].clone();

    s.remove("b");
    assert_eq!(prep.refresh_all(&mut s, &mut segs), 1);
    assert_eq!(segs[1], stale);
}

#[test]
fn native_preparer_reveals_through_draw_range() {
    let mut s = scene().with_native_draw(true);
    let prep = PathRevealPreparer::new(PanelId::new("p"), Arc::new(NativeDraw));
    assert_eq!(prep.strategy(), StrategyKind::NativeDraw);
    let mut segs = prep.prepare_all(&mut s, &ids(&["a"])).unwrap();
    prep.reveal(&mut s, &mut segs[0], 1.0).unwrap();
    assert_eq!(s.draw_range("a"), Some((0.0, 1.0)));
}
