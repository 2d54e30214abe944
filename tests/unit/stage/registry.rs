use super::*;
use crate::foundation::core::Rect;
use crate::layout::reconciler::ReconcileState;
use crate::surface::scene::{Reflow, SceneSurface};
use crate::surface::{LayoutSurface, StaticCapabilities};

fn scene() -> SceneSurface {
    SceneSurface::new(Viewport::default())
        .scale_paths_with_viewport(true)
        .block("headline", 0.0, 100.0)
        .unwrap()
        .flow("naming-animation", 0.0, 300.0, Reflow::Scale)
        .unwrap()
        .element("intro", Some("naming-animation"), Rect::new(0.0, 0.0, 10.0, 10.0))
        .unwrap()
        .stroke_svg("p0", Some("naming-animation"), "M0,50 L400,50", vec![2.0, 2.0])
        .unwrap()
}

fn config() -> PanelConfig {
    PanelConfig::from_json_str(
        r#"{
            "paths": ["p0"],
            "spacing": {"intro-gap": 30},
            "steps": [
                {"kind": "fade", "target": "intro", "at": 0.0, "duration": 0.5},
                {"kind": "draw", "path": 0, "at": 0.5, "duration": 1.5}
            ],
            "constraints": [
                {"anchor": "headline", "subject": "naming-animation", "gap": "intro-gap"}
            ]
        }"#,
    )
    .unwrap()
}

fn stage() -> Stage<SceneSurface> {
    Stage::new(&StaticCapabilities::default(), Viewport::default())
}

#[test]
fn strategy_comes_from_probe() {
    assert_eq!(stage().strategy(), StrategyKind::MaskFallback);
    let native: Stage<SceneSurface> =
        Stage::new(&StaticCapabilities { native_draw: true }, Viewport::default());
    assert_eq!(native.strategy(), StrategyKind::NativeDraw);
}

#[test]
fn mount_registers_three_listeners_and_unmount_releases_them() {
    let mut st = stage();
    let id = st.mount("impact", config(), scene()).unwrap();
    assert_eq!(st.listener_count(), 3);
    assert_eq!(st.panel_ids(), vec![id.clone()]);

    let surface = st.unmount(&id).unwrap();
    assert_eq!(surface.mask_count(), 1);
    assert_eq!(st.listener_count(), 0);
    assert!(st.is_empty());
    assert!(st.unmount(&id).is_none());
}

#[test]
fn remounting_same_id_replaces_without_leaks() {
    let mut st = stage();
    for _ in 0..5 {
        st.mount("impact", config(), scene()).unwrap();
    }
    assert_eq!(st.len(), 1);
    assert_eq!(st.listener_count(), 3);
}

#[test]
fn bad_panel_is_skipped() {
    let mut st = stage();
    let mut cfg = config();
    cfg.spacing.clear();
    assert!(st.mount("broken", cfg, scene()).is_none());
    assert!(st.mount("ok", config(), scene()).is_some());
    assert_eq!(st.len(), 1);
    assert_eq!(st.listener_count(), 3);
}

#[test]
fn scroll_applies_on_tick_and_reconcile_runs_next_frame() {
    let mut st = stage();
    let id = st.mount("impact", config(), scene()).unwrap();

    // Mount scheduled a cycle in frame 0; it runs in frame 1.
    let r1 = st.tick();
    assert_eq!(r1.reconcile_steps, 1);
    let r2 = st.tick();
    assert_eq!(r2.reconcile_finished, 1);
    assert_eq!(
        st.panel(&id).unwrap().reconciler().state(),
        ReconcileState::Converged
    );

    st.scroll_to(1300.0);
    let r3 = st.tick();
    assert_eq!(r3.evaluated, 1);
    assert_eq!(r3.reconcile_steps, 0);
    let p = st.panel(&id).unwrap();
    assert!((p.local_time() - 1.0).abs() < 1e-9);
    assert_eq!(p.reconciler().state(), ReconcileState::Scheduled);

    let r4 = st.tick();
    assert_eq!(r4.evaluated, 0);
    assert_eq!(r4.reconcile_steps, 1);
    assert_eq!(r4.reconcile_finished, 1);
}

#[test]
fn resize_refreshes_every_panel_and_keeps_identity() {
    let mut st = stage();
    let id = st.mount("impact", config(), scene()).unwrap();
    st.run_until_idle(10);
    let mask = st.panel(&id).unwrap().segments()[0].mask_id();

    st.resize(Viewport::new(720.0, 900.0).unwrap());
    let r = st.tick();
    assert_eq!(r.refreshed, 1);
    let p = st.panel(&id).unwrap();
    assert_eq!(p.segments()[0].mask_id(), mask);
    assert!((p.segments()[0].length() - 200.0).abs() < 1e-6);
    assert!(st.has_pending_work());

    st.run_until_idle(10);
    assert!(!st.has_pending_work());
    let p = st.panel(&id).unwrap();
    let gap = p.reconciler().constraints()[0].gap(p.surface()).unwrap();
    assert!((gap - 30.0).abs() < 0.5);
}

#[test]
fn invalidate_targets_one_panel() {
    let mut st = stage();
    let a = st.mount("a", config(), scene()).unwrap();
    let b = st.mount("b", config(), scene()).unwrap();
    st.run_until_idle(10);

    st.invalidate(Some(&a));
    assert!(st.panel(&a).unwrap().refresh().is_pending());
    assert!(!st.panel(&b).unwrap().refresh().is_pending());
    assert_eq!(st.tick().refreshed, 1);

    st.invalidate(None);
    assert_eq!(st.tick().refreshed, 2);
}

#[test]
fn host_layout_drift_is_corrected_after_invalidate() {
    let mut st = stage();
    let id = st.mount("impact", config(), scene()).unwrap();
    st.run_until_idle(10);

    st.panel_mut(&id)
        .unwrap()
        .surface_mut()
        .shift_y(&"naming-animation".into(), 17.0)
        .unwrap();
    st.invalidate(Some(&id));
    st.run_until_idle(10);

    let p = st.panel(&id).unwrap();
    let gap = p.reconciler().constraints()[0].gap(p.surface()).unwrap();
    assert!((gap - 30.0).abs() < 0.5);
}

#[test]
fn non_finite_scroll_is_ignored() {
    let mut st = stage();
    st.scroll_to(f64::NAN);
    assert!(!st.has_pending_work());
}
