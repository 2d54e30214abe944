use super::*;

const ALL: [Ease; 7] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn every_curve_pins_endpoints() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
        assert_eq!(ease.apply(-1.0), 0.0, "{ease:?}");
        assert!((ease.apply(2.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn every_curve_is_monotonic() {
    for ease in ALL {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!(v + 1e-12 >= prev, "{ease:?} at {i}");
            prev = v;
        }
    }
}

#[test]
fn out_quad_leads_linear() {
    assert!(Ease::OutQuad.apply(0.25) > Ease::Linear.apply(0.25));
    assert_eq!(Ease::default(), Ease::OutQuad);
}

#[test]
fn accepts_timeline_style_aliases() {
    let e: Ease = serde_json::from_str("\"power1.out\"").unwrap();
    assert_eq!(e, Ease::OutQuad);
    let e: Ease = serde_json::from_str("\"linear\"").unwrap();
    assert_eq!(e, Ease::Linear);
}
