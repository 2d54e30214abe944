use super::*;

#[test]
fn empty_object_uses_defaults() {
    let cfg = PanelConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, PanelConfig::default());
    assert_eq!(cfg.duration, 2600.0);
    assert!(cfg.pin);
    assert_eq!(cfg.container, "naming-animation");
    cfg.validate().unwrap();
}

#[test]
fn steps_parse_with_defaults_and_aliases() {
    let cfg = PanelConfig::from_json_str(
        r#"{
            "duration": 1800,
            "pin": false,
            "paths": ["p0"],
            "steps": [
                {"kind": "fade", "target": "intro", "at": 0},
                {"kind": "fade", "target": ["a", "b"], "at": 0.5, "ease": "power1.out", "offset": 12},
                {"kind": "draw", "path": 0, "at": 0.2}
            ]
        }"#,
    )
    .unwrap();
    cfg.validate().unwrap();
    assert!(!cfg.pin);
    assert_eq!(
        cfg.steps[0],
        StepDef::Fade {
            target: vec!["intro".to_owned()],
            at: 0.0,
            duration: 1.0,
            ease: Ease::OutQuad,
            offset: 20.0,
        }
    );
    assert!(matches!(
        cfg.steps[2],
        StepDef::Draw { path: 0, duration, .. } if duration == 1.0
    ));
    let cues: Vec<_> = cfg.cue_ids().into_iter().map(|c| c.0).collect();
    assert_eq!(cues, ["intro", "a", "b"]);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PanelConfig::from_json_str(r#"{"durration": 10}"#).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn missing_spacing_token_is_a_validation_error() {
    let cfg = PanelConfig::from_json_str(
        r#"{"constraints": [{"anchor": "headline", "subject": "naming-animation", "gap": "intro-gap"}]}"#,
    )
    .unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("intro-gap"));
}

#[test]
fn constraints_resolve_tokens_and_edges() {
    let cfg = PanelConfig::from_json_str(
        r#"{
            "spacing": {"intro-gap": 32, "footer-gap": 48},
            "constraints": [
                {"anchor": "headline", "subject": "naming-animation", "gap": "intro-gap"},
                {"anchor": "naming-animation", "subject": "footer", "gap": "footer-gap",
                 "anchor_edge": "bottom", "subject_edge": "top", "movable": "anchor"}
            ]
        }"#,
    )
    .unwrap();
    let cs = cfg.layout_constraints().unwrap();
    assert_eq!(cs.len(), 2);
    assert_eq!(cs[0].target_gap, 32.0);
    assert_eq!(cs[0].anchor_edge, Edge::Bottom);
    assert_eq!(cs[0].subject_edge, Edge::Top);
    assert_eq!(cs[1].movable, Movable::Anchor);
    assert_eq!(cs[1].token.as_deref(), Some("footer-gap"));
}

#[test]
fn validate_rejects_bad_values() {
    let mut cfg = PanelConfig::naming_sequence();
    cfg.duration = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = PanelConfig::naming_sequence();
    cfg.steps.push(StepDef::Draw {
        path: 9,
        at: 0.0,
        duration: 1.0,
    });
    assert!(cfg.validate().is_err());

    let mut cfg = PanelConfig::naming_sequence();
    cfg.steps.push(StepDef::Draw {
        path: 0,
        at: 0.0,
        duration: 0.0,
    });
    assert!(cfg.validate().is_err());

    let mut cfg = PanelConfig::naming_sequence();
    cfg.paths.push("path-0".to_owned());
    assert!(cfg.validate().is_err());

    let mut cfg = PanelConfig::default();
    cfg.spacing.insert("dot-gap".to_owned(), f64::INFINITY);
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reports_missing_file() {
    let err = PanelConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open panel config"));
}
