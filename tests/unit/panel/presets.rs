use super::*;

#[test]
fn naming_sequence_validates() {
    let cfg = PanelConfig::naming_sequence();
    cfg.validate().unwrap();
    assert_eq!(cfg.duration, 2600.0);
    assert!(cfg.pin);
    assert_eq!(cfg.paths.len(), 4);
    assert_eq!(cfg.steps.len(), 9);
}

#[test]
fn naming_sequence_interleaves_cues_and_draws() {
    let cfg = PanelConfig::naming_sequence();
    let starts: Vec<f64> = cfg
        .steps
        .iter()
        .map(|s| match s {
            StepDef::Fade { at, .. } | StepDef::Draw { at, .. } => *at,
        })
        .collect();
    assert_eq!(starts, vec![0.0, 0.2, 0.6, 0.8, 1.2, 1.4, 1.8, 2.0, 2.3]);
    let cues: Vec<_> = cfg.cue_ids().iter().map(|c| c.to_string()).collect();
    assert_eq!(cues, ["introducing", "our", "new", "name", "logo-wrap"]);
}
