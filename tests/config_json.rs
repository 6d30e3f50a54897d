// JSON configuration loading (feature `serde_json`, on by default).
#![cfg(feature = "serde_json")]

use valentine_proposal::{AppConfig, ConfigError, SafeArea};

#[test]
fn empty_object_yields_defaults() {
    let cfg = AppConfig::from_json("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
}

#[test]
fn partial_override_keeps_other_defaults() {
    let json = r#"{
        "flow": {
            "surprise_dwell_ms": 2500,
            "transition_dwell_ms": 3000,
            "evasion": { "vanish_threshold": 18, "hover_relocates": false,
                         "safe_area": { "min_pct": 10, "max_pct": 75 } }
        },
        "assets": { "base_path": "/Valentines" }
    }"#;
    let cfg = AppConfig::from_json(json).unwrap();
    assert_eq!(cfg.flow.surprise_dwell_ms, 2_500.0);
    assert_eq!(cfg.flow.celebration_dwell_ms, 5_000.0);
    assert_eq!(cfg.flow.transition_dwell_ms, Some(3_000.0));
    assert_eq!(cfg.flow.evasion.vanish_threshold, 18);
    assert!(!cfg.flow.evasion.hover_relocates);
    assert_eq!(cfg.flow.evasion.max_moves, 10);
    assert_eq!(cfg.flow.evasion.safe_area, SafeArea { min_pct: 10.0, max_pct: 75.0 });
    assert_eq!(cfg.assets.url(&cfg.assets.question_image), "/Valentines/sad_hamster.png");
    assert_eq!(cfg.page, AppConfig::default().page);
}

#[test]
fn invalid_values_are_rejected() {
    let err = AppConfig::from_json(r#"{ "flow": { "evasion": { "captions": [] } } }"#).unwrap_err();
    assert_eq!(err, ConfigError::EmptyCaptions);

    let err = AppConfig::from_json(r#"{ "page": { "handoff_ms": 0 } }"#).unwrap_err();
    assert_eq!(err, ConfigError::Dwell { step: "handoff", ms: 0.0 });
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = AppConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)), "got {err:?}");
}

#[test]
fn defaults_round_trip_through_json() {
    let json = serde_json::to_string(&AppConfig::default()).unwrap();
    assert_eq!(AppConfig::from_json(&json).unwrap(), AppConfig::default());
}
