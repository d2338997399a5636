use picknroll_core::config::{ViewerConfig, ZoomConfig};
use picknroll_core::consts::{DEFAULT_CACHE_CAPACITY, HISTORY_MAX_LENGTH};
use picknroll_core::ViewerError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_default_capacities() {
    let config = ViewerConfig::default();
    assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    assert_eq!(config.history_capacity, HISTORY_MAX_LENGTH);
    assert_eq!(config.cache_capacity, 32);
    assert!(config.seed.is_none());
}

#[test]
fn test_default_extensions() {
    let config = ViewerConfig::default();
    assert_eq!(config.image_extensions, vec!["jpg", "jpeg", "png", "bmp", "gif"]);
}

#[test]
fn test_default_zoom() {
    let zoom = ZoomConfig::default();
    assert_eq!(zoom.base, 1.1);
    assert_eq!(zoom.wheel_sensitivity, 0.01);
    assert_eq!(zoom.min_scale_percent, 10.0);
    assert_eq!(zoom.max_scale_percent, 400.0);
}

#[test]
fn test_default_is_valid() {
    assert!(ViewerConfig::default().validate().is_ok());
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_partial_toml_fills_defaults() {
    let config: ViewerConfig = toml::from_str(
        r#"
        cache_capacity = 8
        seed = 42

        [zoom]
        max_scale_percent = 800.0
        "#,
    )
    .unwrap();

    assert_eq!(config.cache_capacity, 8);
    assert_eq!(config.history_capacity, HISTORY_MAX_LENGTH);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.zoom.max_scale_percent, 800.0);
    assert_eq!(config.zoom.min_scale_percent, 10.0);
}

#[test]
fn test_toml_roundtrip() {
    let config = ViewerConfig {
        image_extensions: vec!["webp".into(), "png".into()],
        loading_indicator_delay_ms: 50,
        ..ViewerConfig::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: ViewerConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_zero_history_capacity_rejected() {
    let config = ViewerConfig {
        history_capacity: 0,
        ..ViewerConfig::default()
    };
    assert!(matches!(config.validate(), Err(ViewerError::InvalidConfig(_))));
}

#[test]
fn test_single_slot_cache_rejected() {
    for cache_capacity in [0, 1] {
        let config = ViewerConfig {
            cache_capacity,
            ..ViewerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache_capacity"), "got: {err}");
    }

    let config = ViewerConfig {
        cache_capacity: 2,
        ..ViewerConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_wheel_sensitivity_must_be_finite() {
    for wheel_sensitivity in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let zoom = ZoomConfig {
            wheel_sensitivity,
            ..ZoomConfig::default()
        };
        let err = zoom.validate().unwrap_err();
        assert!(err.to_string().contains("wheel_sensitivity"), "got: {err}");
    }
}

#[test]
fn test_zoom_base_must_exceed_one() {
    let zoom = ZoomConfig {
        base: 1.0,
        ..ZoomConfig::default()
    };
    let err = zoom.validate().unwrap_err();
    assert!(err.to_string().contains("zoom base"), "got: {err}");
}

#[test]
fn test_zoom_bounds_rejected_when_inverted() {
    let zoom = ZoomConfig {
        min_scale_percent: 50.0,
        max_scale_percent: 20.0,
        ..ZoomConfig::default()
    };
    assert!(zoom.validate().is_err());

    let zoom = ZoomConfig {
        min_scale_percent: 0.0,
        ..ZoomConfig::default()
    };
    assert!(zoom.validate().is_err());
}
