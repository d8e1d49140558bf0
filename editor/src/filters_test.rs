#![allow(clippy::float_cmp)]

use super::*;

// --- defaults ---

#[test]
fn default_settings_master_and_sliders_enabled() {
    let s = FilterSettings::default();
    assert!(s.enabled);
    assert!(s.brightness_enabled);
    assert!(s.contrast_enabled);
    assert!(s.saturation_enabled);
    assert!(s.hue_enabled);
    assert!(s.temperature_enabled);
    assert!(s.tint_enabled);
}

#[test]
fn default_settings_values_are_neutral() {
    let s = FilterSettings::default();
    assert_eq!(s.brightness, 0.0);
    assert_eq!(s.contrast, 0.0);
    assert_eq!(s.saturation, 0.0);
    assert_eq!(s.hue, 0.0);
    assert_eq!(s.temperature, 0.0);
    assert_eq!(s.tint, 0.0);
    assert!(!s.black_white);
    assert!(!s.sepia);
    assert!(!s.monochrome);
}

#[test]
fn default_monochrome_color_is_white() {
    assert_eq!(FilterSettings::default().monochrome_color, Rgb { r: 255, g: 255, b: 255 });
}

#[test]
fn default_settings_compose_to_empty_plan() {
    let plan = compose(&FilterSettings::default());
    assert!(plan.is_empty());
    assert!(!has_active_filters(&FilterSettings::default()));
}

// --- inclusion rules ---

#[test]
fn zero_value_slider_is_excluded() {
    let settings = FilterSettings { brightness: 0.0, ..FilterSettings::default() };
    assert!(compose(&settings).ops.is_empty());
}

#[test]
fn nonzero_slider_is_included() {
    let settings = FilterSettings { brightness: 20.0, ..FilterSettings::default() };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::Brightness]);
    assert_eq!(plan.params.brightness, 0.2);
}

#[test]
fn individually_disabled_slider_is_excluded() {
    let settings = FilterSettings {
        brightness: 20.0,
        brightness_enabled: false,
        ..FilterSettings::default()
    };
    assert!(compose(&settings).ops.is_empty());
}

#[test]
fn master_switch_off_empties_everything() {
    let settings = FilterSettings {
        enabled: false,
        brightness: 20.0,
        contrast: 50.0,
        sepia: true,
        black_white: true,
        ..FilterSettings::default()
    };
    assert!(compose(&settings).is_empty());
    assert!(!has_active_filters(&settings));
}

#[test]
fn negative_values_count_as_active() {
    let settings = FilterSettings { contrast: -40.0, ..FilterSettings::default() };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::Contrast]);
    assert_eq!(plan.params.contrast, -40.0);
}

// --- combined ops ---

#[test]
fn hsl_included_when_only_saturation_active() {
    let settings = FilterSettings { saturation: 50.0, ..FilterSettings::default() };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::Hsl]);
    assert_eq!(plan.params.saturation, 0.5);
    assert_eq!(plan.params.hue_degrees, 0.0);
}

#[test]
fn hsl_included_when_only_hue_active() {
    let settings = FilterSettings { hue: 90.0, ..FilterSettings::default() };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::Hsl]);
    assert_eq!(plan.params.hue_degrees, 90.0);
    assert_eq!(plan.params.saturation, 0.0);
}

#[test]
fn disabled_hue_rides_neutral_when_saturation_active() {
    let settings = FilterSettings {
        saturation: 30.0,
        hue: 45.0,
        hue_enabled: false,
        ..FilterSettings::default()
    };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::Hsl]);
    assert_eq!(plan.params.saturation, 0.3);
    assert_eq!(plan.params.hue_degrees, 0.0);
}

#[test]
fn white_balance_included_for_either_component() {
    let temp_only = FilterSettings { temperature: -30.0, ..FilterSettings::default() };
    let plan = compose(&temp_only);
    assert_eq!(plan.ops, vec![FilterKind::WhiteBalance]);
    assert_eq!(plan.params.temperature, -0.3);
    assert_eq!(plan.params.tint, 0.0);

    let tint_only = FilterSettings { tint: 10.0, ..FilterSettings::default() };
    let plan = compose(&tint_only);
    assert_eq!(plan.ops, vec![FilterKind::WhiteBalance]);
    assert_eq!(plan.params.tint, 0.1);
}

// --- ordering ---

#[test]
fn pipeline_order_is_fixed() {
    let settings = FilterSettings {
        brightness: 10.0,
        contrast: 10.0,
        saturation: 10.0,
        temperature: 10.0,
        black_white: true,
        ..FilterSettings::default()
    };
    let plan = compose(&settings);
    assert_eq!(
        plan.ops,
        vec![
            FilterKind::Brightness,
            FilterKind::Contrast,
            FilterKind::Hsl,
            FilterKind::WhiteBalance,
            FilterKind::BlackWhite,
        ]
    );
}

#[test]
fn brightness_contrast_preset_scenario() {
    // brightness 20, contrast 10, saturation 0, sepia and black & white both
    // requested: exactly brightness, contrast, then the winning preset.
    let settings = FilterSettings {
        brightness: 20.0,
        contrast: 10.0,
        saturation: 0.0,
        sepia: true,
        black_white: true,
        ..FilterSettings::default()
    };
    let plan = compose(&settings);
    assert_eq!(
        plan.ops,
        vec![FilterKind::Brightness, FilterKind::Contrast, FilterKind::BlackWhite]
    );
}

// --- preset precedence ---

#[test]
fn black_white_beats_sepia() {
    let settings =
        FilterSettings { sepia: true, black_white: true, ..FilterSettings::default() };
    assert_eq!(compose(&settings).ops, vec![FilterKind::BlackWhite]);
}

#[test]
fn sepia_beats_monochrome() {
    let settings = FilterSettings { sepia: true, monochrome: true, ..FilterSettings::default() };
    assert_eq!(compose(&settings).ops, vec![FilterKind::Sepia]);
}

#[test]
fn all_three_presets_leave_black_white_alone() {
    let settings = FilterSettings {
        sepia: true,
        black_white: true,
        monochrome: true,
        ..FilterSettings::default()
    };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::BlackWhite]);
}

#[test]
fn monochrome_carries_its_color() {
    let settings = FilterSettings {
        monochrome: true,
        monochrome_color: Rgb { r: 192, g: 160, b: 128 },
        ..FilterSettings::default()
    };
    let plan = compose(&settings);
    assert_eq!(plan.ops, vec![FilterKind::Monochrome]);
    assert_eq!(plan.params.monochrome_color, Rgb { r: 192, g: 160, b: 128 });
}

// --- parameter normalization ---

#[test]
fn slider_values_normalize_to_unit_range() {
    let settings = FilterSettings {
        brightness: 50.0,
        saturation: -100.0,
        temperature: 25.0,
        tint: -50.0,
        ..FilterSettings::default()
    };
    let params = compose(&settings).params;
    assert_eq!(params.brightness, 0.5);
    assert_eq!(params.saturation, -1.0);
    assert_eq!(params.temperature, 0.25);
    assert_eq!(params.tint, -0.5);
}

#[test]
fn out_of_range_values_clamp() {
    let settings = FilterSettings { brightness: 500.0, hue: 720.0, ..FilterSettings::default() };
    let params = compose(&settings).params;
    assert_eq!(params.brightness, 1.0);
    assert_eq!(params.hue_degrees, 180.0);
}

// --- gate agreement ---

#[test]
fn gate_agrees_with_compose() {
    let mut variations = vec![
        FilterSettings::default(),
        FilterSettings { enabled: false, sepia: true, ..FilterSettings::default() },
        FilterSettings { brightness: 5.0, ..FilterSettings::default() },
        FilterSettings { brightness: 5.0, brightness_enabled: false, ..FilterSettings::default() },
        FilterSettings { hue: -10.0, ..FilterSettings::default() },
        FilterSettings { tint: 1.0, tint_enabled: false, ..FilterSettings::default() },
        FilterSettings { monochrome: true, ..FilterSettings::default() },
        FilterSettings { black_white: true, enabled: false, ..FilterSettings::default() },
    ];
    for value in [-20.0, 0.0, 15.0] {
        for flag in [true, false] {
            variations.push(FilterSettings {
                saturation: value,
                saturation_enabled: flag,
                ..FilterSettings::default()
            });
            variations.push(FilterSettings {
                contrast: value,
                contrast_enabled: flag,
                sepia: true,
                ..FilterSettings::default()
            });
        }
    }
    for settings in variations {
        assert_eq!(
            has_active_filters(&settings),
            !compose(&settings).is_empty(),
            "gate and compose disagree for {settings:?}"
        );
    }
}

// --- serde ---

#[test]
fn empty_json_deserializes_to_defaults() {
    let settings: FilterSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, FilterSettings::default());
}

#[test]
fn partial_json_keeps_other_defaults() {
    let settings: FilterSettings =
        serde_json::from_str(r#"{"brightness": 25.0, "sepia": true}"#).unwrap();
    assert_eq!(settings.brightness, 25.0);
    assert!(settings.sepia);
    assert!(settings.enabled);
    assert!(settings.brightness_enabled);
    assert_eq!(settings.contrast, 0.0);
}

#[test]
fn settings_serde_round_trip() {
    let settings = FilterSettings {
        brightness: -12.5,
        hue: 33.0,
        monochrome: true,
        monochrome_color: Rgb { r: 10, g: 20, b: 30 },
        ..FilterSettings::default()
    };
    let json = serde_json::to_string(&settings).unwrap();
    let restored: FilterSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, settings);
}
