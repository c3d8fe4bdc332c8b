use super::*;

#[test]
fn default_theme_is_valid() {
    Theme::default().validate().unwrap();
}

#[test]
fn pattern_rejects_out_of_range_values() {
    let mut p = PatternParameters {
        density: -0.1,
        ..PatternParameters::default()
    };
    let err = p.validate().unwrap_err().to_string();
    assert!(err.contains("pattern.density"), "{err}");

    p.density = 0.5;
    p.safe_zone.width_fraction = 1.0;
    assert!(p.validate().is_err());

    p.safe_zone.width_fraction = 0.5;
    p.margin_fraction = 0.5;
    assert!(p.validate().is_err());

    p.margin_fraction = 0.1;
    p.safe_zone.falloff = 0.0;
    assert!(p.validate().is_err());

    p.safe_zone.falloff = 0.2;
    p.element_scale = f64::NAN;
    assert!(p.validate().is_err());
}

#[test]
fn motif_fallbacks() {
    let m = MotifDescriptor {
        secondary_shapes: vec![],
        icon_pool: vec![],
        icon_mix_probability: 0.9,
        ..MotifDescriptor::default()
    };
    assert_eq!(m.effective_secondary_shapes(), ["circle".to_string()]);
    assert_eq!(m.effective_icon_probability(), 0.0);
}

#[test]
fn typography_requires_min_not_above_base() {
    let mut t = Typography::default();
    t.title.min_size_px = 300.0;
    let err = t.validate().unwrap_err().to_string();
    assert!(err.contains("typography.title"), "{err}");
}

#[test]
fn theme_id_cannot_contain_key_delimiter() {
    let theme = Theme {
        id: "a|b".to_string(),
        ..Theme::default()
    };
    assert!(theme.validate().is_err());
}

#[test]
fn pattern_modes_accept_display_names() {
    let mode: PatternMode = serde_json::from_str("\"Radial Scatter\"").unwrap();
    assert_eq!(mode, PatternMode::RadialScatter);
    let mode: PatternMode = serde_json::from_str("\"border_band\"").unwrap();
    assert_eq!(mode, PatternMode::BorderBand);
}

#[test]
fn partial_theme_json_fills_defaults() {
    let theme: Theme =
        serde_json::from_str(r##"{ "id": "t-1", "background": "#000000" }"##).unwrap();
    assert_eq!(theme.id, "t-1");
    assert_eq!(theme.pattern, PatternParameters::default());
    assert_eq!(theme.typography.title.max_lines, 2);
}

#[test]
fn series_items_use_quarter_suffixes_for_four() {
    let items = series_items(4);
    assert_eq!(items[3].seed_suffix, "Q4");
    let items = series_items(3);
    assert_eq!(items[0].seed_suffix, "01");
    assert_eq!(items[0].text(TextRole::Title), "Playlist Name");
}
