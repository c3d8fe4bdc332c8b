use super::*;
use crate::theme::model::PatternMode;

#[test]
fn missing_items_become_placeholders() {
    let doc = SeriesDoc::from_reader(r#"{ "series_seed": "series-A" }"#.as_bytes()).unwrap();
    assert_eq!(doc.theme, Theme::default());
    let suffixes: Vec<&str> = doc.items.iter().map(|i| i.seed_suffix.as_str()).collect();
    assert_eq!(suffixes, ["Q1", "Q2", "Q3", "Q4"]);
    doc.validate().unwrap();

    let doc =
        SeriesDoc::from_reader(r#"{ "series_seed": "s", "count": 6 }"#.as_bytes()).unwrap();
    assert_eq!(doc.items.len(), 6);
    assert_eq!(doc.items[5].seed_suffix, "06");
}

#[test]
fn explicit_items_and_partial_theme() {
    let json = r##"{
        "series_seed": "series-A",
        "theme": { "id": "neon", "background": "#000000", "pattern": { "mode": "border_band" } },
        "items": [ { "title": "Night Drive", "seed_suffix": "A" } ]
    }"##;
    let doc = SeriesDoc::from_reader(json.as_bytes()).unwrap();
    assert_eq!(doc.theme.id, "neon");
    assert_eq!(doc.theme.pattern.mode, PatternMode::BorderBand);
    assert_eq!(doc.theme.pattern.density, 0.6);
    assert_eq!(doc.items.len(), 1);
    assert_eq!(doc.item(0).unwrap().title, "Night Drive");
    assert!(doc.item(1).is_err());
}

#[test]
fn malformed_documents_are_rejected() {
    let err = SeriesDoc::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, CoverError::Serde(_)));

    let doc = SeriesDoc::from_reader(r#"{ "series_seed": "  " }"#.as_bytes()).unwrap();
    assert!(doc.validate().is_err());

    assert!(SeriesDoc::from_path("/definitely/not/here.json").is_err());
}
