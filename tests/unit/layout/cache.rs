use super::*;
use crate::seed::key::StreamTag;

fn key(suffix: &str, theme: &str, canvas: u32) -> PlacementKey {
    let seed = SeedKey::from_raw(format!("series-A|{theme}|0|{suffix}")).stream_key(StreamTag::Layout);
    PlacementKey::new(seed, theme, &PatternParameters::default(), Canvas { size: canvas })
}

fn one_placement() -> Vec<Placement> {
    vec![Placement {
        x: 1.0,
        y: 2.0,
        size: 3.0,
        rotation: 0.0,
    }]
}

#[test]
fn second_lookup_returns_same_arc_without_recomputing() {
    let mut cache = PlacementCache::new();
    let mut calls = 0;
    let a = cache.get_or_insert_with(key("Q1", "t", 1000), || {
        calls += 1;
        one_placement()
    });
    let b = cache.get_or_insert_with(key("Q1", "t", 1000), || {
        calls += 1;
        one_placement()
    });
    assert_eq!(calls, 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            computations: 1
        }
    );
}

#[test]
fn any_parameter_change_is_a_different_entry() {
    let base = key("Q1", "t", 1000);
    let tweaked = PatternParameters {
        density: PatternParameters::default().density + 1e-12,
        ..PatternParameters::default()
    };
    let other = PlacementKey::new(base.layout_key().clone(), "t", &tweaked, Canvas { size: 1000 });
    assert_ne!(base, other);
    assert_ne!(base, key("Q1", "t", 400));
    assert_ne!(base, key("Q2", "t", 1000));

    let mode = PatternParameters {
        mode: PatternMode::Offset,
        ..PatternParameters::default()
    };
    let other = PlacementKey::new(base.layout_key().clone(), "t", &mode, Canvas { size: 1000 });
    assert_ne!(base, other);
}

#[test]
fn invalidate_theme_only_drops_that_theme() {
    let mut cache = PlacementCache::new();
    cache.get_or_insert_with(key("Q1", "a", 1000), one_placement);
    cache.get_or_insert_with(key("Q2", "a", 1000), one_placement);
    cache.get_or_insert_with(key("Q1", "b", 1000), one_placement);
    assert_eq!(cache.invalidate_theme("a"), 2);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&key("Q1", "b", 1000)).is_some());
    assert!(cache.get(&key("Q1", "a", 1000)).is_none());
}

#[test]
fn retain_canvas_and_invalidate() {
    let mut cache = PlacementCache::new();
    cache.get_or_insert_with(key("Q1", "a", 400), one_placement);
    cache.get_or_insert_with(key("Q1", "a", 1000), one_placement);
    assert_eq!(cache.retain_canvas(Canvas { size: 1000 }), 1);
    assert_eq!(cache.len(), 1);
    cache.invalidate();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().computations, 2);
}

#[test]
fn opacity_is_not_part_of_the_key() {
    let base = key("Q1", "t", 1000);
    let faded = PatternParameters {
        opacity: 0.05,
        ..PatternParameters::default()
    };
    let other = PlacementKey::new(base.layout_key().clone(), "t", &faded, Canvas { size: 1000 });
    assert_eq!(base, other);
}

#[test]
fn new_parameters_replace_the_entry_they_supersede() {
    let mut cache = PlacementCache::new();
    let base = key("Q1", "t", 1000);
    cache.get_or_insert_with(base.clone(), one_placement);
    cache.get_or_insert_with(key("Q2", "t", 1000), one_placement);

    let mut last = base.clone();
    for step in 1..=50 {
        let params = PatternParameters {
            density: 0.5 + f64::from(step) * 0.001,
            ..PatternParameters::default()
        };
        last = PlacementKey::new(base.layout_key().clone(), "t", &params, Canvas { size: 1000 });
        cache.get_or_insert_with(last.clone(), one_placement);
    }
    assert_eq!(cache.len(), 2);
    assert!(cache.get(&base).is_none());
    assert!(cache.get(&last).is_some());
    assert!(cache.get(&key("Q2", "t", 1000)).is_some());
    assert_eq!(cache.stats().computations, 52);
}

#[test]
fn a_cover_keeps_its_most_recent_canvas_sizes() {
    let mut cache = PlacementCache::new();
    cache.get_or_insert_with(key("Q1", "t", 400), one_placement);
    cache.get_or_insert_with(key("Q1", "t", 3000), one_placement);
    // Touch the preview so the export is the least recently used.
    cache.get_or_insert_with(key("Q1", "t", 400), one_placement);
    cache.get_or_insert_with(key("Q1", "t", 1000), one_placement);
    assert_eq!(cache.len(), CANVASES_PER_COVER);
    assert!(cache.get(&key("Q1", "t", 400)).is_some());
    assert!(cache.get(&key("Q1", "t", 1000)).is_some());
    assert!(cache.get(&key("Q1", "t", 3000)).is_none());

    for size in 100..200 {
        cache.get_or_insert_with(key("Q1", "t", size), one_placement);
    }
    assert_eq!(cache.len(), CANVASES_PER_COVER);
}
