use super::*;
use crate::{
    foundation::core::{Affine, BezPath, Rgba8},
    render::{
        recording::{DrawOp, RecordingSurface},
        surface::SurfaceFingerprint,
    },
    theme::model::SafeZone,
};

fn busy_theme() -> Theme {
    let mut theme = Theme {
        id: "theme-1".to_string(),
        ..Theme::default()
    };
    theme.pattern.density = 1.0;
    theme.pattern.safe_zone = SafeZone {
        width_fraction: 0.2,
        height_fraction: 0.1,
        falloff: 0.1,
    };
    theme
}

fn cover() -> CoverItem {
    CoverItem {
        header: "Vol 1".to_string(),
        title: "Night Drive".to_string(),
        subheader: "Side A".to_string(),
        seed_suffix: "Q1".to_string(),
    }
}

fn canvas(size: u32) -> Canvas {
    Canvas::new(size).unwrap()
}

fn render(
    composer: &mut Composer,
    theme: &Theme,
    item: &CoverItem,
    ctx: &SeedContext,
) -> (RecordingSurface, RenderReport) {
    let mut surface = RecordingSurface::new(canvas(1000)).unwrap();
    let report = composer
        .render_composition(&mut surface, canvas(1000), theme, item, ctx)
        .unwrap();
    (surface, report)
}

#[test]
fn draws_background_then_motifs_then_text() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let (surface, report) = render(&mut composer, &theme, &cover(), &SeedContext::new("series-A", 0));

    assert_eq!(report.seed_key, "series-A|theme-1|0|Q1");
    assert!(report.placements > 0);
    assert_eq!(report.shapes + report.icons, report.placements);

    let ops = surface.ops();
    assert!(matches!(
        &ops[0],
        DrawOp::FillRect { rect, color, .. } if *rect == canvas(1000).rect() && *color == theme.background
    ));
    let paths = &ops[1..1 + report.placements];
    assert!(paths.iter().all(|op| matches!(op, DrawOp::Path { .. })));
    let texts = &ops[1 + report.placements..];
    let text_lines = report.header.lines.len() + report.title.lines.len() + report.subheader.lines.len();
    assert_eq!(texts.len(), text_lines);
    assert_eq!(report.title.lines, vec!["Night", "Drive"]);
    for op in texts {
        let DrawOp::Text { color, .. } = op else {
            panic!("expected text, got {op:?}");
        };
        assert_eq!(*color, theme.typography.text_color);
    }
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn motif_layer_uses_pattern_opacity() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let (surface, _) = render(&mut composer, &busy_theme(), &cover(), &SeedContext::new("s", 0));
    for op in surface.ops() {
        if let DrawOp::Path { color, .. } = op {
            assert_eq!(color.a, 64);
        }
    }
}

#[test]
fn paths_are_placed_through_the_transform_stack() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let ctx = SeedContext::new("series-A", 2);
    let item = cover();
    let (surface, _) = render(&mut composer, &theme, &item, &ctx);
    let placements = composer.placements(canvas(1000), &theme, &ctx, &item).unwrap();

    let transforms: Vec<Affine> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Path { transform, .. } => Some(*transform),
            _ => None,
        })
        .collect();
    assert_eq!(transforms.len(), placements.len());
    for (t, p) in transforms.iter().zip(placements.iter()) {
        let expected = Affine::IDENTITY
            * Affine::translate(Vec2::new(p.x, p.y))
            * Affine::rotate(p.rotation)
            * Affine::scale(p.size);
        assert_eq!(*t, expected);
    }
}

#[test]
fn stroke_widths_depend_on_motif_kind() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let mut theme = busy_theme();
    theme.motif.icon_mix_probability = 1.0;
    let (surface, report) = render(&mut composer, &theme, &cover(), &SeedContext::new("s", 0));
    assert_eq!(report.shapes, 0);
    for op in surface.ops() {
        if let DrawOp::Path { paint, .. } = op {
            assert_eq!(*paint, PathPaint::Stroke { width: ICON_STROKE_WIDTH });
        }
    }

    theme.motif.icon_mix_probability = 0.0;
    let (surface, report) = render(&mut composer, &theme, &cover(), &SeedContext::new("s", 0));
    assert_eq!(report.icons, 0);
    for op in surface.ops() {
        if let DrawOp::Path { paint, .. } = op {
            assert_eq!(*paint, PathPaint::Stroke { width: SHAPE_STROKE_WIDTH });
        }
    }

    theme.motif.stroke = false;
    let (surface, _) = render(&mut composer, &theme, &cover(), &SeedContext::new("s", 0));
    for op in surface.ops() {
        if let DrawOp::Path { paint, .. } = op {
            assert_eq!(*paint, PathPaint::Fill);
        }
    }
}

#[test]
fn missing_geometry_fails_before_any_draw() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let mut theme = busy_theme();
    theme.motif.icon_pool.push("kazoo".to_string());
    theme.motif.icon_mix_probability = 0.0;

    let mut surface = RecordingSurface::new(canvas(1000)).unwrap();
    let err = composer
        .render_composition(&mut surface, canvas(1000), &theme, &cover(), &SeedContext::new("s", 0))
        .unwrap_err();
    assert!(matches!(
        err,
        CoverError::MissingGeometry { kind: crate::foundation::error::GeometryKind::Icon, ref id } if id == "kazoo"
    ));
    assert!(surface.ops().is_empty());
    assert!(composer.cache().is_empty());
}

#[test]
fn canvas_mismatch_and_invalid_theme_are_rejected() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let mut surface = RecordingSurface::new(canvas(500)).unwrap();
    let err = composer
        .render_composition(&mut surface, canvas(1000), &busy_theme(), &cover(), &SeedContext::new("s", 0))
        .unwrap_err();
    assert!(matches!(err, CoverError::Validation(_)));

    let mut theme = busy_theme();
    theme.pattern.density = 0.0;
    let mut surface = RecordingSurface::new(canvas(1000)).unwrap();
    let err = composer
        .render_composition(&mut surface, canvas(1000), &theme, &cover(), &SeedContext::new("s", 0))
        .unwrap_err();
    assert!(matches!(err, CoverError::Validation(_)));
    assert!(surface.ops().is_empty());
}

#[test]
fn injected_geometry_is_used() {
    struct Dots(BezPath);
    impl GeometryLookup for Dots {
        fn shape(&self, _id: &str) -> Option<&BezPath> {
            Some(&self.0)
        }
        fn icon(&self, _id: &str) -> Option<&BezPath> {
            Some(&self.0)
        }
    }

    let mut dot = BezPath::new();
    dot.move_to((0.0, 0.0));
    dot.line_to((0.1, 0.0));
    dot.close_path();
    let mut composer = Composer::new(Arc::new(Dots(dot.clone())));
    let mut theme = busy_theme();
    theme.motif.primary_shape = "anything".to_string();
    let (surface, report) = render(&mut composer, &theme, &cover(), &SeedContext::new("s", 0));
    assert!(report.placements > 0);
    for op in surface.ops() {
        if let DrawOp::Path { path, .. } = op {
            assert_eq!(*path, dot);
        }
    }
}

#[test]
fn repeated_renders_hit_the_cache_and_match() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let ctx = SeedContext::new("series-A", 0);
    let (mut first, _) = render(&mut composer, &theme, &cover(), &ctx);
    let (mut second, _) = render(&mut composer, &theme, &cover(), &ctx);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(composer.cache().stats().computations, 1);
    assert_eq!(composer.cache().stats().hits, 1);

    let mut fresh = Composer::with_builtin_geometry().unwrap();
    let (mut third, _) = render(&mut fresh, &theme, &cover(), &ctx);
    assert_eq!(first.fingerprint(), third.fingerprint());
}

#[test]
fn editing_text_keeps_the_motif_layer() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let ctx = SeedContext::new("series-A", 0);
    let edited = CoverItem {
        title: "Something Else".to_string(),
        ..cover()
    };
    let (a, ra) = render(&mut composer, &theme, &cover(), &ctx);
    let (b, _) = render(&mut composer, &theme, &edited, &ctx);
    let motif_ops = 1 + ra.placements;
    assert_eq!(a.ops()[..motif_ops], b.ops()[..motif_ops]);
    assert_eq!(composer.cache().stats().computations, 1);
}

#[test]
fn item_index_changes_the_seed() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let a = composer
        .placements(canvas(1000), &theme, &SeedContext::new("s", 0), &cover())
        .unwrap();
    let b = composer
        .placements(canvas(1000), &theme, &SeedContext::new("s", 1), &cover())
        .unwrap();
    assert_ne!(a, b);
    assert_eq!(composer.cache().len(), 2);
}

#[test]
fn invalidation_drops_cached_placements() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let other = Theme {
        id: "theme-2".to_string(),
        ..busy_theme()
    };
    let ctx = SeedContext::new("s", 0);
    composer.placements(canvas(1000), &theme, &ctx, &cover()).unwrap();
    composer.placements(canvas(1000), &other, &ctx, &cover()).unwrap();
    assert_eq!(composer.invalidate_theme("theme-1"), 1);
    assert_eq!(composer.cache().len(), 1);
    composer.invalidate();
    assert!(composer.cache().is_empty());
}

#[test]
fn clamped_title_is_reported_as_warning() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let item = CoverItem {
        title: "Incomprehensibilities Overintellectualizations Counterrevolutionaries".to_string(),
        ..cover()
    };
    let (_, report) = render(&mut composer, &busy_theme(), &item, &SeedContext::new("s", 0));
    assert!(report.title.clamped_to_min);
    assert_eq!(
        report.warnings,
        vec![RenderWarning::TextClamped {
            role: TextRole::Title
        }]
    );
    assert_eq!(
        report.warnings[0].to_string(),
        "title text does not fit and was clamped to the minimum size"
    );
}

#[test]
fn palette_colors_reach_the_surface() {
    let mut composer = Composer::with_builtin_geometry().unwrap();
    let theme = busy_theme();
    let (surface, _) = render(&mut composer, &theme, &cover(), &SeedContext::new("s", 0));
    let palette: Vec<Rgba8> = theme
        .palette
        .colors()
        .iter()
        .map(|c| c.with_alpha_scaled(theme.pattern.opacity))
        .collect();
    for op in surface.ops() {
        if let DrawOp::Path { color, .. } = op {
            assert!(palette.contains(color));
        }
    }
}
