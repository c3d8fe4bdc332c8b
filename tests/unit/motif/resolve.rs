use super::*;

fn motif() -> MotifDescriptor {
    MotifDescriptor::default()
}

#[test]
fn golden_first_instance() {
    let m = motif();
    let palette = PaletteRoles::default();
    let resolver = MotifResolver::new(&m, &palette);
    // Draws for seed 42: 0.6011.., 0.4482.., 0.8524..
    let inst = resolver.resolve_instance(&mut SeededRng::new(42));
    assert_eq!(inst.kind, MotifKind::Shape);
    assert_eq!(inst.id, "circle");
    assert_eq!(inst.color, palette.neutral);
}

#[test]
fn consumes_exactly_three_draws() {
    let m = motif();
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    let mut rng = SeededRng::new(7);
    let mut reference = SeededRng::new(7);
    for _ in 0..50 {
        resolver.resolve_instance(&mut rng);
        for _ in 0..3 {
            reference.next_u32();
        }
        assert_eq!(rng, reference);
    }
}

#[test]
fn empty_icon_pool_never_yields_icons() {
    let m = MotifDescriptor {
        icon_pool: vec![],
        icon_mix_probability: 1.0,
        ..motif()
    };
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    let mut rng = SeededRng::new(1);
    for _ in 0..500 {
        assert_eq!(resolver.resolve_instance(&mut rng).kind, MotifKind::Shape);
    }
}

#[test]
fn full_icon_probability_always_yields_pool_icons() {
    let m = MotifDescriptor {
        icon_mix_probability: 1.0,
        ..motif()
    };
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    let mut rng = SeededRng::new(2);
    for _ in 0..500 {
        let inst = resolver.resolve_instance(&mut rng);
        assert_eq!(inst.kind, MotifKind::Icon);
        assert!(m.icon_pool.contains(&inst.id));
    }
}

#[test]
fn primary_shape_share_follows_weight() {
    let m = MotifDescriptor {
        icon_mix_probability: 0.0,
        ..motif()
    };
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    let mut rng = SeededRng::from_key("bias");
    let n = 20_000;
    let primary = (0..n)
        .filter(|_| resolver.resolve_instance(&mut rng).id == "circle")
        .count();
    let share = primary as f64 / n as f64;
    assert!((share - 0.6).abs() < 0.02, "{share}");
}

#[test]
fn secondary_fallback_and_full_weight() {
    let m = MotifDescriptor {
        secondary_shapes: vec![],
        icon_pool: vec![],
        primary_weight: 0.0,
        ..motif()
    };
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    let mut rng = SeededRng::new(3);
    for _ in 0..100 {
        assert_eq!(resolver.resolve_instance(&mut rng).id, "circle");
    }

    let m = MotifDescriptor {
        primary_weight: 1.0,
        icon_pool: vec![],
        ..motif()
    };
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    for _ in 0..100 {
        assert_eq!(resolver.resolve_instance(&mut rng).id, "circle");
    }
}

#[test]
fn every_palette_role_is_reachable() {
    let m = motif();
    let palette = PaletteRoles::default();
    let resolver = MotifResolver::new(&m, &palette);
    let mut rng = SeededRng::new(9);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(resolver.resolve_instance(&mut rng).color);
    }
    assert_eq!(seen.len(), 5);
}

#[test]
fn referenced_ids_cover_every_table() {
    let m = motif();
    let resolver = MotifResolver::new(&m, &PaletteRoles::default());
    let ids = resolver.referenced_ids();
    assert!(ids.contains(&(MotifKind::Shape, "circle")));
    assert!(ids.contains(&(MotifKind::Shape, "ring")));
    assert!(ids.contains(&(MotifKind::Icon, "headphones")));
}
