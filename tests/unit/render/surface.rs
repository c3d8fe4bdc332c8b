use super::*;

#[test]
fn transforms_compose_in_call_order() {
    let mut s = StateStack::new();
    s.translate(Vec2::new(100.0, 50.0));
    s.rotate(std::f64::consts::FRAC_PI_2);
    s.scale(10.0);
    let p = s.transform() * Point::new(1.0, 0.0);
    assert!((p.x - 100.0).abs() < 1e-9, "{p:?}");
    assert!((p.y - 60.0).abs() < 1e-9, "{p:?}");
}

#[test]
fn save_restore_round_trips_state() {
    let mut s = StateStack::new();
    s.set_alpha(0.25);
    s.save();
    s.translate(Vec2::new(3.0, 4.0));
    s.set_alpha(0.5);
    assert_eq!(s.depth(), 1);
    s.restore();
    assert_eq!(s.current(), DrawState {
        transform: Affine::IDENTITY,
        alpha: 0.25,
    });
    s.restore();
    assert_eq!(s.depth(), 0);
    assert_eq!(s.alpha(), 0.25);
}

#[test]
fn alpha_is_clamped_and_applied_to_paint() {
    let mut s = StateStack::new();
    s.set_alpha(2.0);
    assert_eq!(s.alpha(), 1.0);
    s.set_alpha(f64::NAN);
    assert_eq!(s.alpha(), 1.0);
    s.set_alpha(0.5);
    assert_eq!(s.paint(Rgba8::rgb(10, 20, 30)).a, 128);
}
