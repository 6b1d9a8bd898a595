use bevy_cinders::easing::{self, Easing, EasingFn};

#[test]
fn linear_is_identity() {
    for t in [0.0, 0.25, 0.5, 1.0] {
        assert_eq!(easing::linear(t), t);
    }
}

#[test]
fn in_quad_squares() {
    assert_eq!(easing::in_quad(0.0), 0.0);
    assert_eq!(easing::in_quad(0.5), 0.25);
    assert_eq!(easing::in_quad(1.0), 1.0);
}

#[test]
fn out_quad_decelerates() {
    assert_eq!(easing::out_quad(0.0), 0.0);
    assert_eq!(easing::out_quad(0.5), 0.75);
    assert_eq!(easing::out_quad(1.0), 1.0);
}

#[test]
fn builtins_keep_endpoints() {
    for easing in Easing::all() {
        let f = easing.function();
        assert_eq!(f(0.0), 0.0, "{} should start at 0", easing.display_name());
        assert_eq!(f(1.0), 1.0, "{} should end at 1", easing.display_name());
    }
}

#[test]
fn selector_converts_to_function() {
    let f: EasingFn = Easing::OutQuad.into();
    assert_eq!(f(0.5), easing::out_quad(0.5));
    assert_eq!(Easing::default(), Easing::Linear);
}
