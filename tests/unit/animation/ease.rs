use super::*;

const SHAPES: [Interpolation; 5] = [
    Interpolation::Linear,
    Interpolation::Quad,
    Interpolation::Cubic,
    Interpolation::Sine,
    Interpolation::Bezier,
];

#[test]
fn eased_shapes_hit_segment_endpoints() {
    for shape in SHAPES {
        for easing in [Easing::Auto, Easing::In, Easing::Out, Easing::InOut] {
            assert!(shape.shape(easing, 0.0).abs() < 1e-12, "{shape:?} {easing:?}");
            assert!(
                (shape.shape(easing, 1.0) - 1.0).abs() < 1e-12,
                "{shape:?} {easing:?}"
            );
        }
    }
}

#[test]
fn constant_holds_and_input_is_clamped() {
    assert_eq!(Interpolation::Constant.shape(Easing::Auto, 0.99), 0.0);
    assert_eq!(Interpolation::Linear.shape(Easing::Auto, -3.0), 0.0);
    assert_eq!(Interpolation::Linear.shape(Easing::Auto, 7.0), 1.0);
}

#[test]
fn in_and_out_are_mirrored() {
    let t = 0.25;
    let i = Interpolation::Quad.shape(Easing::In, t);
    let o = Interpolation::Quad.shape(Easing::Out, 1.0 - t);
    assert!((i - (1.0 - o)).abs() < 1e-12);
    assert!(i < t, "ease-in starts slow");
}

#[test]
fn in_out_is_symmetric_about_midpoint() {
    for shape in SHAPES {
        let mid = shape.shape(Easing::InOut, 0.5);
        assert!((mid - 0.5).abs() < 1e-12, "{shape:?} mid={mid}");
    }
}

#[test]
fn serde_names_are_snake_case() {
    let v: Interpolation = serde_json::from_str("\"bezier\"").unwrap();
    assert_eq!(v, Interpolation::Bezier);
    let e: Easing = serde_json::from_str("\"in_out\"").unwrap();
    assert_eq!(e, Easing::InOut);
}
