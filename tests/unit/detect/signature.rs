use super::*;
use crate::animation::curve::{Curve, Keyframe};
use crate::foundation::error::HoldError;
use crate::scene::model::{Action, Channel, Material, Object, Scene};
use crate::scene::source::AnimatedEntity;
use crate::testing::hold_then_ramp_scene;

#[test]
fn reports_only_channels_that_moved() {
    let scene = hold_then_ramp_scene();
    assert!(signature(&scene, 2.0, 1.0, DEFAULT_TOLERANCE).unwrap().is_empty());
    let sig = signature(&scene, 4.0, 3.0, DEFAULT_TOLERANCE).unwrap();
    assert_eq!(
        sig.into_iter().collect::<Vec<_>>(),
        vec![ChangeSignal::new("Cube", "location[0]")]
    );
}

#[test]
fn tolerance_is_exclusive_upper_bound_on_noise() {
    let mut scene = Scene::new("Noise", FrameRange::from_bounds(0, 2));
    scene.objects.push(Object {
        name: "Jitter".to_string(),
        animation: Some(Action {
            channels: vec![Channel::new(
                "location",
                2,
                Curve::from_keys(vec![Keyframe::linear(0.0, 0.0), Keyframe::linear(1.0, 1e-9)]),
            )],
        }),
        ..Object::default()
    });
    assert!(signature(&scene, 1.0, 0.0, DEFAULT_TOLERANCE).unwrap().is_empty());
    assert_eq!(signature(&scene, 1.0, 0.0, 0.0).unwrap().len(), 1);
}

#[test]
fn same_instant_yields_empty_signature() {
    let scene = hold_then_ramp_scene();
    for f in 1..=5 {
        let t = f64::from(f);
        assert!(signature(&scene, t, t, 0.0).unwrap().is_empty());
    }
}

#[test]
fn signature_is_repeatable() {
    let scene = hold_then_ramp_scene();
    let a = signature(&scene, 4.0, 3.0, DEFAULT_TOLERANCE).unwrap();
    let b = signature(&scene, 4.0, 3.0, DEFAULT_TOLERANCE).unwrap();
    assert_eq!(a, b);
}

#[test]
fn nested_material_channels_are_signalled_under_their_owner() {
    let mut scene = hold_then_ramp_scene();
    scene.materials.insert(
        "Glow".to_string(),
        Material {
            animation: Some(Action {
                channels: vec![Channel::new(
                    "diffuse_color",
                    3,
                    Curve::from_keys(vec![Keyframe::linear(1.0, 0.0), Keyframe::linear(2.0, 1.0)]),
                )],
            }),
            ..Material::default()
        },
    );
    scene.objects[0].material_slots.push(Some("Glow".to_string()));
    let sig = signature(&scene, 2.0, 1.0, DEFAULT_TOLERANCE).unwrap();
    assert!(sig.contains(&ChangeSignal::new("Glow", "diffuse_color[3]")));
}

#[test]
fn first_frame_of_range_compares_against_itself() {
    let scene = hold_then_ramp_scene();
    let range = FrameRange::from_bounds(4, 5);
    assert!(
        frame_signature(&scene, range, FrameIndex(4), DEFAULT_TOLERANCE)
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        frame_signature(&scene, range, FrameIndex(5), DEFAULT_TOLERANCE)
            .unwrap()
            .len(),
        1
    );
}

struct NanSource(Scene);

impl AnimationSource for NanSource {
    fn animated_entities(&self) -> Vec<AnimatedEntity<'_>> {
        self.0.animated_entities()
    }

    fn evaluate(&self, _: &AnimatedEntity<'_>, _: &Channel, _: f64) -> HoldResult<f64> {
        Ok(f64::NAN)
    }
}

#[test]
fn nan_difference_counts_as_change() {
    let src = NanSource(hold_then_ramp_scene());
    assert_eq!(signature(&src, 2.0, 1.0, DEFAULT_TOLERANCE).unwrap().len(), 1);
}

struct BrokenSource(Scene);

impl AnimationSource for BrokenSource {
    fn animated_entities(&self) -> Vec<AnimatedEntity<'_>> {
        self.0.animated_entities()
    }

    fn evaluate(&self, e: &AnimatedEntity<'_>, _: &Channel, _: f64) -> HoldResult<f64> {
        Err(HoldError::animation(format!("driver on '{}' failed", e.key)))
    }
}

#[test]
fn evaluation_errors_propagate() {
    let src = BrokenSource(hold_then_ramp_scene());
    let err = signature(&src, 2.0, 1.0, DEFAULT_TOLERANCE).unwrap_err();
    assert!(err.to_string().contains("Cube"));
}

#[test]
fn duplicate_rules() {
    let empty = Signature::new();
    let moving = Signature::from([ChangeSignal::new("Cube", "location[0]")]);

    for rule in [DuplicateRule::Unchanged, DuplicateRule::MatchPrevious] {
        assert!(!rule.is_duplicate(&empty, None), "first frame never duplicates");
        assert!(rule.is_duplicate(&empty, Some(&empty)));
        assert!(!rule.is_duplicate(&moving, Some(&empty)));
    }

    assert!(!DuplicateRule::Unchanged.is_duplicate(&moving, Some(&moving)));
    assert!(DuplicateRule::MatchPrevious.is_duplicate(&moving, Some(&moving)));
    assert!(!DuplicateRule::MatchPrevious.is_duplicate(&empty, Some(&moving)));
}
