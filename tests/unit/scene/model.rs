use super::*;
use crate::animation::curve::Keyframe;

fn ramp(from: f64, to: f64) -> Curve {
    Curve::from_keys(vec![Keyframe::linear(1.0, from), Keyframe::linear(11.0, to)])
}

fn cube_scene() -> Scene {
    let mut scene = Scene::new("Shot", FrameRange::from_bounds(1, 10));
    scene.materials.insert(
        "Red".to_string(),
        Material {
            base_color: [1.0, 0.0, 0.0, 1.0],
            animation: Some(Action {
                channels: vec![Channel::new("diffuse_color", 1, ramp(0.0, 1.0))],
            }),
            ..Material::default()
        },
    );
    scene.objects.push(Object {
        name: "Cube".to_string(),
        transform: Transform {
            location: [2.0, 3.0, 0.0],
            ..Transform::default()
        },
        animation: Some(Action {
            channels: vec![Channel::new("location", 0, ramp(0.0, 10.0))],
        }),
        material_slots: vec![None, Some("Red".to_string())],
        ..Object::default()
    });
    scene
}

#[test]
fn pose_mixes_rest_transform_and_animated_channels() {
    let scene = cube_scene();
    let pose = scene.pose(&scene.objects[0], 6.0);
    assert_eq!(pose.location, [5.0, 3.0]);
    assert_eq!(pose.scale, [1.0, 1.0]);
    assert_eq!(pose.rotation, 0.0);
    assert_eq!(pose.color, [1.0, 0.5, 0.0, 1.0]);
}

#[test]
fn object_without_material_draws_white() {
    let mut scene = cube_scene();
    scene.objects[0].material_slots.clear();
    let pose = scene.pose(&scene.objects[0], 1.0);
    assert_eq!(pose.color, [1.0; 4]);
}

#[test]
fn channel_path_includes_array_index() {
    let ch = Channel::new("rotation_euler", 2, Curve::constant(0.0));
    assert_eq!(ch.path(), "rotation_euler[2]");
}

#[test]
fn validate_rejects_unknown_material_and_duplicate_names() {
    let mut scene = cube_scene();
    scene.objects[0]
        .material_slots
        .push(Some("Missing".to_string()));
    assert!(scene.validate().is_err());

    let mut scene = cube_scene();
    let dup = scene.objects[0].clone();
    scene.objects.push(dup);
    assert!(scene.validate().is_err());

    assert!(cube_scene().validate().is_ok());
}

#[test]
fn validate_reports_bad_curves_with_channel_path() {
    let mut scene = cube_scene();
    scene.objects[0]
        .animation
        .as_mut()
        .unwrap()
        .channels
        .push(Channel::new(
            "scale",
            1,
            Curve::from_keys(vec![Keyframe::linear(5.0, 1.0), Keyframe::linear(2.0, 1.0)]),
        ));
    let err = scene.validate().unwrap_err().to_string();
    assert!(err.contains("scale[1]"), "{err}");
}

#[test]
fn json_round_trip_keeps_defaults() {
    let scene = Scene::from_json_str(
        r#"{
            "name": "Shot",
            "frame_start": 1,
            "frame_end": 24,
            "objects": [{"name": "Cube"}]
        }"#,
    )
    .unwrap();
    assert_eq!(scene.range(), FrameRange::from_bounds(1, 24));
    assert_eq!(scene.fps, Fps::default());
    assert_eq!(scene.objects[0].transform, Transform::default());
    assert!(scene.objects[0].animation.is_none());
}

#[test]
fn zero_fps_denominator_is_rejected_on_load() {
    let err = Scene::from_json_str(
        r#"{
            "name": "Shot",
            "fps": { "num": 24, "den": 0 },
            "frame_start": 1,
            "frame_end": 24
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, HoldError::Validation(_)), "{err}");

    let mut scene = cube_scene();
    scene.fps = Fps { num: 0, den: 1 };
    assert!(scene.validate().is_err());
}

#[test]
fn scene_is_a_time_cursor() {
    let mut scene = cube_scene();
    scene.set_current_frame(FrameIndex(7));
    assert_eq!(scene.current_frame(), FrameIndex(7));
    assert_eq!(scene.frame_current, 7);
}
