use super::*;
use crate::animation::curve::{Curve, Keyframe};
use crate::foundation::core::{Canvas, FrameRange};
use crate::scene::model::{Action, Channel, Material, Object};

fn red_square_scene() -> Scene {
    let mut scene = Scene::new("Preview", FrameRange::from_bounds(0, 10));
    scene.canvas = Canvas {
        width: 64,
        height: 64,
    };
    scene.background = [0, 0, 0, 255];
    scene.materials.insert(
        "Red".to_string(),
        Material {
            base_color: [1.0, 0.0, 0.0, 1.0],
            ..Material::default()
        },
    );
    scene.objects.push(Object {
        name: "Square".to_string(),
        animation: Some(Action {
            channels: vec![Channel::new(
                "location",
                0,
                Curve::from_keys(vec![Keyframe::linear(0.0, 0.0), Keyframe::linear(10.0, 0.5)]),
            )],
        }),
        material_slots: vec![Some("Red".to_string())],
        ..Object::default()
    });
    scene
}

#[test]
fn square_covers_center_and_leaves_corners() {
    let scene = red_square_scene();
    let img = PreviewRenderer::default().rasterize(&scene);
    assert_eq!(img.dimensions(), (64, 64));
    assert_eq!(img.get_pixel(32, 32).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    // 32 px quad centered at 32: columns 16..48.
    assert_eq!(img.get_pixel(16, 32).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(15, 32).0, [0, 0, 0, 255]);
}

#[test]
fn animated_location_moves_the_quad() {
    let mut scene = red_square_scene();
    scene.frame_current = 10;
    let img = PreviewRenderer::default().rasterize(&scene);
    // Shifted right by half a unit (16 px): columns 32..64.
    assert_eq!(img.get_pixel(20, 32).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(63, 32).0, [255, 0, 0, 255]);
}

#[test]
fn zero_scale_objects_are_skipped() {
    let mut scene = red_square_scene();
    scene.objects[0].transform.scale = [0.0, 1.0, 1.0];
    let img = PreviewRenderer::default().rasterize(&scene);
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
}

#[test]
fn blend_over_respects_alpha() {
    let mut px = [0, 0, 255, 255];
    blend_over(&mut px, [1.0, 0.0, 0.0, 0.5]);
    assert_eq!(px, [128, 0, 128, 255]);
}

#[test]
fn render_frame_writes_file_and_restores_playhead() {
    let dir = std::path::PathBuf::from("target").join("unit_preview");
    std::fs::create_dir_all(&dir).unwrap();
    let mut scene = red_square_scene();
    scene.frame_current = 3;

    let mut renderer = PreviewRenderer::default();
    for format in [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::OpenExr] {
        let out = dir.join(format!("5.{}", format.extension()));
        let _ = std::fs::remove_file(&out);
        renderer
            .render_frame(&mut scene, FrameIndex(5), &out)
            .unwrap();
        assert!(out.is_file(), "{}", out.display());
    }
    assert_eq!(scene.frame_current, 3);

    let decoded = image::open(dir.join("5.png")).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 64));
}

#[test]
fn render_frame_rejects_unknown_extension() {
    let mut scene = red_square_scene();
    let err = PreviewRenderer::default()
        .render_frame(&mut scene, FrameIndex(0), Path::new("target/x.webm"))
        .unwrap_err();
    assert!(matches!(err, HoldError::Configuration(_)));
    assert_eq!(scene.frame_current, 0);
}
