use std::path::Path;

use kurbo::{Affine, Point, Rect};

use crate::{
    foundation::core::FrameIndex,
    foundation::error::{HoldError, HoldResult},
    foundation::time_scope::{ScopedTime, TimeCursor},
    output::format::OutputFormat,
    render::Renderer,
    scene::model::Scene,
};

/// Draws every object as a unit quad posed by its animated transform and filled with its first
/// material's color. Scene units map to pixels through `pixels_per_unit`, origin at the canvas
/// center, y up.
#[derive(Clone, Copy, Debug)]
pub struct PreviewRenderer {
    /// Scale from scene units to pixels.
    pub pixels_per_unit: f64,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self {
            pixels_per_unit: 32.0,
        }
    }
}

impl PreviewRenderer {
    /// Rasterize `scene` at its current frame.
    pub fn rasterize(&self, scene: &Scene) -> image::RgbaImage {
        let w = scene.canvas.width;
        let h = scene.canvas.height;
        let mut img = image::RgbaImage::from_pixel(w, h, image::Rgba(scene.background));
        let time = scene.current_frame().as_time();
        let view = Affine::translate((f64::from(w) / 2.0, f64::from(h) / 2.0))
            * Affine::scale_non_uniform(self.pixels_per_unit, -self.pixels_per_unit);

        for obj in &scene.objects {
            let pose = scene.pose(obj, time);
            let world = view
                * Affine::translate((pose.location[0], pose.location[1]))
                * Affine::rotate(pose.rotation)
                * Affine::scale_non_uniform(pose.scale[0], pose.scale[1]);
            if world.determinant().abs() < 1e-12 {
                continue;
            }
            let inv = world.inverse();
            let bbox = world.transform_rect_bbox(Rect::new(-0.5, -0.5, 0.5, 0.5));
            let x0 = bbox.x0.floor().clamp(0.0, f64::from(w)) as u32;
            let x1 = bbox.x1.ceil().clamp(0.0, f64::from(w)) as u32;
            let y0 = bbox.y0.floor().clamp(0.0, f64::from(h)) as u32;
            let y1 = bbox.y1.ceil().clamp(0.0, f64::from(h)) as u32;

            let src = pose.color.map(|c| c.clamp(0.0, 1.0));
            for y in y0..y1 {
                for x in x0..x1 {
                    let local = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                    if local.x.abs() > 0.5 || local.y.abs() > 0.5 {
                        continue;
                    }
                    let dst = img.get_pixel_mut(x, y);
                    blend_over(&mut dst.0, src);
                }
            }
        }
        img
    }
}

/// Straight-alpha source-over of a `[0, 1]` color onto an RGBA8 pixel.
fn blend_over(dst: &mut [u8; 4], src: [f64; 4]) {
    let a = src[3];
    let da = f64::from(dst[3]) / 255.0;
    let out_a = a + da * (1.0 - a);
    if out_a <= 0.0 {
        *dst = [0; 4];
        return;
    }
    for i in 0..3 {
        let d = f64::from(dst[i]) / 255.0;
        let c = (src[i] * a + d * da * (1.0 - a)) / out_a;
        dst[i] = (c * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Encode `img` to `path` in `format`.
///
/// JPEG drops alpha; OpenEXR is written as 32-bit float RGBA.
pub fn write_still(img: image::RgbaImage, path: &Path, format: OutputFormat) -> HoldResult<()> {
    let dynamic = image::DynamicImage::ImageRgba8(img);
    let encoded = match format {
        OutputFormat::Jpeg => image::DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        OutputFormat::OpenExr => image::DynamicImage::ImageRgba32F(dynamic.to_rgba32f()),
        _ => dynamic,
    };
    encoded
        .save_with_format(path, format.image_format())
        .map_err(|e| {
            HoldError::Other(anyhow::anyhow!(
                "write {} '{}': {e}",
                format.extension(),
                path.display()
            ))
        })
}

impl Renderer<Scene> for PreviewRenderer {
    fn render_frame(
        &mut self,
        source: &mut Scene,
        frame: FrameIndex,
        output: &Path,
    ) -> HoldResult<()> {
        let format = OutputFormat::from_path(output)?;
        let scene = ScopedTime::enter(source, frame);
        let img = self.rasterize(&scene);
        write_still(img, output, format)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
