// src/renderer.rs
use eframe::egui::{self, Color32, Slider};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::bitmap;
use crate::stroke::Stroke;

pub const MIN_BRUSH_THICKNESS: f32 = 1.0;
pub const MAX_BRUSH_THICKNESS: f32 = 50.0;

/// Brush settings plus the software rasterizer that flattens strokes into the
/// canvas bitmap.
#[derive(Debug, Clone)]
pub struct Renderer {
    brush_color: Color32,
    brush_thickness: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            brush_color: Color32::BLACK,
            brush_thickness: 4.0,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the brush controls
    pub fn render_brush_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Color:");
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut self.brush_color,
                egui::color_picker::Alpha::Opaque,
            );
            ui.label("Size:");
            ui.add(Slider::new(
                &mut self.brush_thickness,
                MIN_BRUSH_THICKNESS..=MAX_BRUSH_THICKNESS,
            ));
        });
    }

    pub fn brush_color(&self) -> Color32 {
        self.brush_color
    }

    pub fn brush_thickness(&self) -> f32 {
        self.brush_thickness
    }

    pub fn set_brush_thickness(&mut self, thickness: f32) {
        self.brush_thickness = thickness.clamp(MIN_BRUSH_THICKNESS, MAX_BRUSH_THICKNESS);
    }

    /// Flatten background and strokes into an opaque bitmap of `size`.
    ///
    /// The base is white; the background, if any, is stretched over the
    /// whole canvas; strokes are drawn in order on top.
    pub fn composite(&self, size: [u32; 2], background: Option<&RgbaImage>, strokes: &[Stroke]) -> RgbaImage {
        let [width, height] = size;
        let mut canvas = bitmap::filled(width, height, bitmap::WHITE);

        if let Some(background) = background {
            if background.dimensions() == (width, height) {
                imageops::overlay(&mut canvas, background, 0, 0);
            } else if background.width() > 0 && background.height() > 0 {
                let scaled = imageops::resize(background, width, height, FilterType::Triangle);
                imageops::overlay(&mut canvas, &scaled, 0, 0);
            }
        }

        for stroke in strokes {
            rasterize_stroke(&mut canvas, stroke);
        }
        canvas
    }
}

/// Draw one stroke as a round-capped polyline.
///
/// Coverage is collected in a mask first so overlapping dabs of a
/// translucent stroke don't stack up.
fn rasterize_stroke(canvas: &mut RgbaImage, stroke: &Stroke) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let radius = (stroke.thickness() / 2.0).max(0.5);
    let mut mask = vec![false; width as usize * height as usize];

    let points: Vec<_> = stroke.points().collect();
    match points.as_slice() {
        [] => return,
        [only] => stamp_disc(&mut mask, width, height, only.x, only.y, radius),
        _ => {
            for segment in points.windows(2) {
                let (from, to) = (segment[0], segment[1]);
                let length = from.distance(to);
                let steps = (length / 0.5).ceil().max(1.0) as usize;
                for step in 0..=steps {
                    let t = step as f32 / steps as f32;
                    let point = from.lerp(to, t);
                    stamp_disc(&mut mask, width, height, point.x, point.y, radius);
                }
            }
        }
    }

    let [r, g, b, a] = stroke.rgba();
    let alpha = a as f32 / 255.0;
    for (index, covered) in mask.into_iter().enumerate() {
        if !covered {
            continue;
        }
        let x = index as u32 % width;
        let y = index as u32 / width;
        let pixel = canvas.get_pixel_mut(x, y);
        let blend = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
        let [dr, dg, db, da] = pixel.0;
        *pixel = Rgba([blend(r, dr), blend(g, dg), blend(b, db), da.max(a)]);
    }
}

fn stamp_disc(mask: &mut [bool], width: u32, height: u32, cx: f32, cy: f32, radius: f32) {
    let min_x = (cx - radius).floor().max(0.0) as i64;
    let max_x = (cx + radius).ceil().min(width as f32 - 1.0) as i64;
    let min_y = (cy - radius).floor().max(0.0) as i64;
    let max_y = (cy + radius).ceil().min(height as f32 - 1.0) as i64;
    let radius_sq = radius * radius;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // Sample at the pixel center
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius_sq {
                mask[(y as u32 * width + x as u32) as usize] = true;
            }
        }
    }
}
