//! The drawing surface: pointer strokes in, composite bitmap and stroke blob
//! out.
//!
//! Strokes live in canvas pixel space (a fixed resolution), independent of
//! the on-screen pane, so resizing the layout never distorts a drawing.
//! Every finished stroke re-renders the composite and queues
//! [`CanvasEvent`]s on the surface's [`EventBus`].

use egui::{Color32, Pos2, Rect, Response, Sense, Shape, Ui, Vec2};
use image::RgbaImage;
use std::sync::Arc;

use crate::bitmap::{self, BitmapRef};
use crate::event::{CanvasEvent, CanvasObserver, EventBus};
use crate::layout::Composition;
use crate::renderer::Renderer;
use crate::stroke::{self, MutableStroke, Stroke};
use crate::texture_manager::TextureManager;

pub const DEFAULT_CANVAS_SIZE: [u32; 2] = [1024, 768];

/// Largest canvas width or height, in pixels
pub const MAX_CANVAS_DIMENSION: u32 = 8192;

pub const CANVAS_TEXTURE_SLOT: &str = "canvas";

/// Maps between the on-screen pane and canvas pixels, letterboxing the
/// canvas to keep its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    /// Where the canvas bitmap is drawn on screen
    pub image_rect: Rect,
    scale: f32,
}

impl CanvasTransform {
    pub fn new(pane: Rect, canvas_size: [u32; 2]) -> Self {
        let canvas = Vec2::new(canvas_size[0].max(1) as f32, canvas_size[1].max(1) as f32);
        let scale = (pane.width() / canvas.x).min(pane.height() / canvas.y).max(f32::EPSILON);
        let image_rect = Rect::from_center_size(pane.center(), canvas * scale);
        Self { image_rect, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen - self.image_rect.min) / self.scale).to_pos2()
    }

    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        self.image_rect.min + canvas.to_vec2() * self.scale
    }
}

pub struct DrawingSurface {
    size: [u32; 2],
    strokes: Vec<Stroke>,
    background: Option<RgbaImage>,
    current: Option<MutableStroke>,
    renderer: Renderer,
    composite: BitmapRef,
    composite_version: u64,
    events: EventBus,
}

impl std::fmt::Debug for DrawingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("size", &self.size)
            .field("strokes", &self.strokes.len())
            .field("has_background", &self.background.is_some())
            .field("drawing", &self.current.is_some())
            .field("events", &self.events)
            .finish()
    }
}

impl DrawingSurface {
    pub fn new(size: [u32; 2]) -> Self {
        let size = size.map(|d| d.clamp(1, MAX_CANVAS_DIMENSION));
        let renderer = Renderer::new();
        let composite = Arc::new(renderer.composite(size, None, &[]));
        Self {
            size,
            strokes: Vec::new(),
            background: None,
            current: None,
            renderer,
            composite,
            composite_version: 0,
            events: EventBus::new(),
        }
    }

    /// Restore a saved drawing.
    ///
    /// A decodable stroke blob wins; the background bitmap is only used when
    /// there are no strokes to restore, since a saved canvas bitmap already
    /// contains them. Does not emit events.
    pub fn load(&mut self, stroke_data: Option<&[u8]>, background: Option<RgbaImage>) {
        self.current = None;
        let restored = stroke_data.and_then(|bytes| match stroke::decode_strokes(bytes) {
            Ok(strokes) => Some(strokes),
            Err(err) => {
                log::warn!("Ignoring unreadable stroke data ({} bytes): {}", bytes.len(), err);
                None
            }
        });

        match restored {
            Some(strokes) => {
                log::info!("Restored {} strokes", strokes.len());
                self.strokes = strokes;
                self.background = None;
            }
            None => {
                self.strokes.clear();
                self.background = background;
            }
        }
        self.recomposite();
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn composite(&self) -> &BitmapRef {
        &self.composite
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Hand queued events to `observer`
    pub fn dispatch_events(&mut self, observer: &mut dyn CanvasObserver) -> usize {
        self.events.dispatch(observer)
    }

    /// Serialized strokes, as stored on the project
    pub fn stroke_data(&self) -> Vec<u8> {
        match stroke::encode_strokes(&self.strokes) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("Failed to serialize strokes: {}", err);
                Vec::new()
            }
        }
    }

    pub fn begin_stroke(&mut self, pos: Pos2) {
        let mut stroke = MutableStroke::new(self.renderer.brush_color(), self.renderer.brush_thickness());
        stroke.add_point(pos);
        self.current = Some(stroke);
    }

    pub fn extend_stroke(&mut self, pos: Pos2) {
        if let Some(stroke) = &mut self.current {
            stroke.add_point(pos);
        }
    }

    /// Commit the stroke in progress. Returns false when nothing was drawing.
    pub fn end_stroke(&mut self) -> bool {
        let Some(stroke) = self.current.take() else {
            return false;
        };
        if stroke.points().is_empty() {
            return false;
        }
        self.strokes.push(stroke.to_stroke());
        self.recomposite();

        let strokes = self.stroke_data();
        self.events.emit(CanvasEvent::StrokeChanged {
            image: self.composite.clone(),
            strokes: strokes.clone(),
        });
        self.events.emit(CanvasEvent::ToolSessionEnded {
            image: self.composite.clone(),
            strokes,
        });
        true
    }

    /// Throw away the stroke in progress without committing it
    pub fn cancel_stroke(&mut self) {
        self.current = None;
    }

    /// Back to an empty white canvas
    pub fn reset(&mut self) {
        self.current = None;
        self.strokes.clear();
        self.background = None;
        self.recomposite();
        self.events.emit(CanvasEvent::StrokeChanged {
            image: self.composite.clone(),
            strokes: self.stroke_data(),
        });
    }

    fn recomposite(&mut self) {
        let image = self.renderer.composite(self.size, self.background.as_ref(), &self.strokes);
        self.composite = Arc::new(image);
        self.composite_version += 1;
    }

    /// Start a stroke at a screen position, unless the press misses the
    /// canvas pane or lands on a panel floating over it.
    pub fn press(&mut self, screen_pos: Pos2, composition: &Composition) -> bool {
        if !composition.accepts_canvas_input(screen_pos) {
            return false;
        }
        let transform = CanvasTransform::new(composition.canvas, self.size);
        self.begin_stroke(transform.to_canvas(screen_pos));
        true
    }

    /// Show the surface in the composition's canvas pane and turn pointer
    /// input into strokes.
    pub fn ui(&mut self, ui: &mut Ui, composition: &Composition, textures: &mut TextureManager) -> Response {
        let pane = composition.canvas;
        let transform = CanvasTransform::new(pane, self.size);
        let response = ui.interact(pane, ui.id().with("drawing_surface"), Sense::click_and_drag());

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.press(pos, composition);
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.extend_stroke(transform.to_canvas(pos));
            }
        }
        if response.drag_stopped() {
            self.end_stroke();
        } else if response.clicked() {
            // A tap leaves a dot
            if let Some(pos) = response.interact_pointer_pos() {
                if self.press(pos, composition) {
                    self.end_stroke();
                }
            }
        }

        let painter = ui.painter_at(pane);
        painter.rect_filled(pane, 0.0, Color32::from_gray(230));

        let composite = &self.composite;
        let texture = textures.get_or_update(ui.ctx(), CANVAS_TEXTURE_SLOT, self.composite_version, || {
            bitmap::to_color_image(composite)
        });
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture, transform.image_rect, uv, Color32::WHITE);

        if let Some(stroke) = &self.current {
            let points: Vec<Pos2> = stroke.points().iter().map(|p| transform.to_screen(*p)).collect();
            let width = (stroke.thickness() * transform.scale()).max(1.0);
            if points.len() == 1 {
                painter.circle_filled(points[0], width / 2.0, stroke.color());
            } else {
                painter.add(Shape::line(points, egui::Stroke::new(width, stroke.color())));
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutMode, LayoutState};

    #[derive(Default)]
    struct Recorder {
        changed: usize,
        ended: usize,
        last_strokes: Vec<u8>,
    }

    impl CanvasObserver for Recorder {
        fn on_stroke_changed(&mut self, _image: BitmapRef, strokes: Vec<u8>) {
            self.changed += 1;
            self.last_strokes = strokes;
        }

        fn on_tool_session_end(&mut self, _image: BitmapRef, strokes: Vec<u8>) {
            self.ended += 1;
            self.last_strokes = strokes;
        }
    }

    fn draw_line(surface: &mut DrawingSurface) {
        surface.begin_stroke(Pos2::new(10.0, 10.0));
        surface.extend_stroke(Pos2::new(40.0, 10.0));
        assert!(surface.end_stroke());
    }

    #[test]
    fn test_press_under_floating_preview_is_ignored() {
        let mut layout = LayoutState::default();
        layout.set_layout(LayoutMode::FullCanvasWithPreview);
        let composition = layout.compose(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));

        let mut surface = DrawingSurface::new([400, 300]);
        assert!(!surface.press(composition.preview.center(), &composition));
        assert!(!surface.is_drawing());
        assert!(!surface.end_stroke());

        assert!(surface.press(Pos2::new(100.0, 100.0), &composition));
        assert!(surface.is_drawing());
        assert!(surface.end_stroke());
        // Pane is twice the canvas size, so screen (100, 100) lands on (50, 50)
        assert_ne!(surface.composite().get_pixel(50, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_press_outside_canvas_pane_is_ignored() {
        let composition = LayoutState::default().compose(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));
        let mut surface = DrawingSurface::new([400, 600]);
        assert!(!surface.press(composition.preview.center(), &composition));
        assert!(!surface.is_drawing());
    }

    #[test]
    fn test_oversized_canvas_is_capped() {
        let surface = DrawingSurface::new([u32::MAX, 0]);
        assert_eq!(surface.size(), [MAX_CANVAS_DIMENSION, 1]);
    }

    #[test]
    fn test_transform_round_trip() {
        let pane = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(400.0, 400.0));
        let transform = CanvasTransform::new(pane, [200, 100]);

        // Wide canvas in a square pane is letterboxed vertically
        assert_eq!(transform.image_rect.width(), 400.0);
        assert_eq!(transform.image_rect.height(), 200.0);

        let canvas_pos = Pos2::new(50.0, 25.0);
        let back = transform.to_canvas(transform.to_screen(canvas_pos));
        assert!((back - canvas_pos).length() < 1e-4);
    }

    #[test]
    fn test_stroke_emits_change_then_session_end() {
        let mut surface = DrawingSurface::new([64, 32]);
        draw_line(&mut surface);
        assert_eq!(surface.pending_events(), 2);

        let mut recorder = Recorder::default();
        assert_eq!(surface.dispatch_events(&mut recorder), 2);
        assert_eq!((recorder.changed, recorder.ended), (1, 1));
        assert_eq!(stroke::decode_strokes(&recorder.last_strokes).unwrap().len(), 1);
        assert_eq!(surface.composite().get_pixel(25, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_end_without_begin_is_noop() {
        let mut surface = DrawingSurface::new([16, 16]);
        assert!(!surface.end_stroke());
        assert_eq!(surface.pending_events(), 0);
    }

    #[test]
    fn test_load_restores_strokes_and_ignores_background() {
        let mut original = DrawingSurface::new([64, 32]);
        draw_line(&mut original);
        let blob = original.stroke_data();

        let mut restored = DrawingSurface::new([64, 32]);
        let red = bitmap::filled(4, 4, image::Rgba([255, 0, 0, 255]));
        restored.load(Some(&blob), Some(red));

        assert_eq!(restored.strokes(), original.strokes());
        assert!(!restored.has_background());
        assert_eq!(restored.composite().as_ref(), original.composite().as_ref());
        assert_eq!(restored.pending_events(), 0);
    }

    #[test]
    fn test_load_falls_back_to_background() {
        let mut surface = DrawingSurface::new([8, 8]);
        let red = bitmap::filled(8, 8, image::Rgba([255, 0, 0, 255]));
        surface.load(Some(b"garbage"), Some(red));

        assert!(surface.strokes().is_empty());
        assert_eq!(surface.composite().get_pixel(4, 4).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_reset_emits_empty_strokes() {
        let mut surface = DrawingSurface::new([64, 32]);
        draw_line(&mut surface);
        let mut recorder = Recorder::default();
        surface.dispatch_events(&mut recorder);

        surface.reset();
        surface.dispatch_events(&mut recorder);

        assert_eq!(recorder.changed, 2);
        assert!(stroke::decode_strokes(&recorder.last_strokes).unwrap().is_empty());
        assert!(surface.composite().pixels().all(|p| *p == bitmap::WHITE));
    }
}
