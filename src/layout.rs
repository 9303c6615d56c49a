//! How the drawing surface and the generation preview share the workspace.
//!
//! [`LayoutState`] is a tiny state machine: three modes, all reachable from
//! each other, plus the canvas share used by the side-by-side mode.
//! [`LayoutState::compose`] turns it into concrete pane rectangles.
//!
//! ```text
//!   SplitScreen                FullCanvasWithPreview      FullPreviewWithCanvas
//!   ┌──────────┬──────┐        ┌─────────────────┐        ┌─────────────────┐
//!   │          │      │        │     canvas      │        │     preview     │
//!   │  canvas  │ prev │        │         ┌─────┐ │        │ ┌─────┐         │
//!   │  (r)     │(1-r) │        │         │prev │ │        │ │canv │         │
//!   └──────────┴──────┘        └─────────┴─────┴─┘        └─┴─────┴─────────┘
//! ```

use egui::{Pos2, Rect, Vec2};

pub const MIN_CANVAS_RATIO: f32 = 0.1;
pub const MAX_CANVAS_RATIO: f32 = 0.9;
pub const DEFAULT_CANVAS_RATIO: f32 = 0.5;

/// Default size of the floating pane in the full-area modes
pub const DEFAULT_FLOATING_SIZE: Vec2 = Vec2::new(200.0, 250.0);

/// Gap between the floating pane and the edges it is anchored to
pub const FLOATING_MARGIN: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    #[default]
    SplitScreen,
    FullCanvasWithPreview,
    FullPreviewWithCanvas,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 3] = [
        LayoutMode::SplitScreen,
        LayoutMode::FullCanvasWithPreview,
        LayoutMode::FullPreviewWithCanvas,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutMode::SplitScreen => "Split",
            LayoutMode::FullCanvasWithPreview => "Canvas",
            LayoutMode::FullPreviewWithCanvas => "Preview",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            LayoutMode::SplitScreen => "◧",
            LayoutMode::FullCanvasWithPreview => "▣",
            LayoutMode::FullPreviewWithCanvas => "◲",
        }
    }
}

/// Which content a pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Canvas,
    Preview,
}

/// Concrete placement of both panes inside an available area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub available: Rect,
    pub canvas: Rect,
    pub preview: Rect,
    /// The pane drawn on top as a small panel, if any
    pub floating: Option<Pane>,
}

impl Composition {
    /// Share of the available width given to the canvas
    pub fn canvas_fraction(&self) -> f32 {
        width_fraction(self.canvas, self.available)
    }

    /// Share of the available width given to the preview
    pub fn preview_fraction(&self) -> f32 {
        width_fraction(self.preview, self.available)
    }

    /// Area of the floating panel, which the pane underneath must not react to
    pub fn floating_rect(&self) -> Option<Rect> {
        self.floating.map(|pane| match pane {
            Pane::Canvas => self.canvas,
            Pane::Preview => self.preview,
        })
    }

    /// Whether a canvas press at `pos` should start a stroke
    pub fn accepts_canvas_input(&self, pos: Pos2) -> bool {
        if !self.canvas.contains(pos) {
            return false;
        }
        match self.floating {
            Some(Pane::Preview) => !self.preview.contains(pos),
            _ => true,
        }
    }
}

fn width_fraction(pane: Rect, available: Rect) -> f32 {
    if available.width() <= 0.0 {
        0.0
    } else {
        pane.width() / available.width()
    }
}

/// Arrangement of the workspace; lives as long as one workspace session.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    mode: LayoutMode,
    canvas_ratio: f32,
    floating_size: Vec2,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            canvas_ratio: DEFAULT_CANVAS_RATIO,
            floating_size: DEFAULT_FLOATING_SIZE,
        }
    }
}

impl LayoutState {
    pub fn new(canvas_ratio: f32, floating_size: Vec2) -> Self {
        let mut state = Self::default();
        if canvas_ratio.is_finite() {
            state.canvas_ratio = canvas_ratio.clamp(MIN_CANVAS_RATIO, MAX_CANVAS_RATIO);
        }
        if floating_size.x > 0.0 && floating_size.y > 0.0 {
            state.floating_size = floating_size;
        }
        state
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn canvas_ratio(&self) -> f32 {
        self.canvas_ratio
    }

    pub fn set_layout(&mut self, mode: LayoutMode) {
        if self.mode != mode {
            log::debug!("Layout {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Flip between split screen and full canvas. The full-preview mode
    /// falls back to split screen.
    pub fn toggle_layout(&mut self) {
        let next = match self.mode {
            LayoutMode::SplitScreen => LayoutMode::FullCanvasWithPreview,
            LayoutMode::FullCanvasWithPreview => LayoutMode::SplitScreen,
            LayoutMode::FullPreviewWithCanvas => LayoutMode::SplitScreen,
        };
        self.set_layout(next);
    }

    /// Grow or shrink the canvas share, saturating at the bounds
    pub fn adjust_canvas_ratio(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.canvas_ratio = (self.canvas_ratio + delta).clamp(MIN_CANVAS_RATIO, MAX_CANVAS_RATIO);
    }

    pub fn compose(&self, available: Rect) -> Composition {
        match self.mode {
            LayoutMode::SplitScreen => {
                let split_x = available.min.x + available.width() * self.canvas_ratio;
                let canvas = Rect::from_min_max(available.min, Pos2::new(split_x, available.max.y));
                let preview = Rect::from_min_max(Pos2::new(split_x, available.min.y), available.max);
                Composition { available, canvas, preview, floating: None }
            }
            LayoutMode::FullCanvasWithPreview => Composition {
                available,
                canvas: available,
                preview: self.floating_rect(available, Corner::BottomRight),
                floating: Some(Pane::Preview),
            },
            LayoutMode::FullPreviewWithCanvas => Composition {
                available,
                canvas: self.floating_rect(available, Corner::BottomLeft),
                preview: available,
                floating: Some(Pane::Canvas),
            },
        }
    }

    fn floating_rect(&self, available: Rect, corner: Corner) -> Rect {
        let inner = available.shrink(FLOATING_MARGIN);
        let size = Vec2::new(
            self.floating_size.x.min(inner.width().max(0.0)),
            self.floating_size.y.min(inner.height().max(0.0)),
        );
        let min = match corner {
            Corner::BottomRight => inner.max - size,
            Corner::BottomLeft => Pos2::new(inner.min.x, inner.max.y - size.y),
        };
        Rect::from_min_size(min, size)
    }
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    BottomLeft,
    BottomRight,
}
