use egui::{Color32, CursorIcon, Id, Rect, Response, Sense, Stroke, Ui, Vec2};

/// The draggable divider between canvas and preview in split-screen mode
pub struct SplitHandle {
    area: Rect,
    split_x: f32,
    width: f32,
}

impl SplitHandle {
    /// A divider at `split_x` spanning the height of `area`
    pub fn new(area: Rect, split_x: f32) -> Self {
        Self {
            area,
            split_x,
            width: 8.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(
            egui::pos2(self.split_x, self.area.center().y),
            Vec2::new(self.width, self.area.height()),
        )
    }

    /// Show the handle. The returned value is the drag distance as a share
    /// of the area's width, ready for `adjust_canvas_ratio`.
    pub fn show(&self, ui: &mut Ui) -> (Response, f32) {
        let rect = self.rect();
        let response = ui
            .interact(rect, Id::new("split_handle"), Sense::drag())
            .on_hover_cursor(CursorIcon::ResizeHorizontal);

        let color = if response.hovered() || response.dragged() {
            Color32::from_rgb(30, 120, 255)
        } else {
            Color32::from_gray(120)
        };
        ui.painter().line_segment(
            [egui::pos2(self.split_x, self.area.min.y), egui::pos2(self.split_x, self.area.max.y)],
            Stroke::new(2.0, color),
        );
        ui.painter()
            .rect_filled(Rect::from_center_size(rect.center(), Vec2::new(6.0, 40.0)), 3.0, color);

        let delta = if response.dragged() && self.area.width() > 0.0 {
            response.drag_delta().x / self.area.width()
        } else {
            0.0
        };
        (response, delta)
    }
}
