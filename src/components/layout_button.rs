use eframe::egui;
use crate::layout::LayoutMode;

/// One entry of the layout switcher: the mode's glyph, highlighted when it
/// is the current mode.
pub struct LayoutButton {
    pub mode: LayoutMode,
    pub selected: bool,
}

impl LayoutButton {
    pub fn new(mode: LayoutMode, selected: bool) -> Self {
        Self { mode, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246)
            } else if response.hovered() {
                egui::Color32::from_gray(70)
            } else {
                egui::Color32::from_gray(50)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.mode.icon(),
                egui::FontId::proportional(20.0),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.mode.display_name())
    }
}

/// The row of layout buttons. Returns the mode the user picked, if any.
pub fn layout_switcher(ui: &mut egui::Ui, current: LayoutMode) -> Option<LayoutMode> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for mode in LayoutMode::ALL {
            if LayoutButton::new(mode, mode == current).show(ui).clicked() {
                picked = Some(mode);
            }
        }
    });
    picked
}
