use egui::{Color32, Pos2, Rect, Vec2};
use std::time::Instant;

use crate::bitmap;
use crate::canvas::CanvasTransform;
use crate::components::layout_switcher;
use crate::layout::{Composition, Pane};
use crate::style::AiStyle;
use crate::texture_manager::TextureManager;
use crate::widgets::SplitHandle;
use crate::workspace::Workspace;

pub const PREVIEW_TEXTURE_SLOT: &str = "preview";

/// What the workspace screen asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceAction {
    Close,
}

/// Text buffers and dialogs of the workspace screen
#[derive(Debug, Default)]
pub struct WorkspaceViewState {
    prompt: String,
    renaming: Option<String>,
    rename_error: Option<String>,
    status: Option<String>,
}

impl WorkspaceViewState {
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            prompt: workspace.prompt().to_owned(),
            ..Default::default()
        }
    }
}

pub fn workspace_panel(
    state: &mut WorkspaceViewState,
    workspace: &mut Workspace,
    textures: &mut TextureManager,
    ctx: &egui::Context,
) -> Option<WorkspaceAction> {
    let mut action = None;

    egui::TopBottomPanel::top("workspace_top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("← Projects").clicked() {
                action = Some(WorkspaceAction::Close);
            }
            ui.separator();
            ui.strong(workspace.name());
            if ui.small_button("✏").on_hover_text("Rename").clicked() {
                state.renaming = Some(workspace.name().to_owned());
                state.rename_error = None;
            }
            ui.separator();
            workspace.surface_mut().renderer_mut().render_brush_controls(ui);
            if ui.button("Clear").clicked() {
                workspace.clear_canvas();
            }
            ui.separator();
            if let Some(mode) = layout_switcher(ui, workspace.layout().mode()) {
                workspace.layout_mut().set_layout(mode);
            }
            if ui.button("⇄").on_hover_text("Toggle layout").clicked() {
                workspace.layout_mut().toggle_layout();
            }
            ui.separator();
            if ui.button("Export").clicked() {
                state.status = Some(match workspace.export() {
                    Ok(dir) => format!("Exported to {}", dir.display()),
                    Err(err) => format!("Export failed: {}", err),
                });
            }
        });
        if let Some(status) = &state.status {
            ui.label(status);
        }
    });

    egui::TopBottomPanel::bottom("generation_controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("Style:");
            let current = workspace.style();
            for style in AiStyle::ALL {
                if ui.selectable_label(style == current, style.display_name()).clicked() && style != current {
                    workspace.set_style(style);
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label("Prompt:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.prompt)
                    .hint_text("Describe the picture")
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                workspace.set_prompt(state.prompt.clone());
            }
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();
        let composition = workspace.layout().compose(available);
        show_composition(ui, workspace, textures, &composition);
    });

    rename_dialog(state, workspace, ctx);

    if let Some(remaining) = workspace.tick(Instant::now()) {
        ctx.request_repaint_after(remaining);
    }

    action
}

fn show_composition(ui: &mut egui::Ui, workspace: &mut Workspace, textures: &mut TextureManager, composition: &Composition) {
    // The floating pane is drawn last so it sits on top
    if composition.floating == Some(Pane::Canvas) {
        preview_pane(ui, composition.preview, workspace, textures);
        let _ = workspace.surface_mut().ui(ui, composition, textures);
    } else {
        let _ = workspace.surface_mut().ui(ui, composition, textures);
        preview_pane(ui, composition.preview, workspace, textures);
    }

    match composition.floating_rect() {
        Some(rect) => floating_border(ui, rect),
        None => {
            let (_, delta) = SplitHandle::new(composition.available, composition.canvas.max.x).show(ui);
            if delta != 0.0 {
                workspace.layout_mut().adjust_canvas_ratio(delta);
            }
        }
    }
}

fn floating_border(ui: &egui::Ui, rect: Rect) {
    ui.painter()
        .rect_stroke(rect, 6.0, egui::Stroke::new(2.0, Color32::from_gray(90)));
}

fn preview_pane(ui: &egui::Ui, rect: Rect, workspace: &Workspace, textures: &mut TextureManager) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::from_gray(245));

    let preview = workspace.preview();
    match preview.output() {
        Some(output) => {
            let texture = textures.get_or_update(ui.ctx(), PREVIEW_TEXTURE_SLOT, preview.completed(), || {
                bitmap::to_color_image(output)
            });
            let transform = CanvasTransform::new(rect, [output.width(), output.height()]);
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture, transform.image_rect, uv, Color32::WHITE);
        }
        None if !preview.is_generating() => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Draw something to see it restyled",
                egui::FontId::proportional(14.0),
                Color32::GRAY,
            );
        }
        None => {}
    }

    if preview.is_generating() {
        let badge = Rect::from_min_size(rect.left_top() + Vec2::splat(8.0), Vec2::new(110.0, 24.0));
        painter.rect_filled(badge, 4.0, Color32::from_black_alpha(160));
        painter.text(
            badge.center(),
            egui::Align2::CENTER_CENTER,
            "Generating…",
            egui::FontId::proportional(13.0),
            Color32::WHITE,
        );
    }
}

fn rename_dialog(state: &mut WorkspaceViewState, workspace: &mut Workspace, ctx: &egui::Context) {
    let Some(name) = &mut state.renaming else {
        return;
    };
    let mut close = false;

    egui::Window::new("Rename project")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.text_edit_singleline(name);
            if let Some(err) = &state.rename_error {
                ui.colored_label(Color32::RED, err);
            }
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    close = true;
                }
                if ui.button("Rename").clicked() {
                    match workspace.rename(name) {
                        Ok(()) => close = true,
                        Err(err) => state.rename_error = Some(err.to_string()),
                    }
                }
            });
        });

    if close {
        state.renaming = None;
        state.rename_error = None;
    }
}
