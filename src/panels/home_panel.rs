use egui::{Color32, Pos2, Rect, Sense, Vec2};

use crate::bitmap;
use crate::canvas::CanvasTransform;
use crate::collection::ProjectCollection;
use crate::export;
use crate::project::{Project, ProjectId};
use crate::texture_manager::TextureManager;

const CARD_SIZE: Vec2 = Vec2::new(180.0, 210.0);
const THUMBNAIL_SIZE: Vec2 = Vec2::new(164.0, 123.0);

pub const THUMBNAIL_SLOT_PREFIX: &str = "thumb/";

/// What the home screen asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Open(ProjectId),
}

/// UI state of the home screen that outlives a frame
#[derive(Debug, Default)]
pub struct HomeState {
    search: String,
    naming: Option<String>,
    renaming: Option<(ProjectId, String)>,
    rename_error: Option<String>,
    confirm_delete_all: bool,
    status: Option<String>,
    loaded: bool,
}

impl HomeState {
    /// Run the on-load maintenance again the next time the screen is shown
    pub fn reload(&mut self) {
        self.loaded = false;
    }
}

pub fn home_panel(
    state: &mut HomeState,
    collection: &ProjectCollection,
    textures: &mut TextureManager,
    ctx: &egui::Context,
) -> Option<HomeAction> {
    if !state.loaded {
        let removed = collection.remove_duplicate_ids();
        if removed > 0 {
            log::warn!("Removed {} projects with duplicate ids", removed);
        }
        state.loaded = true;
    }

    let mut action = None;

    egui::TopBottomPanel::top("home_top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("LingXian");
            ui.separator();
            ui.label("Search:");
            ui.text_edit_singleline(&mut state.search);
            if ui.button("＋ New project").clicked() {
                action = Some(HomeAction::Open(collection.create()));
            }
            if ui.button("New named…").clicked() {
                state.naming = Some(String::new());
                state.rename_error = None;
            }
            if ui
                .add_enabled(!collection.is_empty(), egui::Button::new("Delete all"))
                .clicked()
            {
                state.confirm_delete_all = true;
            }
        });
        if let Some(status) = &state.status {
            ui.label(status);
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        let projects = collection.search(&state.search);
        if projects.is_empty() {
            ui.centered_and_justified(|ui| {
                if state.search.trim().is_empty() {
                    ui.label("No projects yet. Create one to start sketching.");
                } else {
                    ui.label("No projects match the search.");
                }
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for project in &projects {
                    if let Some(card_action) = project_card(ui, state, collection, textures, project) {
                        action = Some(card_action);
                    }
                }
            });
        });
    });

    if let Some(id) = new_project_dialog(state, collection, ctx) {
        action = Some(HomeAction::Open(id));
    }
    rename_dialog(state, collection, ctx);
    delete_all_dialog(state, collection, textures, ctx);

    action
}

fn project_card(
    ui: &mut egui::Ui,
    state: &mut HomeState,
    collection: &ProjectCollection,
    textures: &mut TextureManager,
    project: &Project,
) -> Option<HomeAction> {
    let mut action = None;
    let id = project.id();

    ui.allocate_ui(CARD_SIZE, |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(CARD_SIZE.x - 16.0);

            let (rect, response) = ui.allocate_exact_size(THUMBNAIL_SIZE, Sense::click());
            paint_thumbnail(ui, rect, textures, project);
            if response.clicked() {
                action = Some(HomeAction::Open(id));
            }

            ui.horizontal(|ui| {
                let star = if project.is_favorite() { "★" } else { "☆" };
                if ui.small_button(star).clicked() {
                    if let Err(err) = collection.toggle_favorite(id) {
                        log::warn!("{}", err);
                    }
                }
                ui.label(egui::RichText::new(project.name()).strong());
            });
            ui.label(
                egui::RichText::new(format!("{} · {}", project.ai_style().display_name(), age(project.updated_at())))
                    .small()
                    .weak(),
            );

            ui.menu_button("⋯", |ui| {
                if ui.button("Open").clicked() {
                    action = Some(HomeAction::Open(id));
                    ui.close_menu();
                }
                if ui.button("Rename").clicked() {
                    state.renaming = Some((id, project.name().to_owned()));
                    state.rename_error = None;
                    ui.close_menu();
                }
                if ui.button("Duplicate").clicked() {
                    if let Err(err) = collection.duplicate(id) {
                        log::warn!("{}", err);
                    }
                    ui.close_menu();
                }
                if ui.button("Export").clicked() {
                    state.status = Some(match export::export_project(project) {
                        Ok(dir) => format!("Exported to {}", dir.display()),
                        Err(err) => format!("Export failed: {}", err),
                    });
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Delete").clicked() {
                    collection.delete(id);
                    textures.invalidate(&thumbnail_slot(id));
                    ui.close_menu();
                }
            });
        });
    });

    action
}

pub fn thumbnail_slot(id: ProjectId) -> String {
    format!("{}{}", THUMBNAIL_SLOT_PREFIX, id)
}

fn paint_thumbnail(ui: &egui::Ui, rect: Rect, textures: &mut TextureManager, project: &Project) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, Color32::from_gray(235));

    if project.generated_image_data().is_none() && project.canvas_data().is_none() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "✏",
            egui::FontId::proportional(32.0),
            Color32::GRAY,
        );
        return;
    }

    // Decoded only when the project changed since the last upload
    let slot = thumbnail_slot(project.id());
    let texture = textures.get_or_update(ui.ctx(), &slot, project.updated_at().to_bits(), || {
        match project.generated_image().or_else(|| project.canvas_image()) {
            Some(image) => bitmap::to_color_image(&image),
            None => egui::ColorImage::new([1, 1], Color32::WHITE),
        }
    });
    let [width, height] = textures.size(&slot).unwrap_or([1, 1]);
    let transform = CanvasTransform::new(rect, [width as u32, height as u32]);
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    painter.image(texture, transform.image_rect, uv, Color32::WHITE);
}

fn age(updated_at: f64) -> String {
    let seconds = (crate::util::time::current_time_secs() - updated_at).max(0.0) as u64;
    match seconds {
        0..=59 => "just now".to_owned(),
        60..=3599 => format!("{} min ago", seconds / 60),
        3600..=86_399 => format!("{} h ago", seconds / 3600),
        _ => format!("{} d ago", seconds / 86_400),
    }
}

/// Name-first project creation. Returns the new project once created.
fn new_project_dialog(state: &mut HomeState, collection: &ProjectCollection, ctx: &egui::Context) -> Option<ProjectId> {
    let name = state.naming.as_mut()?;
    let mut created = None;
    let mut close = false;

    egui::Window::new("New project")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label("Name:");
            ui.text_edit_singleline(name);
            if let Some(err) = &state.rename_error {
                ui.colored_label(Color32::RED, err);
            }
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    close = true;
                }
                if ui.button("Create").clicked() {
                    match collection.create_named(name) {
                        Ok(id) => {
                            created = Some(id);
                            close = true;
                        }
                        Err(err) => state.rename_error = Some(err.to_string()),
                    }
                }
            });
        });

    if close {
        state.naming = None;
        state.rename_error = None;
    }
    created
}

fn rename_dialog(state: &mut HomeState, collection: &ProjectCollection, ctx: &egui::Context) {
    let Some((id, name)) = &mut state.renaming else {
        return;
    };
    let id = *id;
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
                    match collection.rename(id, name) {
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

fn delete_all_dialog(
    state: &mut HomeState,
    collection: &ProjectCollection,
    textures: &mut TextureManager,
    ctx: &egui::Context,
) {
    if !state.confirm_delete_all {
        return;
    }

    egui::Window::new("Delete all projects?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(format!("This removes all {} projects and cannot be undone.", collection.len()));
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    state.confirm_delete_all = false;
                }
                if ui.button("Delete all").clicked() {
                    let removed = collection.delete_all();
                    textures.invalidate_prefix(THUMBNAIL_SLOT_PREFIX);
                    state.status = Some(format!("Deleted {} projects", removed));
                    state.confirm_delete_all = false;
                }
            });
        });
}
