//! One open project: the drawing surface, the generation preview and the
//! layout they share, kept in sync with the stored project.
//!
//! Every drawing-surface event and every completed generation is written
//! straight back to the store. Leaving the workspace saves once more.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::bitmap::{self, BitmapRef};
use crate::canvas::DrawingSurface;
use crate::config::Settings;
use crate::event::CanvasObserver;
use crate::export::{self, ExportError};
use crate::generation::GenerationPreview;
use crate::layout::LayoutState;
use crate::project::{Project, ProjectId};
use crate::store::StoreHandle;
use crate::style::AiStyle;

/// Size of the blank bitmap a cleared canvas starts from
pub const CLEARED_CANVAS_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("No project with id {0}")]
    ProjectNotFound(ProjectId),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// The working copy of the bound project. Receives drawing-surface events
/// and writes them through to the store.
struct ProjectBinding {
    project_id: ProjectId,
    store: StoreHandle,
    name: String,
    canvas_image: Option<BitmapRef>,
    generated_image: Option<BitmapRef>,
    drawing_data: Option<Vec<u8>>,
    prompt: String,
    style: AiStyle,
}

impl ProjectBinding {
    fn from_project(project: &Project, store: StoreHandle) -> Self {
        Self {
            project_id: project.id(),
            store,
            name: project.name().to_owned(),
            canvas_image: project.canvas_image().map(Arc::new),
            generated_image: project.generated_image().map(Arc::new),
            drawing_data: project.drawing_data().map(<[u8]>::to_vec),
            prompt: project.prompt().unwrap_or_default().to_owned(),
            style: project.ai_style(),
        }
    }

    /// Write the working copy to the project and flush the store
    fn persist(&self) {
        let mut store = self.store.lock();
        let found = store.update(self.project_id, |project| {
            if let Some(image) = &self.canvas_image {
                project.set_canvas_image(image);
            }
            if let Some(image) = &self.generated_image {
                project.set_generated_image(image);
            }
            project.set_drawing_data(self.drawing_data.clone());
            project.set_prompt((!self.prompt.is_empty()).then(|| self.prompt.clone()));
            project.set_style(self.style);
        });
        if !found {
            log::warn!("Project {} is gone, changes not saved", self.project_id);
            return;
        }
        store.save_or_log();
    }

    fn take_canvas(&mut self, image: BitmapRef, strokes: Vec<u8>) {
        self.canvas_image = Some(image);
        self.drawing_data = Some(strokes);
        self.persist();
    }
}

impl CanvasObserver for ProjectBinding {
    fn on_stroke_changed(&mut self, image: BitmapRef, strokes: Vec<u8>) {
        self.take_canvas(image, strokes);
    }

    fn on_tool_session_end(&mut self, image: BitmapRef, strokes: Vec<u8>) {
        self.take_canvas(image, strokes);
    }
}

pub struct Workspace {
    binding: ProjectBinding,
    layout: LayoutState,
    surface: DrawingSurface,
    preview: GenerationPreview,
    is_new: bool,
    closed: bool,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("project_id", &self.binding.project_id)
            .field("layout", &self.layout)
            .field("surface", &self.surface)
            .field("generating", &self.preview.is_generating())
            .finish()
    }
}

impl Workspace {
    /// Bind the project `project_id` from `store`
    pub fn open(project_id: ProjectId, store: StoreHandle, settings: &Settings) -> Result<Self, WorkspaceError> {
        let project = store
            .lock()
            .get(project_id)
            .cloned()
            .ok_or(WorkspaceError::ProjectNotFound(project_id))?;
        let binding = ProjectBinding::from_project(&project, store);

        let mut surface = DrawingSurface::new(settings.canvas_size);
        surface.load(
            binding.drawing_data.as_deref(),
            binding.canvas_image.as_ref().map(|image| image.as_ref().clone()),
        );

        let mut preview = GenerationPreview::new(settings.generator());
        preview.set_output(binding.generated_image.clone());

        log::info!("Opened workspace for {} ({})", project.name(), project_id);
        Ok(Self {
            binding,
            layout: settings.layout_state(),
            surface,
            preview,
            is_new: project.is_new(),
            closed: false,
        })
    }

    pub fn project_id(&self) -> ProjectId {
        self.binding.project_id
    }

    pub fn name(&self) -> &str {
        &self.binding.name
    }

    /// The project had neither bitmap when it was opened
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutState {
        &mut self.layout
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }

    pub fn preview(&self) -> &GenerationPreview {
        &self.preview
    }

    pub fn canvas_image(&self) -> Option<&BitmapRef> {
        self.binding.canvas_image.as_ref()
    }

    pub fn generated_image(&self) -> Option<&BitmapRef> {
        self.binding.generated_image.as_ref()
    }

    pub fn drawing_data(&self) -> Option<&[u8]> {
        self.binding.drawing_data.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.binding.prompt
    }

    pub fn style(&self) -> AiStyle {
        self.binding.style
    }

    /// Per-frame upkeep: hand surface events to the project, start a
    /// generation if the inputs changed, and collect a finished one.
    ///
    /// Returns how long until the in-flight generation completes, if any.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        self.surface.dispatch_events(&mut self.binding);

        self.preview.observe(
            self.binding.canvas_image.as_ref(),
            self.binding.style,
            &self.binding.prompt,
            now,
        );
        if let Some(output) = self.preview.poll(now) {
            self.binding.generated_image = Some(output);
            self.binding.persist();
        }
        self.preview.remaining(now)
    }

    /// Write the working copy back to the store
    pub fn save(&self) {
        self.binding.persist();
    }

    /// Start over with a blank canvas
    pub fn clear_canvas(&mut self) {
        self.surface.reset();
        self.surface.dispatch_events(&mut self.binding);

        let blank = bitmap::filled(CLEARED_CANVAS_SIZE, CLEARED_CANVAS_SIZE, bitmap::WHITE);
        self.binding.canvas_image = Some(Arc::new(blank));
        self.binding.drawing_data = None;
        self.binding.persist();
        log::info!("Cleared canvas of {}", self.binding.project_id);
    }

    pub fn rename(&mut self, name: &str) -> Result<(), WorkspaceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        let mut store = self.binding.store.lock();
        if !store.update(self.binding.project_id, |project| project.rename(name)) {
            return Err(WorkspaceError::ProjectNotFound(self.binding.project_id));
        }
        store.save_or_log();
        self.binding.name = name.to_owned();
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.binding.prompt = prompt.into();
        self.binding.persist();
    }

    pub fn set_style(&mut self, style: AiStyle) {
        self.binding.style = style;
        self.binding.persist();
    }

    /// Save, then export the stored project
    pub fn export(&self) -> Result<PathBuf, WorkspaceError> {
        self.binding.persist();
        let project = self
            .binding
            .store
            .lock()
            .get(self.binding.project_id)
            .cloned()
            .ok_or(WorkspaceError::ProjectNotFound(self.binding.project_id))?;
        Ok(export::export_project(&project)?)
    }

    /// Leave the workspace, saving one last time
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.surface.cancel_stroke();
        self.surface.dispatch_events(&mut self.binding);
        self.binding.persist();
        log::info!("Closed workspace for {}", self.binding.project_id);
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProjectStore;

    fn open_new() -> (Workspace, StoreHandle) {
        let store = ProjectStore::in_memory().into_handle();
        let project = Project::new("Sketch");
        let id = project.id();
        store.lock().insert(project);
        let workspace = Workspace::open(id, store.clone(), &Settings::default()).unwrap();
        (workspace, store)
    }

    #[test]
    fn test_open_unknown_project() {
        let store = ProjectStore::in_memory().into_handle();
        let result = Workspace::open(uuid::Uuid::new_v4(), store, &Settings::default());
        assert!(matches!(result, Err(WorkspaceError::ProjectNotFound(_))));
    }

    #[test]
    fn test_rename_rejects_blank() {
        let (mut workspace, store) = open_new();
        assert!(matches!(workspace.rename("   "), Err(WorkspaceError::EmptyName)));
        assert_eq!(store.lock().get(workspace.project_id()).unwrap().name(), "Sketch");
    }

    #[test]
    fn test_clear_canvas_saves_blank_bitmap() {
        let (mut workspace, store) = open_new();
        workspace.clear_canvas();

        let project = store.lock().get(workspace.project_id()).cloned().unwrap();
        let canvas = project.canvas_image().unwrap();
        assert_eq!(canvas.dimensions(), (CLEARED_CANVAS_SIZE, CLEARED_CANVAS_SIZE));
        assert!(project.drawing_data().is_none());
    }
}
