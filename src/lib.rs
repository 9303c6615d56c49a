#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod bitmap;
pub mod canvas;
pub mod collection;
pub mod components;
pub mod config;
pub mod event;
pub mod export;
pub mod filter;
pub mod generation;
pub mod layout;
pub mod panels;
pub mod project;
pub mod renderer;
pub mod store;
pub mod stroke;
pub mod style;
pub mod texture_manager;
pub mod util;
pub mod widgets;
pub mod workspace;

pub use app::LingXianApp;
pub use canvas::DrawingSurface;
pub use collection::{CollectionError, ProjectCollection};
pub use config::Settings;
pub use event::{CanvasEvent, CanvasObserver};
pub use export::{ExportError, export_project, export_project_to};
pub use filter::{FilterError, FilterRegistry};
pub use generation::{GenerationMode, GenerationPreview, Generator};
pub use layout::{Composition, LayoutMode, LayoutState, Pane};
pub use project::{Project, ProjectId};
pub use renderer::Renderer;
pub use store::{ProjectStore, StoreError, StoreHandle};
pub use stroke::Stroke;
pub use style::AiStyle;
pub use workspace::{Workspace, WorkspaceError};
