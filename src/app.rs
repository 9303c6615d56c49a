use crate::canvas::CANVAS_TEXTURE_SLOT;
use crate::collection::ProjectCollection;
use crate::config::Settings;
use crate::panels::{self, HomeAction, HomeState, PREVIEW_TEXTURE_SLOT, WorkspaceAction, WorkspaceViewState};
use crate::project::ProjectId;
use crate::store::{ProjectStore, StoreHandle};
use crate::texture_manager::TextureManager;
use crate::workspace::Workspace;

enum Screen {
    Home,
    Workspace {
        workspace: Workspace,
        view: WorkspaceViewState,
    },
}

enum Transition {
    Open(ProjectId),
    Home,
}

pub struct LingXianApp {
    settings: Settings,
    collection: ProjectCollection,
    textures: TextureManager,
    home: HomeState,
    screen: Screen,
}

impl LingXianApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load(cc.storage);
        let store = open_store(&settings);
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: Settings, store: StoreHandle) -> Self {
        Self {
            settings,
            collection: ProjectCollection::new(store),
            textures: TextureManager::new(),
            home: HomeState::default(),
            screen: Screen::Home,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn collection(&self) -> &ProjectCollection {
        &self.collection
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        match &self.screen {
            Screen::Workspace { workspace, .. } => Some(workspace),
            Screen::Home => None,
        }
    }

    pub fn open_project(&mut self, id: ProjectId) {
        self.close_workspace();
        match Workspace::open(id, self.collection.store().clone(), &self.settings) {
            Ok(workspace) => {
                // A fresh surface and preview restart their texture versions
                self.textures.invalidate(CANVAS_TEXTURE_SLOT);
                self.textures.invalidate(PREVIEW_TEXTURE_SLOT);
                let view = WorkspaceViewState::new(&workspace);
                self.screen = Screen::Workspace { workspace, view };
            }
            Err(err) => log::error!("Failed to open project: {}", err),
        }
    }

    pub fn close_workspace(&mut self) {
        if let Screen::Workspace { workspace, .. } = std::mem::replace(&mut self.screen, Screen::Home) {
            workspace.close();
            self.home.reload();
        }
    }
}

/// Open the store in the configured data directory, falling back to an
/// in-memory store so the app stays usable
fn open_store(settings: &Settings) -> StoreHandle {
    let store = match settings.resolved_data_dir() {
        Some(dir) => ProjectStore::open(&dir).unwrap_or_else(|err| {
            log::error!("Failed to open project store in {}: {}; projects will not be saved", dir.display(), err);
            ProjectStore::in_memory()
        }),
        None => {
            log::warn!("No data directory available; projects will not be saved");
            ProjectStore::in_memory()
        }
    };
    store.into_handle()
}

impl eframe::App for LingXianApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.save(storage);
        if let Screen::Workspace { workspace, .. } = &self.screen {
            workspace.save();
        }
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let transition = match &mut self.screen {
            Screen::Home => panels::home_panel(&mut self.home, &self.collection, &mut self.textures, ctx)
                .map(|HomeAction::Open(id)| Transition::Open(id)),
            Screen::Workspace { workspace, view } => panels::workspace_panel(view, workspace, &mut self.textures, ctx)
                .map(|WorkspaceAction::Close| Transition::Home),
        };

        match transition {
            Some(Transition::Open(id)) => self.open_project(id),
            Some(Transition::Home) => self.close_workspace(),
            None => {}
        }
    }
}
