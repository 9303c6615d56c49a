mod home_panel;
mod workspace_panel;

pub use home_panel::{HomeAction, HomeState, THUMBNAIL_SLOT_PREFIX, home_panel, thumbnail_slot};
pub use workspace_panel::{PREVIEW_TEXTURE_SLOT, WorkspaceAction, WorkspaceViewState, workspace_panel};
