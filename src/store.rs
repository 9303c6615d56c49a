//! The project store.
//!
//! An in-memory collection of [`Project`]s, optionally backed by a
//! `projects.json` file in a data directory. The store does not enforce id
//! uniqueness; the collection's maintenance pass removes duplicates.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::project::{Project, ProjectId};

pub const STORE_FILE_NAME: &str = "projects.json";

const STORE_FORMAT_VERSION: u32 = 1;

/// Errors that can occur during store persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to serialize projects: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access project store: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported store format version {0}")]
    UnsupportedVersion(u32),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to the store, cloned into every view that needs it
pub type StoreHandle = Arc<Mutex<ProjectStore>>;

#[derive(Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    projects: Vec<Project>,
}

#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
    /// Directory holding `projects.json`; `None` keeps everything in memory
    data_dir: Option<PathBuf>,
}

impl ProjectStore {
    /// A store that never touches the disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (creating if needed) the store kept in `data_dir`
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let path = data_dir.join(STORE_FILE_NAME);
        let projects = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let file: StoreFile = serde_json::from_str(&json)?;
            if file.version != STORE_FORMAT_VERSION {
                return Err(StoreError::UnsupportedVersion(file.version));
            }
            file.projects
        } else {
            Vec::new()
        };
        log::info!("Opened project store at {} ({} projects)", data_dir.display(), projects.len());

        Ok(Self {
            projects,
            data_dir: Some(data_dir),
        })
    }

    pub fn into_handle(self) -> StoreHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Records in storage order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn insert(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// First record with `id`
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id() == id)
    }

    /// Run `f` on the first record with `id`; false if there is none
    pub fn update<F: FnOnce(&mut Project)>(&mut self, id: ProjectId, f: F) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                f(project);
                true
            }
            None => false,
        }
    }

    /// Remove every record with `id`, returning how many were removed
    pub fn delete(&mut self, id: ProjectId) -> usize {
        let before = self.projects.len();
        self.projects.retain(|p| p.id() != id);
        before - self.projects.len()
    }

    /// Remove the record at a storage position
    pub fn delete_at(&mut self, index: usize) -> Option<Project> {
        (index < self.projects.len()).then(|| self.projects.remove(index))
    }

    pub fn delete_all(&mut self) -> usize {
        let count = self.projects.len();
        self.projects.clear();
        count
    }

    /// Most recently updated first; equal timestamps ordered by id
    pub fn fetch_sorted(&self) -> Vec<Project> {
        let mut projects = self.projects.clone();
        projects.sort_by(|a, b| {
            b.updated_at()
                .total_cmp(&a.updated_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        projects
    }

    /// Sorted like [`ProjectStore::fetch_sorted`], keeping only matches
    pub fn fetch_filtered<P: Fn(&Project) -> bool>(&self, predicate: P) -> Vec<Project> {
        let mut projects = self.fetch_sorted();
        projects.retain(|p| predicate(p));
        projects
    }

    /// Write the collection to disk. A no-op for in-memory stores.
    ///
    /// Written to a temporary file first and renamed over the old one, so a
    /// crash mid-write leaves the previous file intact.
    pub fn save(&self) -> StoreResult<()> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        fs::create_dir_all(dir)?;

        let file = StoreFile {
            version: STORE_FORMAT_VERSION,
            projects: self.projects.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let path = dir.join(STORE_FILE_NAME);
        let tmp_path = dir.join(format!("{}.tmp", STORE_FILE_NAME));
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        log::debug!("Saved {} projects to {}", self.projects.len(), path.display());
        Ok(())
    }

    /// Save, logging instead of returning failures
    pub fn save_or_log(&self) {
        if let Err(err) = self.save() {
            log::error!("Failed to save projects: {}", err);
        }
    }
}
