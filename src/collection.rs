use std::collections::HashSet;
use thiserror::Error;

use crate::project::{Project, ProjectId};
use crate::store::StoreHandle;

/// Prefix of generated names for projects created without one
pub const UNNAMED_PREFIX: &str = "Untitled";

pub const COPY_SUFFIX: &str = " copy";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("No project with id {0}")]
    NotFound(ProjectId),
}

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Operations the home screen performs on the set of projects.
///
/// Every mutation is flushed to the store straight away; a failed flush is
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ProjectCollection {
    store: StoreHandle,
}

impl ProjectCollection {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn get(&self, id: ProjectId) -> Option<Project> {
        self.store.lock().get(id).cloned()
    }

    /// All projects, most recently updated first
    pub fn list(&self) -> Vec<Project> {
        self.store.lock().fetch_sorted()
    }

    /// Projects whose name contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<Project> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.list();
        }
        self.store
            .lock()
            .fetch_filtered(|p| p.name().to_lowercase().contains(&query))
    }

    /// `Untitled` for the first one, then `Untitled N` where N counts the
    /// existing names carrying the prefix
    pub fn next_unnamed_name(&self) -> String {
        let count = self
            .store
            .lock()
            .projects()
            .iter()
            .filter(|p| p.name().starts_with(UNNAMED_PREFIX))
            .count();
        if count == 0 {
            UNNAMED_PREFIX.to_owned()
        } else {
            format!("{} {}", UNNAMED_PREFIX, count)
        }
    }

    /// Create a project with a generated name
    pub fn create(&self) -> ProjectId {
        let name = self.next_unnamed_name();
        self.insert(Project::new(name))
    }

    pub fn create_named(&self, name: &str) -> CollectionResult<ProjectId> {
        let name = validate_name(name)?;
        Ok(self.insert(Project::new(name)))
    }

    fn insert(&self, project: Project) -> ProjectId {
        let id = project.id();
        log::info!("Created project {} ({})", project.name(), id);
        let mut store = self.store.lock();
        store.insert(project);
        store.save_or_log();
        id
    }

    pub fn rename(&self, id: ProjectId, name: &str) -> CollectionResult<()> {
        let name = validate_name(name)?;
        let mut store = self.store.lock();
        if !store.update(id, |p| p.rename(name)) {
            return Err(CollectionError::NotFound(id));
        }
        store.save_or_log();
        Ok(())
    }

    /// Copy a project under a new id, named `"<name> copy"`
    pub fn duplicate(&self, id: ProjectId) -> CollectionResult<ProjectId> {
        let mut store = self.store.lock();
        let source = store.get(id).ok_or(CollectionError::NotFound(id))?;
        let copy = Project::duplicate_of(source, format!("{}{}", source.name(), COPY_SUFFIX));
        let copy_id = copy.id();
        log::info!("Duplicated project {} as {}", id, copy_id);
        store.insert(copy);
        store.save_or_log();
        Ok(copy_id)
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&self, id: ProjectId) -> CollectionResult<bool> {
        let mut store = self.store.lock();
        let project = store.get_mut(id).ok_or(CollectionError::NotFound(id))?;
        project.toggle_favorite();
        let favorite = project.is_favorite();
        store.save_or_log();
        Ok(favorite)
    }

    pub fn delete(&self, id: ProjectId) -> usize {
        let mut store = self.store.lock();
        let removed = store.delete(id);
        if removed > 0 {
            log::info!("Deleted project {}", id);
            store.save_or_log();
        }
        removed
    }

    pub fn delete_all(&self) -> usize {
        let mut store = self.store.lock();
        let removed = store.delete_all();
        log::info!("Deleted all {} projects", removed);
        store.save_or_log();
        removed
    }

    /// Keep the first record of each id and drop the rest.
    ///
    /// Returns how many records were removed. When the store is busy the
    /// pass is skipped and reports zero.
    pub fn remove_duplicate_ids(&self) -> usize {
        let Some(mut store) = self.store.try_lock() else {
            log::warn!("Project store busy, skipping duplicate scan");
            return 0;
        };

        let mut seen = HashSet::new();
        let duplicates: Vec<usize> = store
            .projects()
            .iter()
            .enumerate()
            .filter(|(_, p)| !seen.insert(p.id()))
            .map(|(index, _)| index)
            .collect();

        // Back to front so earlier indices stay valid
        for &index in duplicates.iter().rev() {
            store.delete_at(index);
        }
        if !duplicates.is_empty() {
            log::info!("Removed {} duplicate projects", duplicates.len());
            store.save_or_log();
        }
        duplicates.len()
    }
}

fn validate_name(name: &str) -> CollectionResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(CollectionError::EmptyName)
    } else {
        Ok(name)
    }
}
