use lingxian::store::STORE_FILE_NAME;
use lingxian::{AiStyle, Project, ProjectCollection, ProjectStore, StoreError};
use std::fs;

#[test]
fn test_projects_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let collection = ProjectCollection::new(ProjectStore::open(dir.path()).unwrap().into_handle());
        let id = collection.create_named("Persistent").unwrap();
        collection.store().lock().update(id, |p| p.set_style(AiStyle::Cartoon));
        collection.toggle_favorite(id).unwrap();
        id
    };

    let store = ProjectStore::open(dir.path()).unwrap();
    let project = store.get(id).unwrap();
    assert_eq!(project.name(), "Persistent");
    assert_eq!(project.ai_style(), AiStyle::Cartoon);
    assert!(project.is_favorite());
}

#[test]
fn test_open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = ProjectStore::open(&nested).unwrap();
    assert!(store.is_empty());
    assert!(nested.is_dir());
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ProjectStore::open(dir.path()).unwrap();
    store.insert(Project::new("One"));
    store.save().unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![STORE_FILE_NAME]);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(STORE_FILE_NAME), "{ not json").unwrap();
    assert!(matches!(ProjectStore::open(dir.path()), Err(StoreError::SerializationError(_))));
}

#[test]
fn test_unknown_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(STORE_FILE_NAME), r#"{"version": 99, "projects": []}"#).unwrap();
    assert!(matches!(ProjectStore::open(dir.path()), Err(StoreError::UnsupportedVersion(99))));
}

#[test]
fn test_duplicate_ids_removed_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::new("Twin");
    {
        let mut store = ProjectStore::open(dir.path()).unwrap();
        store.insert(project.clone());
        store.insert(project.clone());
        store.save().unwrap();
    }

    let collection = ProjectCollection::new(ProjectStore::open(dir.path()).unwrap().into_handle());
    assert_eq!(collection.remove_duplicate_ids(), 1);

    let reopened = ProjectStore::open(dir.path()).unwrap();
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_open_clamps_updated_before_created() {
    let dir = tempfile::tempdir().unwrap();
    let id = uuid::Uuid::new_v4();
    let json = format!(
        r#"{{"version": 1, "projects": [{{"id": "{id}", "name": "Skewed", "createdAt": 2000.0, "updatedAt": 1000.0}}]}}"#
    );
    fs::write(dir.path().join(STORE_FILE_NAME), json).unwrap();

    let store = ProjectStore::open(dir.path()).unwrap();
    let project = store.get(id).unwrap();
    assert_eq!(project.created_at(), 2000.0);
    assert!(project.updated_at() >= project.created_at());
}
