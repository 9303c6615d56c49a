use image::Rgba;
use lingxian::bitmap;
use lingxian::export::METADATA_FILE_NAME;
use lingxian::{AiStyle, ExportError, Project, export_project_to};
use std::fs;

fn finished_project(name: &str) -> Project {
    let mut project = Project::new(name);
    project.set_canvas_image(&bitmap::filled(8, 6, Rgba([0, 0, 0, 255])));
    project.set_generated_image(&bitmap::filled(8, 6, Rgba([200, 100, 50, 255])));
    project.set_style(AiStyle::OilPainting);
    project
}

#[test]
fn test_export_writes_two_pngs_and_metadata() {
    let root = tempfile::tempdir().unwrap();
    let mut project = finished_project("Harbor");
    project.set_prompt(Some("boats at dawn".to_owned()));

    let dir = export_project_to(&project, root.path()).unwrap();
    assert!(dir.starts_with(root.path()));

    let mut files: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["Harbor_canvas.png", "Harbor_generated.png", METADATA_FILE_NAME]);

    let canvas = bitmap::decode(&fs::read(dir.join("Harbor_canvas.png")).unwrap()).unwrap();
    assert_eq!(canvas, project.canvas_image().unwrap());

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(METADATA_FILE_NAME)).unwrap()).unwrap();
    assert_eq!(metadata["name"], "Harbor");
    assert_eq!(metadata["prompt"], "boats at dawn");
    assert_eq!(metadata["aiStyle"], "oilPainting");
    assert!((metadata["createdAt"].as_f64().unwrap() - project.created_at()).abs() < 1e-3);
    assert!((metadata["updatedAt"].as_f64().unwrap() - project.updated_at()).abs() < 1e-3);
}

#[test]
fn test_absent_prompt_exported_as_empty_string() {
    let root = tempfile::tempdir().unwrap();
    let dir = export_project_to(&finished_project("Quiet"), root.path()).unwrap();

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(METADATA_FILE_NAME)).unwrap()).unwrap();
    assert_eq!(metadata["prompt"], "");
}

#[test]
fn test_each_export_gets_its_own_directory() {
    let root = tempfile::tempdir().unwrap();
    let project = finished_project("Twice");
    let first = export_project_to(&project, root.path()).unwrap();
    let second = export_project_to(&project, root.path()).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_unsafe_names_are_sanitized() {
    let root = tempfile::tempdir().unwrap();
    let dir = export_project_to(&finished_project("a/b"), root.path()).unwrap();
    assert!(dir.join("a_b_canvas.png").exists());
}

#[test]
fn test_missing_generated_image_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let mut project = Project::new("Half");
    project.set_canvas_image(&bitmap::filled(2, 2, bitmap::WHITE));

    let err = export_project_to(&project, root.path()).unwrap_err();
    assert!(matches!(err, ExportError::MissingImages));
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}
