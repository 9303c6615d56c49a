//! Export a project as two PNG files plus a JSON metadata file in a fresh
//! temporary directory.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::bitmap;
use crate::project::Project;

pub const METADATA_FILE_NAME: &str = "metadata.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no project images to export")]
    MissingImages,

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write metadata: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportMetadata<'a> {
    name: &'a str,
    created_at: f64,
    updated_at: f64,
    prompt: &'a str,
    ai_style: &'a str,
}

/// Export into a new directory under the OS temp dir
pub fn export_project(project: &Project) -> Result<PathBuf, ExportError> {
    export_project_to(project, &std::env::temp_dir())
}

/// Export into a new directory `<root>/<uuid>/`, returning its path
pub fn export_project_to(project: &Project, root: &Path) -> Result<PathBuf, ExportError> {
    let (Some(canvas), Some(generated)) = (project.canvas_data(), project.generated_image_data()) else {
        return Err(ExportError::MissingImages);
    };
    // Re-encode so the files are PNG whatever the stored encoding
    let canvas = bitmap::decode(canvas)?;
    let generated = bitmap::decode(generated)?;

    let dir = root.join(Uuid::new_v4().to_string());
    fs::create_dir_all(&dir)?;

    let stem = file_stem(project.name());
    fs::write(dir.join(format!("{}_canvas.png", stem)), bitmap::encode_png(&canvas)?)?;
    fs::write(dir.join(format!("{}_generated.png", stem)), bitmap::encode_png(&generated)?)?;

    let metadata = ExportMetadata {
        name: project.name(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
        prompt: project.prompt().unwrap_or_default(),
        ai_style: project.ai_style().as_str(),
    };
    fs::write(dir.join(METADATA_FILE_NAME), serde_json::to_string_pretty(&metadata)?)?;

    log::info!("Exported project {} to {}", project.id(), dir.display());
    Ok(dir)
}

/// Project name made safe to use as part of a file name
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "project".to_owned()
    } else {
        stem
    }
}
