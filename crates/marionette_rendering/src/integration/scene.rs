//! Model directory resolution.

use std::fs;
use std::path::{Path, PathBuf};

use marionette_shared::{SceneLoadError, MODEL_MANIFEST_SUFFIX};

/// Where a model's assets live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelLocation {
    /// Asset directory.
    pub directory: PathBuf,
    /// Manifest file name inside the directory.
    pub manifest: String,
}

/// Validates a model path and derives its manifest name.
///
/// The manifest is named after the directory: `models/Hiyori` resolves to
/// `models/Hiyori/Hiyori.model3.json`.
///
/// # Errors
///
/// [`SceneLoadError::EmptyPath`] for an empty path,
/// [`SceneLoadError::NotADirectory`] if it does not name a directory.
pub fn resolve_model(model_path: &str) -> Result<ModelLocation, SceneLoadError> {
    if model_path.is_empty() {
        return Err(SceneLoadError::EmptyPath);
    }
    let directory = PathBuf::from(model_path);
    if !directory.is_dir() {
        return Err(SceneLoadError::NotADirectory { path: directory });
    }

    let name = directory_name(&directory)
        .or_else(|| fs::canonicalize(&directory).ok().and_then(|p| directory_name(&p)))
        .unwrap_or_default();

    Ok(ModelLocation {
        manifest: format!("{name}{MODEL_MANIFEST_SUFFIX}"),
        directory,
    })
}

fn directory_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
