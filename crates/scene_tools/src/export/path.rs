//! Output location of exported scene scripts
//!
//! `<root>/<scene_subdir>/<scene base name>.<extension>`, where the base name
//! is the scene's short file name up to its first `.`.

use std::path::{Path, PathBuf};

use crate::core::config::ExportConfig;
use crate::error::IoError;

/// Base name of a scene file (`level01.v2.mb` -> `level01`)
///
/// Directory components are ignored. Returns `None` when nothing is left.
pub fn scene_base_name(file_name: &str) -> Option<&str> {
    let short = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);
    short.split('.').next().filter(|base| !base.is_empty())
}

/// Content root: explicit override first, then the configured environment variable
pub fn resolve_root(config: &ExportConfig) -> Result<PathBuf, IoError> {
    if let Some(root) = &config.root_override {
        return Ok(root.clone());
    }
    std::env::var_os(&config.root_env_var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| IoError::MissingRoot(config.root_env_var.clone()))
}

/// Full output path for a scene
pub fn scene_output_path(config: &ExportConfig, scene_file_name: Option<&str>) -> Result<PathBuf, IoError> {
    let base = scene_file_name
        .and_then(scene_base_name)
        .ok_or(IoError::UnsavedScene)?;
    let root = resolve_root(config)?;

    let mut path = root.join(&config.scene_subdir).join(base);
    path.set_extension(&config.extension);
    Ok(path)
}
