//! Error types shared by the export, conversion and plugin layers

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::script::ScriptError;

/// Result alias used throughout the crate
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that abort a tool invocation
///
/// Every variant is terminal for the current command: nothing is retried
/// and no partial result is reported.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Expected scene linkage is missing (shape without transform, etc.)
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// File output failed or no output location could be derived
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// A mesh geometry query failed
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Nothing selected, or the selection is not mesh geometry
    #[error("Selection error: {0}")]
    Selection(String),

    /// Command registration or lookup failed
    #[error("Registration error: {0}")]
    Registration(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene script could not be read
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

impl ToolError {
    /// Build a resolution error for a node
    pub fn resolution(node: &str, what: impl std::fmt::Display) -> Self {
        Self::Resolution(format!("'{node}': {what}"))
    }

    /// Whether this is an IO failure
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// File output failures
#[derive(Error, Debug)]
pub enum IoError {
    /// The scene has no file name, so no output name can be derived
    #[error("scene has never been saved")]
    UnsavedScene,

    /// The content root is not configured
    #[error("content root not set (environment variable {0})")]
    MissingRoot(String),

    /// Writing the output file failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
