//! # Scene Tools
//!
//! Content pipeline tools for the bx engine, written against a minimal scene
//! graph interface so they can run inside a DCC host or from the command line.
//!
//! ## Features
//!
//! - **Scene Export**: Spheres, boxes and leaf cameras written as `@dblock` /
//!   `@camera` scene script blocks under `<root>/assets/scene/`
//! - **Face-to-Box Conversion**: One area-sized cube per mesh face, aligned to
//!   the face's binormal/normal/tangent frame
//! - **Scene Script Reading**: The same files parsed back into documents
//! - **Command Registry**: Tools exposed as named host commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_tools::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = SceneSnapshot::load_scene("level01.ron")?;
//!
//!     let mut registry = CommandRegistry::new();
//!     initialize_plugin(&mut registry, &ToolsConfig::default())?;
//!     registry.invoke(EXPORT_SCENE_COMMAND, &mut scene)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared configuration
pub mod core;

pub mod foundation;
pub mod config;
pub mod error;
pub mod scene;
pub mod assets;
pub mod export;
pub mod convert;
pub mod script;
pub mod plugin;

#[cfg(test)]
mod tests;

pub use error::{IoError, ToolError, ToolResult};

/// Common imports for tool users
pub mod prelude {
    pub use crate::{
        IoError, ToolError, ToolResult,
        assets::{ObjLoader, SceneSnapshot},
        convert::{ConversionReport, FaceToBoxConverter},
        core::config::{BlockOrder, Config, ConvertConfig, ExportConfig, FloatFormat, ToolsConfig},
        export::{ExportReport, SceneDocument, SceneSerializer},
        foundation::math::{Transform, Vec3},
        plugin::{
            initialize_plugin, uninitialize_plugin, Command, CommandOutput, CommandRegistry,
            EXPORT_SCENE_COMMAND, MESH_TO_BOXES_COMMAND,
        },
        scene::{InMemoryScene, NodeKind, SceneHost, SceneReader, SceneWriter, Space},
        script::SceneScriptReader,
    };
}
