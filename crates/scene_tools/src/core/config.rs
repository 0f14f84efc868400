//! # Unified Configuration System
//!
//! All tool settings live in one serde-friendly tree so a single `.toml` or
//! `.ron` file can configure logging, the scene exporter and the mesh
//! converter.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [export]
//! root_env_var = "BX_ROOT"
//! scene_subdir = "assets/scene"
//! extension = "scene"
//! default_material = "grey"
//! block_order = "CamerasFirst"
//! float_format = "Repr"
//! ```

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

// Re-export from the config module for compatibility
pub use crate::config::{Config, ConfigError};

/// Environment variable holding the content root by default
pub const DEFAULT_ROOT_ENV_VAR: &str = "BX_ROOT";

/// Order of camera and design blocks in an exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockOrder {
    /// Camera blocks, then spheres, then boxes
    #[default]
    CamerasFirst,
    /// Spheres, then boxes, then camera blocks
    DesignBlocksFirst,
}

/// Number formatting used for scene script values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloatFormat {
    /// Shortest round-trip form, integral values keep `.0` (`5.0`, `0.25`)
    #[default]
    Repr,
    /// Shortest form without a trailing `.0` (`5`, `0.25`)
    Compact,
}

impl FloatFormat {
    /// Format one value
    pub fn format(self, value: f32) -> String {
        match self {
            Self::Repr => format!("{value:?}"),
            Self::Compact => format!("{value}"),
        }
    }

    /// Format values separated by single spaces
    pub fn join(self, values: &[f32]) -> String {
        values
            .iter()
            .map(|v| self.format(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How the mesh converter sizes generated boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoxSizeRule {
    /// Uniform cube whose width, height and depth all equal the face area
    #[default]
    FaceArea,
}

/// # Logging Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Export Configuration
///
/// Controls where scene scripts are written and how their blocks look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Environment variable naming the content root
    pub root_env_var: String,
    /// Explicit content root, takes precedence over the environment
    pub root_override: Option<PathBuf>,
    /// Directory under the root that receives scene scripts
    pub scene_subdir: String,
    /// File extension of scene scripts
    pub extension: String,
    /// Material written for every design block
    pub default_material: String,
    /// Camera/design block ordering
    pub block_order: BlockOrder,
    /// Number formatting
    pub float_format: FloatFormat,
}

impl ExportConfig {
    /// Create a new export configuration
    pub fn new() -> Self {
        Self {
            root_env_var: DEFAULT_ROOT_ENV_VAR.to_string(),
            root_override: None,
            scene_subdir: "assets/scene".to_string(),
            extension: "scene".to_string(),
            default_material: "grey".to_string(),
            block_order: BlockOrder::default(),
            float_format: FloatFormat::default(),
        }
    }

    /// Set an explicit content root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root_override = Some(root.into());
        self
    }

    /// Set block ordering
    pub fn with_block_order(mut self, order: BlockOrder) -> Self {
        self.block_order = order;
        self
    }

    /// Set number formatting
    pub fn with_float_format(mut self, format: FloatFormat) -> Self {
        self.float_format = format;
        self
    }

    /// Set the material written for design blocks
    pub fn with_default_material(mut self, material: impl Into<String>) -> Self {
        self.default_material = material.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(format!("Invalid scene extension: '{}'", self.extension));
        }
        if self.default_material.is_empty() || self.default_material.contains('"') {
            return Err(format!("Invalid default material: '{}'", self.default_material));
        }
        if self.root_override.is_none() && self.root_env_var.is_empty() {
            return Err("Either root_override or root_env_var must be set".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Conversion Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Box sizing rule
    pub size_rule: BoxSizeRule,
}

/// # Complete Tools Configuration
///
/// Top-level configuration that encompasses every tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Scene export configuration
    pub export: ExportConfig,
    /// Mesh conversion configuration
    pub convert: ConvertConfig,
}

impl ToolsConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.export.validate()
    }
}

impl Config for ToolsConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_layout() {
        let config = ToolsConfig::default();
        assert_eq!(config.export.root_env_var, "BX_ROOT");
        assert_eq!(config.export.scene_subdir, "assets/scene");
        assert_eq!(config.export.extension, "scene");
        assert_eq!(config.export.default_material, "grey");
        assert_eq!(config.export.block_order, BlockOrder::CamerasFirst);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_float_formats() {
        assert_eq!(FloatFormat::Repr.format(5.0), "5.0");
        assert_eq!(FloatFormat::Repr.format(0.5), "0.5");
        assert_eq!(FloatFormat::Repr.format(-1.25), "-1.25");
        assert_eq!(FloatFormat::Compact.format(5.0), "5");
        assert_eq!(FloatFormat::Compact.format(0.5), "0.5");
        assert_eq!(FloatFormat::Repr.join(&[1.0, 2.0, 3.0]), "1.0 2.0 3.0");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ToolsConfig = toml::from_str(
            r#"
[logging]
level = "debug"

[export]
block_order = "DesignBlocksFirst"
"#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.export.block_order, BlockOrder::DesignBlocksFirst);
        assert_eq!(config.export.default_material, "grey");
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        let mut config = ExportConfig::new();
        config.extension = ".scene".to_string();
        assert!(config.validate().is_err());
    }
}
