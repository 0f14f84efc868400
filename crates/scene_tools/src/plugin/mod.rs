//! Command registration
//!
//! Tools are exposed to a host as named, argument-less commands. A host
//! loads the plugin by calling [`initialize_plugin`], runs commands by name
//! through the [`CommandRegistry`] and unloads with [`uninitialize_plugin`].

pub mod commands;

pub use commands::{ExportSceneCommand, MeshToBoxesCommand, EXPORT_SCENE_COMMAND, MESH_TO_BOXES_COMMAND};

use std::collections::HashMap;

use crate::convert::ConversionReport;
use crate::core::config::ToolsConfig;
use crate::error::{ToolError, ToolResult};
use crate::export::ExportReport;
use crate::scene::SceneHost;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// A scene script was written
    Exported(ExportReport),
    /// Boxes were created from mesh faces
    Converted(ConversionReport),
}

/// A named tool that runs against a scene host
pub trait Command {
    /// Registered command name
    fn name(&self) -> &str;

    /// Run the command
    fn execute(&self, host: &mut dyn SceneHost) -> ToolResult<CommandOutput>;
}

/// Commands available to a host, by name
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name
    pub fn register(&mut self, command: Box<dyn Command>) -> ToolResult<()> {
        let name = command.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(ToolError::Registration(format!("command '{name}' is already registered")));
        }
        log::debug!("Registered command '{}'", name);
        self.commands.insert(name, command);
        Ok(())
    }

    /// Remove a command
    pub fn deregister(&mut self, name: &str) -> ToolResult<Box<dyn Command>> {
        let command = self
            .commands
            .remove(name)
            .ok_or_else(|| ToolError::Registration(format!("command '{name}' is not registered")))?;
        log::debug!("Deregistered command '{}'", name);
        Ok(command)
    }

    /// Whether a command is registered
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run a command by name
    pub fn invoke(&self, name: &str, host: &mut dyn SceneHost) -> ToolResult<CommandOutput> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| ToolError::Registration(format!("unknown command '{name}'")))?;
        log::info!("Running {}", name);
        command.execute(host)
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry").field("commands", &self.names()).finish()
    }
}

/// Register the export and conversion commands
///
/// A failed registration is written to the error log and returned.
pub fn initialize_plugin(registry: &mut CommandRegistry, config: &ToolsConfig) -> ToolResult<()> {
    let commands: [Box<dyn Command>; 2] = [
        Box::new(ExportSceneCommand::new(config.export.clone())),
        Box::new(MeshToBoxesCommand::new(config.convert.clone())),
    ];
    for command in commands {
        let name = command.name().to_string();
        registry.register(command).inspect_err(|e| {
            log::error!("Failed to register command: {} ({})", name, e);
        })?;
    }
    Ok(())
}

/// Remove the commands added by [`initialize_plugin`]
///
/// A failed deregistration is written to the error log and returned.
pub fn uninitialize_plugin(registry: &mut CommandRegistry) -> ToolResult<()> {
    for name in [EXPORT_SCENE_COMMAND, MESH_TO_BOXES_COMMAND] {
        registry.deregister(name).map(drop).inspect_err(|e| {
            log::error!("Failed to unregister command: {} ({})", name, e);
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ExportConfig;
    use crate::foundation::math::{Transform, Vec3};
    use crate::scene::{Face, InMemoryScene, PolygonMesh, SceneWriter};

    fn loaded_registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        initialize_plugin(&mut registry, &ToolsConfig::default()).unwrap();
        registry
    }

    #[test]
    fn test_initialize_registers_both_commands() {
        let registry = loaded_registry();
        assert_eq!(registry.names(), vec![EXPORT_SCENE_COMMAND, MESH_TO_BOXES_COMMAND]);
    }

    #[test]
    fn test_double_initialize_fails() {
        let mut registry = loaded_registry();
        let result = initialize_plugin(&mut registry, &ToolsConfig::default());
        assert!(matches!(result, Err(ToolError::Registration(_))));
    }

    #[test]
    fn test_uninitialize() {
        let mut registry = loaded_registry();
        uninitialize_plugin(&mut registry).unwrap();
        assert!(registry.names().is_empty());

        let result = uninitialize_plugin(&mut registry);
        assert!(matches!(result, Err(ToolError::Registration(_))));
    }

    #[test]
    fn test_unknown_command() {
        let registry = loaded_registry();
        let mut scene = InMemoryScene::new();
        let result = registry.invoke("bxNothing", &mut scene);
        assert!(matches!(result, Err(ToolError::Registration(_))));
    }

    #[test]
    fn test_invoke_mesh_to_boxes() {
        let registry = loaded_registry();
        let mut scene = InMemoryScene::new();
        let mesh = PolygonMesh::new(
            vec![Vec3::zeros(), Vec3::x(), Vec3::y(), Vec3::z()],
            Vec::new(),
            vec![Face::new(vec![0, 2, 1]), Face::new(vec![0, 1, 3]), Face::new(vec![0, 3, 2]), Face::new(vec![1, 2, 3])],
        )
        .unwrap();
        let nodes = scene.add_mesh("tetra", Transform::identity(), mesh).unwrap();
        scene.select(nodes.transform).unwrap();

        let output = registry.invoke(MESH_TO_BOXES_COMMAND, &mut scene).unwrap();
        let CommandOutput::Converted(report) = output else {
            panic!("expected a conversion report");
        };
        assert_eq!(report.boxes.len(), 4);
    }

    #[test]
    fn test_export_of_unsaved_scene_fails() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Box::new(ExportSceneCommand::new(ExportConfig::new().with_root("/nonexistent"))))
            .unwrap();

        let mut scene = InMemoryScene::new();
        let result = registry.invoke(EXPORT_SCENE_COMMAND, &mut scene);
        assert!(result.is_err_and(|e| e.is_io()));
    }
}
