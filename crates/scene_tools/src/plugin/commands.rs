//! Built-in tool commands

use super::{Command, CommandOutput};
use crate::convert::FaceToBoxConverter;
use crate::core::config::{ConvertConfig, ExportConfig};
use crate::error::ToolResult;
use crate::export::SceneSerializer;
use crate::scene::SceneHost;

/// Name of the scene export command
pub const EXPORT_SCENE_COMMAND: &str = "bxExportScene";

/// Name of the face-to-box command
pub const MESH_TO_BOXES_COMMAND: &str = "bxMeshToBoxes";

/// Writes the open scene as a scene script
#[derive(Debug, Clone, Default)]
pub struct ExportSceneCommand {
    serializer: SceneSerializer,
}

impl ExportSceneCommand {
    /// Create the command
    pub fn new(config: ExportConfig) -> Self {
        Self { serializer: SceneSerializer::new(config) }
    }
}

impl Command for ExportSceneCommand {
    fn name(&self) -> &str {
        EXPORT_SCENE_COMMAND
    }

    fn execute(&self, host: &mut dyn SceneHost) -> ToolResult<CommandOutput> {
        self.serializer.export(&*host).map(CommandOutput::Exported)
    }
}

/// Creates one box per face of the selected mesh
#[derive(Debug, Clone, Default)]
pub struct MeshToBoxesCommand {
    converter: FaceToBoxConverter,
}

impl MeshToBoxesCommand {
    /// Create the command
    pub fn new(config: ConvertConfig) -> Self {
        Self { converter: FaceToBoxConverter::new(config) }
    }
}

impl Command for MeshToBoxesCommand {
    fn name(&self) -> &str {
        MESH_TO_BOXES_COMMAND
    }

    fn execute(&self, host: &mut dyn SceneHost) -> ToolResult<CommandOutput> {
        self.converter.convert(host).map(CommandOutput::Converted)
    }
}
