//! Scene script exporter
//!
//! Walks the sphere and box generators and the leaf cameras of a scene and
//! writes them as one scene script document. Spheres and boxes become
//! design blocks named after the transform that places them; cameras become
//! camera blocks named after their parent transform.
//!
//! A generator node carries only shape attributes, so its transform is found
//! by following the generator's output to the mesh shape and then taking the
//! shape's parent. Cameras are shapes themselves and use their parent
//! directly.

pub mod document;
pub mod path;

pub use document::{CameraBlock, DesignBlock, SceneBlock, SceneDocument, Shape};
pub use path::{scene_base_name, scene_output_path};

use std::path::PathBuf;

use crate::core::config::{BlockOrder, ExportConfig};
use crate::error::{IoError, ToolError, ToolResult};
use crate::scene::{NodeId, NodeKind, SceneReader};

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// File that was written
    pub path: PathBuf,
    /// Number of design blocks written
    pub design_blocks: usize,
    /// Number of camera blocks written
    pub cameras: usize,
}

/// Serializes scenes into scene script documents
#[derive(Debug, Clone, Default)]
pub struct SceneSerializer {
    config: ExportConfig,
}

impl SceneSerializer {
    /// Create a serializer
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Export configuration in use
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Design blocks for every sphere, then every box
    pub fn export_design_blocks<R: SceneReader + ?Sized>(&self, scene: &R) -> ToolResult<SceneDocument> {
        let mut document = SceneDocument::new();

        for sphere in scene.nodes_of_kind(NodeKind::PolySphere) {
            let radius = scene.sphere_radius(sphere)?;
            document.push(self.design_block(scene, sphere, Shape::Sphere { radius })?);
        }

        for cube in scene.nodes_of_kind(NodeKind::PolyCube) {
            let half_extents = scene.box_dimensions(cube)?.half_extents();
            document.push(self.design_block(scene, cube, Shape::Box { half_extents })?);
        }

        Ok(document)
    }

    /// Camera blocks for every leaf camera
    pub fn export_cameras<R: SceneReader + ?Sized>(&self, scene: &R) -> ToolResult<SceneDocument> {
        let mut document = SceneDocument::new();

        for camera in leaf_cameras(scene) {
            let transform = scene.parent(camera).ok_or_else(|| {
                ToolError::resolution(&display_name(scene, camera), "camera has no parent transform")
            })?;
            let name = scene.node_name(transform)?;
            log::debug!("Exporting camera '{}'", name);

            document.push(SceneBlock::Camera(CameraBlock {
                name,
                position: scene.translation(transform)?,
                rotation: scene.rotation(transform)?,
            }));
        }

        Ok(document)
    }

    /// Complete document in the configured block order
    pub fn build_document<R: SceneReader + ?Sized>(&self, scene: &R) -> ToolResult<SceneDocument> {
        let cameras = self.export_cameras(scene)?;
        let design = self.export_design_blocks(scene)?;

        let mut document = SceneDocument::new();
        match self.config.block_order {
            BlockOrder::CamerasFirst => {
                document.extend(cameras);
                document.extend(design);
            }
            BlockOrder::DesignBlocksFirst => {
                document.extend(design);
                document.extend(cameras);
            }
        }
        Ok(document)
    }

    /// Document text
    pub fn render(&self, document: &SceneDocument) -> String {
        document.render(self.config.float_format)
    }

    /// Where this scene's script goes
    pub fn output_path<R: SceneReader + ?Sized>(&self, scene: &R) -> ToolResult<PathBuf> {
        let file_name = scene.scene_file_name();
        Ok(scene_output_path(&self.config, file_name.as_deref())?)
    }

    /// Build, render and write the scene script
    ///
    /// Any existing file at the output path is overwritten. On error nothing
    /// is written.
    pub fn export<R: SceneReader + ?Sized>(&self, scene: &R) -> ToolResult<ExportReport> {
        let document = self.build_document(scene)?;
        let path = self.output_path(scene)?;
        let text = self.render(&document);

        std::fs::write(&path, text).map_err(|source| IoError::Write { path: path.clone(), source })?;

        let report = ExportReport {
            path,
            design_blocks: document.design_blocks().count(),
            cameras: document.camera_blocks().count(),
        };
        log::info!(
            "Exported {} design block(s) and {} camera(s) to {}",
            report.design_blocks,
            report.cameras,
            report.path.display()
        );
        Ok(report)
    }

    fn design_block<R: SceneReader + ?Sized>(&self, scene: &R, generator: NodeId, shape: Shape) -> ToolResult<SceneBlock> {
        let transform = owning_transform(scene, generator)?;
        let name = scene.node_name(transform)?;
        log::debug!("Exporting design block '{}' ({:?})", name, shape);

        Ok(SceneBlock::Design(DesignBlock {
            name,
            shape,
            position: scene.translation(transform)?,
            rotation: scene.rotation(transform)?,
            material: self.config.default_material.clone(),
        }))
    }
}

/// Transform placing a generator's output: generator -> mesh shape -> parent
pub fn owning_transform<R: SceneReader + ?Sized>(scene: &R, generator: NodeId) -> ToolResult<NodeId> {
    let shape = scene.output_consumer(generator).ok_or_else(|| {
        ToolError::resolution(&display_name(scene, generator), "output is not connected to a shape")
    })?;
    let transform = scene.parent(shape).ok_or_else(|| {
        ToolError::resolution(&display_name(scene, shape), "shape has no parent transform")
    })?;
    if scene.node_kind(transform) != Some(NodeKind::Transform) {
        return Err(ToolError::resolution(&display_name(scene, transform), "is not a transform"));
    }
    Ok(transform)
}

/// Cameras with no camera below them
pub fn leaf_cameras<R: SceneReader + ?Sized>(scene: &R) -> Vec<NodeId> {
    scene
        .nodes_of_kind(NodeKind::Camera)
        .into_iter()
        .filter(|camera| !has_camera_below(scene, *camera))
        .collect()
}

fn has_camera_below<R: SceneReader + ?Sized>(scene: &R, node: NodeId) -> bool {
    let mut pending = scene.children(node);
    while let Some(child) = pending.pop() {
        if scene.node_kind(child) == Some(NodeKind::Camera) {
            return true;
        }
        pending.extend(scene.children(child));
    }
    false
}

fn display_name<R: SceneReader + ?Sized>(scene: &R, node: NodeId) -> String {
    scene.node_name(node).unwrap_or_else(|_| format!("{node:?}"))
}
