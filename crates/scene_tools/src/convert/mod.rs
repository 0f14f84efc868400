//! Face-to-box converter
//!
//! Replaces nothing and deletes nothing: for every polygon face of the
//! selected mesh a new box primitive is created. The box is a cube whose
//! sides equal the face area, placed at the face centroid and oriented so
//! that its X, Y and Z axes follow the face binormal, normal and tangent.

pub mod frame;

pub use frame::FaceFrame;

use crate::core::config::{BoxSizeRule, ConvertConfig};
use crate::error::{ToolError, ToolResult};
use crate::scene::{BoxDimensions, CreatedBox, FaceGeometry, NodeId, NodeKind, SceneHost, SceneReader, Space};

/// Outcome of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Mesh shape that was converted
    pub mesh: NodeId,
    /// Boxes created, in face order
    pub boxes: Vec<CreatedBox>,
}

/// Creates one box per face of the selected mesh
#[derive(Debug, Clone, Default)]
pub struct FaceToBoxConverter {
    config: ConvertConfig,
}

impl FaceToBoxConverter {
    /// Create a converter
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Conversion configuration in use
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert the first selected mesh
    pub fn convert<H: SceneHost + ?Sized>(&self, host: &mut H) -> ToolResult<ConversionReport> {
        let mesh = selected_mesh(&*host)?;
        self.convert_mesh(host, mesh)
    }

    /// Convert a specific mesh shape
    ///
    /// Faces are processed in index order. A face query failure aborts the
    /// conversion; boxes created for earlier faces stay in the scene.
    pub fn convert_mesh<H: SceneHost + ?Sized>(&self, host: &mut H, mesh: NodeId) -> ToolResult<ConversionReport> {
        let face_count = host.face_count(mesh)?;
        log::info!("Converting {} face(s) of '{}' to boxes", face_count, host.node_name(mesh)?);

        let mut boxes = Vec::with_capacity(face_count);
        for face in 0..face_count {
            let geometry = host.face_geometry(mesh, face)?;
            boxes.push(self.place_box(host, face, &geometry)?);
        }

        Ok(ConversionReport { mesh, boxes })
    }

    /// Box dimensions for one face
    pub fn box_dimensions(&self, geometry: &FaceGeometry) -> BoxDimensions {
        match self.config.size_rule {
            BoxSizeRule::FaceArea => BoxDimensions::uniform(geometry.area),
        }
    }

    fn place_box<H: SceneHost + ?Sized>(&self, host: &mut H, face: usize, geometry: &FaceGeometry) -> ToolResult<CreatedBox> {
        let frame = FaceFrame::from_geometry(geometry);
        let rotation = frame.euler_degrees();

        let created = host.create_box(self.box_dimensions(geometry))?;
        host.select(created.transform)?;
        host.set_translation(created.transform, frame.centroid, Space::World)?;
        host.set_rotation(created.transform, rotation, Space::Transform)?;

        log::debug!(
            "Face {}: area {} at {:?}, rotation {:?}",
            face,
            geometry.area,
            frame.centroid.as_slice(),
            rotation.as_slice()
        );
        Ok(created)
    }
}

/// Mesh shape named by the first selected node
///
/// A selected transform resolves to its first mesh shape child.
pub fn selected_mesh<R: SceneReader + ?Sized>(scene: &R) -> ToolResult<NodeId> {
    let selected = scene
        .selection()
        .into_iter()
        .next()
        .ok_or_else(|| ToolError::Selection("nothing is selected".to_string()))?;

    match scene.node_kind(selected) {
        Some(NodeKind::Mesh) => Ok(selected),
        Some(NodeKind::Transform) => scene
            .children(selected)
            .into_iter()
            .find(|child| scene.node_kind(*child) == Some(NodeKind::Mesh))
            .ok_or_else(|| not_a_mesh(scene, selected)),
        _ => Err(not_a_mesh(scene, selected)),
    }
}

fn not_a_mesh<R: SceneReader + ?Sized>(scene: &R, node: NodeId) -> ToolError {
    let name = scene.node_name(node).unwrap_or_else(|_| format!("{node:?}"));
    ToolError::Selection(format!("'{name}' is not polygon mesh geometry"))
}
