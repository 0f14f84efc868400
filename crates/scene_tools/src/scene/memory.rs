//! In-memory scene graph
//!
//! Mirrors the node layout of a DCC scene: a primitive is a transform node
//! with a mesh shape child, and the shape is fed by a generator node
//! (`polySphere1 -> pSphereShape1`, parented under `pSphere1`). Cameras are
//! camera shapes parented under a transform.

use std::collections::HashMap;

use super::mesh::PolygonMesh;
use super::{
    BoxDimensions, CreatedBox, FaceGeometry, NodeId, NodeKind, SceneReader, SceneWriter, Space,
};
use crate::error::{ToolError, ToolResult};
use crate::foundation::collections::NodeMap;
use crate::foundation::math::{closest_rotation, euler, utils, Mat4, Transform, Vec3};

#[derive(Debug, Clone)]
enum NodeData {
    Transform(Transform),
    PolySphere { radius: f32 },
    PolyCube(BoxDimensions),
    Mesh(PolygonMesh),
    Camera,
}

impl NodeData {
    fn kind(&self) -> NodeKind {
        match self {
            Self::Transform(_) => NodeKind::Transform,
            Self::PolySphere { .. } => NodeKind::PolySphere,
            Self::PolyCube(_) => NodeKind::PolyCube,
            Self::Mesh(_) => NodeKind::Mesh,
            Self::Camera => NodeKind::Camera,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    output: Option<NodeId>,
    data: NodeData,
}

/// Nodes making up one primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveNodes {
    /// Transform node
    pub transform: NodeId,
    /// Shape node under the transform
    pub shape: NodeId,
    /// Generator feeding the shape, if any
    pub generator: Option<NodeId>,
}

/// Scene graph held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryScene {
    nodes: NodeMap<Node>,
    order: Vec<NodeId>,
    names: HashMap<String, NodeId>,
    file_name: Option<String>,
    selection: Vec<NodeId>,
}

impl InMemoryScene {
    /// Create an empty, unsaved scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set the scene file name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set or clear the scene file name
    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    /// Number of nodes in the scene
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a node by name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// All nodes without a parent, in creation order
    pub fn roots(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.nodes[*id].parent.is_none())
            .collect()
    }

    /// Local transform of a transform node
    pub fn transform(&self, node: NodeId) -> ToolResult<Transform> {
        match &self.node(node)?.data {
            NodeData::Transform(transform) => Ok(*transform),
            _ => Err(self.wrong_kind(node, "is not a transform")),
        }
    }

    /// Mesh stored on a mesh shape
    pub fn mesh(&self, node: NodeId) -> ToolResult<&PolygonMesh> {
        match &self.node(node)?.data {
            NodeData::Mesh(mesh) => Ok(mesh),
            _ => Err(self.wrong_kind(node, "is not a mesh")),
        }
    }

    /// Add a transform node
    ///
    /// The name is made unique by appending a number when it is taken.
    pub fn add_transform(&mut self, name: &str, parent: Option<NodeId>, transform: Transform) -> ToolResult<NodeId> {
        self.insert(name, parent, NodeData::Transform(transform))
    }

    /// Add a sphere primitive
    pub fn add_sphere(&mut self, name: &str, transform: Transform, radius: f32) -> ToolResult<PrimitiveNodes> {
        self.add_generated_primitive(name, transform, "polySphere", NodeData::PolySphere { radius })
    }

    /// Add a box primitive
    pub fn add_box(&mut self, name: &str, transform: Transform, dimensions: BoxDimensions) -> ToolResult<PrimitiveNodes> {
        self.add_generated_primitive(name, transform, "polyCube", NodeData::PolyCube(dimensions))
    }

    /// Add a mesh under a new transform
    pub fn add_mesh(&mut self, name: &str, transform: Transform, mesh: PolygonMesh) -> ToolResult<PrimitiveNodes> {
        mesh.validate().map_err(ToolError::Geometry)?;
        let transform_id = self.add_transform(name, None, transform)?;
        let shape_name = format!("{}Shape", self.name_of(transform_id));
        let shape = self.insert(&shape_name, Some(transform_id), NodeData::Mesh(mesh))?;
        Ok(PrimitiveNodes { transform: transform_id, shape, generator: None })
    }

    /// Add a camera under a new transform
    pub fn add_camera(&mut self, name: &str, transform: Transform) -> ToolResult<PrimitiveNodes> {
        let transform_id = self.add_transform(name, None, transform)?;
        let shape_name = format!("{}Shape", self.name_of(transform_id));
        let shape = self.add_camera_shape(&shape_name, transform_id)?;
        Ok(PrimitiveNodes { transform: transform_id, shape, generator: None })
    }

    /// Add a camera shape under any existing node
    pub fn add_camera_shape(&mut self, name: &str, parent: NodeId) -> ToolResult<NodeId> {
        self.insert(name, Some(parent), NodeData::Camera)
    }

    /// Break a generator's output connection
    pub fn disconnect_output(&mut self, node: NodeId) -> ToolResult<()> {
        self.node_mut(node)?.output = None;
        Ok(())
    }

    /// Detach a node from its parent
    pub fn unparent(&mut self, node: NodeId) -> ToolResult<()> {
        if let Some(parent) = self.node_mut(node)?.parent.take() {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.children.retain(|child| *child != node);
            }
        }
        Ok(())
    }

    /// Replace the selection with several nodes, keeping their order
    pub fn set_selection(&mut self, nodes: Vec<NodeId>) -> ToolResult<()> {
        for node in &nodes {
            self.node(*node)?;
        }
        self.selection = nodes;
        Ok(())
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// World matrix of a node, composed through its transform ancestors
    pub fn world_matrix(&self, node: NodeId) -> ToolResult<Mat4> {
        let mut matrix = Mat4::identity();
        let mut current = Some(node);
        while let Some(id) = current {
            let node = self.node(id)?;
            if let NodeData::Transform(transform) = &node.data {
                matrix = transform.to_matrix() * matrix;
            }
            current = node.parent;
        }
        Ok(matrix)
    }

    fn add_generated_primitive(
        &mut self,
        name: &str,
        transform: Transform,
        generator_base: &str,
        generator: NodeData,
    ) -> ToolResult<PrimitiveNodes> {
        let transform_id = self.add_transform(name, None, transform)?;
        let transform_name = self.name_of(transform_id).to_string();
        let shape = self.insert(&format!("{transform_name}Shape"), Some(transform_id), NodeData::Mesh(PolygonMesh::default()))?;
        let generator_name = self.next_name(generator_base);
        let generator_id = self.insert(&generator_name, None, generator)?;
        self.node_mut(generator_id)?.output = Some(shape);

        Ok(PrimitiveNodes {
            transform: transform_id,
            shape,
            generator: Some(generator_id),
        })
    }

    fn insert(&mut self, name: &str, parent: Option<NodeId>, data: NodeData) -> ToolResult<NodeId> {
        if name.is_empty() {
            return Err(ToolError::Resolution("node name cannot be empty".to_string()));
        }
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let name = if self.names.contains_key(name) { self.next_name(name) } else { name.to_string() };
        let id = self.nodes.insert(Node {
            name: name.clone(),
            parent,
            children: Vec::new(),
            output: None,
            data,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        self.names.insert(name, id);
        self.order.push(id);
        Ok(id)
    }

    /// `base1`, `base2`, ... skipping names already in use
    fn next_name(&self, base: &str) -> String {
        let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
        let stem = if stem.is_empty() { base } else { stem };
        (1..)
            .map(|n| format!("{stem}{n}"))
            .find(|candidate| !self.names.contains_key(candidate))
            .unwrap_or_else(|| stem.to_string())
    }

    fn node(&self, id: NodeId) -> ToolResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| ToolError::Resolution(format!("stale node handle {id:?}")))
    }

    fn node_mut(&mut self, id: NodeId) -> ToolResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| ToolError::Resolution(format!("stale node handle {id:?}")))
    }

    fn name_of(&self, id: NodeId) -> &str {
        self.nodes.get(id).map_or("", |node| node.name.as_str())
    }

    fn wrong_kind(&self, id: NodeId, what: &str) -> ToolError {
        ToolError::resolution(self.name_of(id), what)
    }

    fn transform_mut(&mut self, id: NodeId) -> ToolResult<&mut Transform> {
        let name = self.name_of(id).to_string();
        match &mut self.node_mut(id)?.data {
            NodeData::Transform(transform) => Ok(transform),
            _ => Err(ToolError::resolution(&name, "is not a transform")),
        }
    }

    fn parent_world_matrix(&self, id: NodeId) -> ToolResult<Mat4> {
        match self.node(id)?.parent {
            Some(parent) => self.world_matrix(parent),
            None => Ok(Mat4::identity()),
        }
    }
}

impl SceneReader for InMemoryScene {
    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.nodes[*id].data.kind() == kind)
            .collect()
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(node).map(|n| n.data.kind())
    }

    fn node_name(&self, node: NodeId) -> ToolResult<String> {
        Ok(self.node(node)?.name.clone())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn output_consumer(&self, node: NodeId) -> Option<NodeId> {
        self.nodes
            .get(node)
            .and_then(|n| n.output)
            .filter(|output| self.nodes.contains_key(*output))
    }

    fn sphere_radius(&self, node: NodeId) -> ToolResult<f32> {
        match self.node(node)?.data {
            NodeData::PolySphere { radius } => Ok(radius),
            _ => Err(self.wrong_kind(node, "has no radius attribute")),
        }
    }

    fn box_dimensions(&self, node: NodeId) -> ToolResult<BoxDimensions> {
        match self.node(node)?.data {
            NodeData::PolyCube(dimensions) => Ok(dimensions),
            _ => Err(self.wrong_kind(node, "has no width/height/depth attributes")),
        }
    }

    fn translation(&self, node: NodeId) -> ToolResult<Vec3> {
        self.transform(node).map(|t| t.translation)
    }

    fn rotation(&self, node: NodeId) -> ToolResult<Vec3> {
        self.transform(node).map(|t| t.rotation)
    }

    fn scene_file_name(&self) -> Option<String> {
        self.file_name.clone().filter(|name| !name.is_empty())
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(*id))
            .collect()
    }

    fn face_count(&self, mesh: NodeId) -> ToolResult<usize> {
        Ok(self.mesh(mesh)?.face_count())
    }

    fn face_geometry(&self, mesh: NodeId, face: usize) -> ToolResult<FaceGeometry> {
        let local = self.mesh(mesh)?
            .face_geometry(face)
            .map_err(|e| ToolError::Geometry(format!("{}: {e}", self.name_of(mesh))))?;

        // Positions and axes are stored in object space
        let world = self.world_matrix(mesh)?;
        let axis = |v: Vec3| world.transform_vector(&v).try_normalize(1.0e-8).unwrap_or(v);
        Ok(FaceGeometry {
            area: local.area,
            centroid: world.transform_point(&local.centroid.into()).coords,
            normal: axis(local.normal),
            tangent: axis(local.tangent),
            binormal: axis(local.binormal),
        })
    }
}

impl SceneWriter for InMemoryScene {
    fn create_box(&mut self, dimensions: BoxDimensions) -> ToolResult<CreatedBox> {
        let name = self.next_name("pCube");
        let nodes = self.add_box(&name, Transform::identity(), dimensions)?;
        let generator = nodes
            .generator
            .ok_or_else(|| ToolError::resolution(&name, "box has no generator"))?;

        Ok(CreatedBox {
            transform: nodes.transform,
            shape: nodes.shape,
            generator,
        })
    }

    fn select(&mut self, node: NodeId) -> ToolResult<()> {
        self.node(node)?;
        self.selection = vec![node];
        Ok(())
    }

    fn set_translation(&mut self, node: NodeId, value: Vec3, space: Space) -> ToolResult<()> {
        let local = match space {
            Space::Transform => value,
            Space::World => {
                let parent = self.parent_world_matrix(node)?;
                let inverse = parent
                    .try_inverse()
                    .ok_or_else(|| ToolError::resolution(self.name_of(node), "parent transform is singular"))?;
                inverse.transform_point(&value.into()).coords
            }
        };
        self.transform_mut(node)?.translation = local;
        Ok(())
    }

    fn set_rotation(&mut self, node: NodeId, euler_degrees: Vec3, space: Space) -> ToolResult<()> {
        let local = match space {
            Space::Transform => euler_degrees,
            Space::World => {
                let parent = self.parent_world_matrix(node)?;
                let parent_rotation = closest_rotation(&parent.fixed_view::<3, 3>(0, 0).into_owned());
                let world_rotation = euler::to_rotation(&utils::deg_to_rad_vec(euler_degrees));
                utils::rad_to_deg_vec(euler::from_rotation(&(parent_rotation.inverse() * world_rotation)))
            }
        };
        self.transform_mut(node)?.rotation = local;
        Ok(())
    }
}
