//! Scene capability interfaces
//!
//! The exporter and the converter never talk to a host application
//! directly. They see a scene through two narrow traits: [`SceneReader`]
//! for queries and [`SceneWriter`] for authoring. Attribute access is typed
//! per node kind; asking a node for an attribute its kind does not carry is
//! a resolution error.
//!
//! [`InMemoryScene`] implements both traits and backs the command line host
//! and the tests.

pub mod memory;
pub mod mesh;

pub use memory::InMemoryScene;
pub use mesh::{Face, PolygonMesh};

pub use crate::foundation::collections::NodeId;

use serde::{Deserialize, Serialize};

use crate::error::ToolResult;
use crate::foundation::math::Vec3;

/// Kind of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Positions its children in space
    Transform,
    /// Sphere generator; its output feeds a mesh shape
    PolySphere,
    /// Box generator; its output feeds a mesh shape
    PolyCube,
    /// Polygon mesh shape
    Mesh,
    /// Camera shape
    Camera,
}

/// Coordinate space for transform edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// World space, resolved through the parent chain
    World,
    /// The node's own (parent-relative) space
    Transform,
}

/// Box generator dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    /// Extent along X
    pub width: f32,
    /// Extent along Y
    pub height: f32,
    /// Extent along Z
    pub depth: f32,
}

impl BoxDimensions {
    /// Create box dimensions
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Cube with equal sides
    pub fn uniform(size: f32) -> Self {
        Self::new(size, size, size)
    }

    /// Half of each dimension
    pub fn half_extents(&self) -> [f32; 3] {
        [self.width * 0.5, self.height * 0.5, self.depth * 0.5]
    }
}

/// Per-polygon geometry reported by a mesh query
///
/// Tangent and binormal are taken at the face's first vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    /// Face area
    pub area: f32,
    /// Mean of the face vertices (world space)
    pub centroid: Vec3,
    /// Unit face normal
    pub normal: Vec3,
    /// Unit tangent at the first vertex
    pub tangent: Vec3,
    /// Unit binormal at the first vertex
    pub binormal: Vec3,
}

/// Nodes created for a new box primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedBox {
    /// Transform positioning the box
    pub transform: NodeId,
    /// Mesh shape under the transform
    pub shape: NodeId,
    /// Box generator feeding the shape
    pub generator: NodeId,
}

/// Read access to a scene
pub trait SceneReader {
    /// All nodes of a kind, in creation order
    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId>;

    /// Kind of a node, `None` for a stale handle
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Node name
    fn node_name(&self, node: NodeId) -> ToolResult<String>;

    /// Parent of a node
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children of a node
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Node consuming this node's output (generator to mesh shape)
    fn output_consumer(&self, node: NodeId) -> Option<NodeId>;

    /// Radius of a sphere generator
    fn sphere_radius(&self, node: NodeId) -> ToolResult<f32>;

    /// Dimensions of a box generator
    fn box_dimensions(&self, node: NodeId) -> ToolResult<BoxDimensions>;

    /// Translation of a transform node (parent space)
    fn translation(&self, node: NodeId) -> ToolResult<Vec3>;

    /// XYZ Euler rotation of a transform node in degrees (parent space)
    fn rotation(&self, node: NodeId) -> ToolResult<Vec3>;

    /// Short file name of the open scene, `None` if it was never saved
    fn scene_file_name(&self) -> Option<String>;

    /// Currently selected nodes, in selection order
    fn selection(&self) -> Vec<NodeId>;

    /// Number of polygon faces of a mesh shape
    fn face_count(&self, mesh: NodeId) -> ToolResult<usize>;

    /// Geometry of one polygon face of a mesh shape
    fn face_geometry(&self, mesh: NodeId, face: usize) -> ToolResult<FaceGeometry>;
}

/// Authoring access to a scene
pub trait SceneWriter {
    /// Create a box primitive of the given dimensions at the origin
    fn create_box(&mut self, dimensions: BoxDimensions) -> ToolResult<CreatedBox>;

    /// Replace the selection with a single node
    fn select(&mut self, node: NodeId) -> ToolResult<()>;

    /// Set the translation of a transform node
    fn set_translation(&mut self, node: NodeId, value: Vec3, space: Space) -> ToolResult<()>;

    /// Set the XYZ Euler rotation (degrees) of a transform node
    fn set_rotation(&mut self, node: NodeId, euler_degrees: Vec3, space: Space) -> ToolResult<()>;
}

/// A scene that can be both queried and edited
pub trait SceneHost: SceneReader + SceneWriter {}

impl<T: SceneReader + SceneWriter> SceneHost for T {}
