//! Scene snapshots
//!
//! A snapshot is a serializable description of a scene: its file name, the
//! top-level objects with their transforms and shapes, and the selection.
//! The command line host loads one into an [`InMemoryScene`], runs a tool
//! against it and can write the edited scene back out.
//!
//! ```ron
//! (
//!     file_name: Some("level01.mb"),
//!     objects: [
//!         (name: "pSphere1", translate: (1.0, 2.0, 3.0), shape: Sphere(radius: 5.0)),
//!         (name: "pCube1", shape: Box(width: 2.0, height: 4.0, depth: 6.0)),
//!         (name: "camera1", rotate: (-30.0, 45.0, 0.0), shape: Camera),
//!         (name: "ground", shape: ObjMesh(path: "ground.obj")),
//!     ],
//!     selection: ["ground"],
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::obj_loader::ObjLoader;
use crate::config::Config;
use crate::error::{ToolError, ToolResult};
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{BoxDimensions, InMemoryScene, NodeId, NodeKind, PolygonMesh, SceneReader};

/// Shape carried by a snapshot object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapshotShape {
    /// Bare transform
    Empty,
    /// Sphere primitive
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Box primitive
    Box {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
        /// Extent along Z
        depth: f32,
    },
    /// Camera
    Camera,
    /// Mesh loaded from an OBJ file, relative to the snapshot file
    ObjMesh {
        /// OBJ path
        path: PathBuf,
    },
    /// Mesh stored inline
    Mesh(PolygonMesh),
}

/// One top-level object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotObject {
    /// Transform name
    pub name: String,
    /// Translation
    #[serde(default)]
    pub translate: [f32; 3],
    /// XYZ Euler rotation in degrees
    #[serde(default)]
    pub rotate: [f32; 3],
    /// Shape under the transform
    pub shape: SnapshotShape,
}

impl SnapshotObject {
    fn transform(&self) -> Transform {
        Transform::new(Vec3::from(self.translate), Vec3::from(self.rotate))
    }
}

/// Serializable scene description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    /// Short file name of the scene, `None` for an unsaved scene
    pub file_name: Option<String>,
    /// Top-level objects in creation order
    pub objects: Vec<SnapshotObject>,
    /// Selected object names
    pub selection: Vec<String>,
}

impl Config for SceneSnapshot {}

impl SceneSnapshot {
    /// Load a snapshot file and build its scene
    ///
    /// OBJ paths are resolved against the snapshot's directory.
    pub fn load_scene<P: AsRef<Path>>(path: P) -> ToolResult<InMemoryScene> {
        let path = path.as_ref();
        let snapshot = Self::load_from_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        snapshot.into_scene(base_dir)
    }

    /// Build an in-memory scene
    pub fn into_scene(self, base_dir: &Path) -> ToolResult<InMemoryScene> {
        let mut scene = InMemoryScene::new();
        scene.set_file_name(self.file_name);

        for object in &self.objects {
            let transform = object.transform();
            match &object.shape {
                SnapshotShape::Empty => {
                    scene.add_transform(&object.name, None, transform)?;
                }
                SnapshotShape::Sphere { radius } => {
                    scene.add_sphere(&object.name, transform, *radius)?;
                }
                SnapshotShape::Box { width, height, depth } => {
                    scene.add_box(&object.name, transform, BoxDimensions::new(*width, *height, *depth))?;
                }
                SnapshotShape::Camera => {
                    scene.add_camera(&object.name, transform)?;
                }
                SnapshotShape::ObjMesh { path } => {
                    let mesh_path = base_dir.join(path);
                    let mesh = ObjLoader::load_obj(&mesh_path)
                        .map_err(|e| ToolError::Geometry(format!("{}: {e}", mesh_path.display())))?;
                    scene.add_mesh(&object.name, transform, mesh)?;
                }
                SnapshotShape::Mesh(mesh) => {
                    scene.add_mesh(&object.name, transform, mesh.clone())?;
                }
            }
        }

        let selection = self
            .selection
            .iter()
            .map(|name| {
                scene
                    .find(name)
                    .ok_or_else(|| ToolError::Selection(format!("selected object '{name}' not found")))
            })
            .collect::<ToolResult<Vec<_>>>()?;
        scene.set_selection(selection)?;

        Ok(scene)
    }

    /// Capture the top-level objects of a scene
    ///
    /// Meshes are stored inline. Generated primitives are written back as
    /// spheres and boxes using their generator attributes.
    pub fn from_scene(scene: &InMemoryScene) -> ToolResult<Self> {
        let mut objects = Vec::new();
        for root in scene.roots() {
            if scene.node_kind(root) != Some(NodeKind::Transform) {
                continue;
            }
            let transform = scene.transform(root)?;
            objects.push(SnapshotObject {
                name: scene.node_name(root)?,
                translate: transform.translation.into(),
                rotate: transform.rotation.into(),
                shape: Self::capture_shape(scene, root)?,
            });
        }

        let selection = scene
            .selection()
            .into_iter()
            .map(|node| scene.node_name(node))
            .collect::<ToolResult<Vec<_>>>()?;

        Ok(Self {
            file_name: scene.scene_file_name(),
            objects,
            selection,
        })
    }

    fn capture_shape(scene: &InMemoryScene, transform: NodeId) -> ToolResult<SnapshotShape> {
        let Some(shape) = scene.children(transform).into_iter().next() else {
            return Ok(SnapshotShape::Empty);
        };

        match scene.node_kind(shape) {
            Some(NodeKind::Camera) => Ok(SnapshotShape::Camera),
            Some(NodeKind::Mesh) => {
                let generator = Self::generator_of(scene, shape);
                match generator.and_then(|g| scene.node_kind(g).map(|kind| (g, kind))) {
                    Some((g, NodeKind::PolySphere)) => Ok(SnapshotShape::Sphere { radius: scene.sphere_radius(g)? }),
                    Some((g, NodeKind::PolyCube)) => {
                        let dims = scene.box_dimensions(g)?;
                        Ok(SnapshotShape::Box { width: dims.width, height: dims.height, depth: dims.depth })
                    }
                    _ => Ok(SnapshotShape::Mesh(scene.mesh(shape)?.clone())),
                }
            }
            _ => Ok(SnapshotShape::Empty),
        }
    }

    fn generator_of(scene: &InMemoryScene, shape: NodeId) -> Option<NodeId> {
        scene
            .nodes_of_kind(NodeKind::PolySphere)
            .into_iter()
            .chain(scene.nodes_of_kind(NodeKind::PolyCube))
            .find(|generator| scene.output_consumer(*generator) == Some(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"(
        file_name: Some("level01.mb"),
        objects: [
            (name: "pSphere1", translate: (1.0, 2.0, 3.0), shape: Sphere(radius: 5.0)),
            (name: "pCube1", shape: Box(width: 2.0, height: 4.0, depth: 6.0)),
            (name: "camera1", rotate: (-30.0, 45.0, 0.0), shape: Camera),
        ],
        selection: ["pCube1"],
    )"#;

    #[test]
    fn test_snapshot_builds_scene() {
        let snapshot: SceneSnapshot = ron::from_str(SNAPSHOT).unwrap();
        let scene = snapshot.into_scene(Path::new(".")).unwrap();

        assert_eq!(scene.scene_file_name().as_deref(), Some("level01.mb"));
        assert_eq!(scene.nodes_of_kind(NodeKind::PolySphere).len(), 1);
        assert_eq!(scene.nodes_of_kind(NodeKind::PolyCube).len(), 1);
        assert_eq!(scene.nodes_of_kind(NodeKind::Camera).len(), 1);

        let cube = scene.find("pCube1").unwrap();
        assert_eq!(scene.selection(), vec![cube]);
    }

    #[test]
    fn test_scene_roundtrips_through_snapshot() {
        let snapshot: SceneSnapshot = ron::from_str(SNAPSHOT).unwrap();
        let scene = snapshot.clone().into_scene(Path::new(".")).unwrap();

        let captured = SceneSnapshot::from_scene(&scene).unwrap();
        assert_eq!(captured, snapshot);
    }

    #[test]
    fn test_multi_selection_survives_load_and_save() {
        let mut snapshot: SceneSnapshot = ron::from_str(SNAPSHOT).unwrap();
        snapshot.selection = vec!["pCube1".to_string(), "pSphere1".to_string()];
        let scene = snapshot.clone().into_scene(Path::new(".")).unwrap();

        let names: Vec<String> = scene.selection().into_iter().map(|node| scene.node_name(node).unwrap()).collect();
        assert_eq!(names, vec!["pCube1", "pSphere1"]);
        assert_eq!(SceneSnapshot::from_scene(&scene).unwrap().selection, snapshot.selection);
    }

    #[test]
    fn test_unknown_selection_is_rejected() {
        let snapshot = SceneSnapshot {
            selection: vec!["missing".to_string()],
            ..Default::default()
        };
        let result = snapshot.into_scene(Path::new("."));
        assert!(matches!(result, Err(ToolError::Selection(_))));
    }
}
