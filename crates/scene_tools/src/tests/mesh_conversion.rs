//! Conversion tests over loaded meshes, followed by export

use std::path::Path;

use crate::assets::{ObjLoader, SceneSnapshot};
use crate::convert::FaceToBoxConverter;
use crate::core::config::ExportConfig;
use crate::export::SceneSerializer;
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{InMemoryScene, NodeKind, SceneReader, SceneWriter};

const CUBE_OBJ: &str = "\
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
f 6/1 5/2 8/3 7/4
f 5/1 1/2 4/3 8/4
f 2/1 6/2 7/3 3/4
f 4/1 3/2 7/3 8/4
f 5/1 6/2 2/3 1/4
";

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube_scene() -> InMemoryScene {
        let mesh = ObjLoader::parse_obj(CUBE_OBJ).unwrap();
        let mut scene = InMemoryScene::new().with_file_name("cube.mb");
        let nodes = scene.add_mesh("cube", Transform::identity(), mesh).unwrap();
        scene.select(nodes.transform).unwrap();
        scene
    }

    #[test]
    fn test_cube_faces_become_six_boxes() {
        let mut scene = cube_scene();
        let report = FaceToBoxConverter::default().convert(&mut scene).unwrap();

        assert_eq!(report.boxes.len(), 6);
        assert_eq!(scene.nodes_of_kind(NodeKind::PolyCube).len(), 6);
        for created in &report.boxes {
            let dims = scene.box_dimensions(created.generator).unwrap();
            assert_relative_eq!(dims.width, 4.0, epsilon = 1e-4);
            assert_relative_eq!(dims.height, 4.0, epsilon = 1e-4);
            assert_relative_eq!(dims.depth, 4.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_boxes_sit_on_faces_and_point_outward() {
        let mut scene = cube_scene();
        let report = FaceToBoxConverter::default().convert(&mut scene).unwrap();

        for created in &report.boxes {
            let transform = scene.transform(created.transform).unwrap();
            let position = transform.translation;
            assert_relative_eq!(position.norm(), 1.0, epsilon = 1e-4);

            let up = transform.rotation_matrix() * Vec3::y();
            assert_relative_eq!(up, position, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_converted_boxes_export_as_design_blocks() {
        let mut scene = cube_scene();
        FaceToBoxConverter::default().convert(&mut scene).unwrap();

        let serializer = SceneSerializer::new(ExportConfig::new().with_root("/unused"));
        let document = serializer.build_document(&scene).unwrap();
        assert_eq!(document.design_blocks().count(), 6);
        assert!(document.design_blocks().all(|block| block.shape.values() == vec![2.0, 2.0, 2.0]));
    }

    #[test]
    fn test_conversion_survives_snapshot_roundtrip() {
        let mut scene = cube_scene();
        FaceToBoxConverter::default().convert(&mut scene).unwrap();

        let snapshot = SceneSnapshot::from_scene(&scene).unwrap();
        let restored = snapshot.into_scene(Path::new(".")).unwrap();
        assert_eq!(restored.nodes_of_kind(NodeKind::PolyCube).len(), 6);
        assert_eq!(restored.nodes_of_kind(NodeKind::Mesh).len(), 7);
    }
}
