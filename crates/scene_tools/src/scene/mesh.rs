//! Polygon mesh storage and per-face geometry queries

use serde::{Deserialize, Serialize};

use super::FaceGeometry;
use crate::foundation::math::{Vec2, Vec3};

/// Below this length a vector is treated as zero
const LENGTH_EPSILON: f32 = 1.0e-8;

/// One polygon face
///
/// `uvs` is either empty or parallel to `positions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Indices into the mesh positions, in winding order
    pub positions: Vec<usize>,
    /// Indices into the mesh UVs, one per face vertex
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<usize>,
}

impl Face {
    /// Face without texture coordinates
    pub fn new(positions: Vec<usize>) -> Self {
        Self { positions, uvs: Vec::new() }
    }

    /// Face with texture coordinates
    pub fn with_uvs(positions: Vec<usize>, uvs: Vec<usize>) -> Self {
        Self { positions, uvs }
    }
}

/// Polygon mesh with optional UVs
///
/// Faces keep their original vertex count; nothing is triangulated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Texture coordinates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<Vec2>,
    /// Polygon faces
    pub faces: Vec<Face>,
}

impl PolygonMesh {
    /// Create a mesh and check its indices
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, faces: Vec<Face>) -> Result<Self, String> {
        let mesh = Self { positions, uvs, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check that every face index points at existing data
    pub fn validate(&self) -> Result<(), String> {
        for (index, face) in self.faces.iter().enumerate() {
            if let Some(bad) = face.positions.iter().find(|&&i| i >= self.positions.len()) {
                return Err(format!("face {index}: position index {bad} out of range"));
            }
            if !face.uvs.is_empty() {
                if face.uvs.len() != face.positions.len() {
                    return Err(format!("face {index}: uv count does not match vertex count"));
                }
                if let Some(bad) = face.uvs.iter().find(|&&i| i >= self.uvs.len()) {
                    return Err(format!("face {index}: uv index {bad} out of range"));
                }
            }
        }
        Ok(())
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Area, centroid, normal, tangent and binormal of a face
    ///
    /// Area is the length of the polygon's vector area, which stays exact
    /// for concave faces; a collapsed face reports zero rather than failing. The tangent follows
    /// the UV `u` direction at the first vertex when UVs are present and
    /// non-degenerate, otherwise the direction of the first edge.
    pub fn face_geometry(&self, index: usize) -> Result<FaceGeometry, String> {
        let face = self.faces
            .get(index)
            .ok_or_else(|| format!("face {index} out of range ({} faces)", self.faces.len()))?;
        if face.positions.len() < 3 {
            return Err(format!("face {index} has {} vertices", face.positions.len()));
        }

        let points = self.face_points(face, index)?;
        let count = points.len();

        let centroid = points.iter().sum::<Vec3>() / count as f32;

        let origin = points[0];
        let vector_area = vector_area(&points);
        let area = vector_area.norm();
        let normal = vector_area.try_normalize(LENGTH_EPSILON).unwrap_or_else(Vec3::zeros);

        let edge_next = points[1] - origin;
        let edge_prev = points[count - 1] - origin;
        let uv_frame = self.face_uvs(face).and_then(|uvs| {
            uv_tangent(edge_next, edge_prev, uvs[1] - uvs[0], uvs[count - 1] - uvs[0])
        });

        let (tangent, handedness) = match uv_frame {
            Some((tangent, bitangent)) => {
                let tangent = orthogonalize(tangent, normal).unwrap_or_else(|| fallback_tangent(edge_next, normal));
                let handedness = if normal.cross(&tangent).dot(&bitangent) < 0.0 { -1.0 } else { 1.0 };
                (tangent, handedness)
            }
            None => (fallback_tangent(edge_next, normal), 1.0),
        };

        let binormal = normal.cross(&tangent) * handedness;

        Ok(FaceGeometry {
            area,
            centroid,
            normal,
            tangent,
            binormal,
        })
    }

    fn face_points(&self, face: &Face, index: usize) -> Result<Vec<Vec3>, String> {
        face.positions
            .iter()
            .map(|&i| {
                self.positions
                    .get(i)
                    .copied()
                    .ok_or_else(|| format!("face {index}: position index {i} out of range"))
            })
            .collect()
    }

    fn face_uvs(&self, face: &Face) -> Option<Vec<Vec2>> {
        if face.uvs.len() != face.positions.len() {
            return None;
        }
        face.uvs.iter().map(|&i| self.uvs.get(i).copied()).collect()
    }
}

/// Half the sum of edge cross products, taken about the first vertex
///
/// Its length is the polygon area and its direction the face normal.
fn vector_area(points: &[Vec3]) -> Vec3 {
    let origin = points[0];
    let doubled = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(current, next)| (current - origin).cross(&(next - origin)))
        .sum::<Vec3>();
    doubled * 0.5
}

/// Tangent and bitangent from two edges and their UV deltas
fn uv_tangent(edge_a: Vec3, edge_b: Vec3, duv_a: Vec2, duv_b: Vec2) -> Option<(Vec3, Vec3)> {
    let det = duv_a.x * duv_b.y - duv_b.x * duv_a.y;
    if det.abs() < LENGTH_EPSILON {
        return None;
    }
    let r = 1.0 / det;
    let tangent = (edge_a * duv_b.y - edge_b * duv_a.y) * r;
    let bitangent = (edge_b * duv_a.x - edge_a * duv_b.x) * r;
    Some((tangent, bitangent))
}

/// Remove the normal component and normalize
fn orthogonalize(vector: Vec3, normal: Vec3) -> Option<Vec3> {
    (vector - normal * normal.dot(&vector)).try_normalize(LENGTH_EPSILON)
}

/// Tangent along the first edge, or any axis perpendicular to the normal
fn fallback_tangent(edge: Vec3, normal: Vec3) -> Vec3 {
    if let Some(tangent) = orthogonalize(edge, normal) {
        return tangent;
    }
    if normal == Vec3::zeros() {
        return Vec3::zeros();
    }
    let axis = if normal.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    orthogonalize(axis, normal).unwrap_or_else(Vec3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn unit_quad_xz() -> PolygonMesh {
        // Quad in the XZ plane wound counter-clockwise seen from +Y
        PolygonMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
            ],
            vec![Face::with_uvs(vec![0, 1, 2, 3], vec![0, 1, 2, 3])],
        )
        .unwrap()
    }

    #[test]
    fn test_quad_area_centroid_normal() {
        let geometry = unit_quad_xz().face_geometry(0).unwrap();

        assert_relative_eq!(geometry.area, 1.0, epsilon = EPSILON);
        assert_relative_eq!(geometry.centroid, Vec3::new(0.5, 0.0, 0.5), epsilon = EPSILON);
        assert_relative_eq!(geometry.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_uv_tangent_follows_u_direction() {
        let geometry = unit_quad_xz().face_geometry(0).unwrap();

        // u grows along +X on this quad
        assert_relative_eq!(geometry.tangent, Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        // v grows along +Z, and N x T = Y x X = -Z, so the frame is mirrored
        assert_relative_eq!(geometry.binormal, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_frame_is_orthonormal() {
        let geometry = unit_quad_xz().face_geometry(0).unwrap();

        assert_relative_eq!(geometry.tangent.dot(&geometry.normal), 0.0, epsilon = EPSILON);
        assert_relative_eq!(geometry.binormal.dot(&geometry.normal), 0.0, epsilon = EPSILON);
        assert_relative_eq!(geometry.tangent.dot(&geometry.binormal), 0.0, epsilon = EPSILON);
        assert_relative_eq!(geometry.binormal.norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_tangent_without_uvs_uses_first_edge() {
        let mesh = PolygonMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
            ],
            Vec::new(),
            vec![Face::new(vec![0, 1, 2])],
        )
        .unwrap();

        let geometry = mesh.face_geometry(0).unwrap();
        assert_relative_eq!(geometry.area, 2.0, epsilon = EPSILON);
        assert_relative_eq!(geometry.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(geometry.tangent, Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(geometry.binormal, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_collapsed_face_has_zero_area() {
        let mesh = PolygonMesh::new(
            vec![Vec3::new(1.0, 1.0, 1.0); 3],
            Vec::new(),
            vec![Face::new(vec![0, 1, 2])],
        )
        .unwrap();

        let geometry = mesh.face_geometry(0).unwrap();
        assert_eq!(geometry.area, 0.0);
        assert_relative_eq!(geometry.centroid, Vec3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
        assert!(geometry.tangent.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_concave_face_area() {
        // Arrow shape; the first vertex cannot see the whole polygon
        let mesh = PolygonMesh::new(
            vec![
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 4.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            Vec::new(),
            vec![Face::new(vec![0, 1, 2, 3])],
        )
        .unwrap();

        let geometry = mesh.face_geometry(0).unwrap();
        assert_relative_eq!(geometry.area, 4.0, epsilon = EPSILON);
        assert_relative_eq!(geometry.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_invalid_indices_rejected() {
        let result = PolygonMesh::new(
            vec![Vec3::zeros(); 2],
            Vec::new(),
            vec![Face::new(vec![0, 1, 2])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_face_out_of_range() {
        assert!(unit_quad_xz().face_geometry(1).is_err());
    }
}
