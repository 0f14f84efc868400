//! Face frame to transform conversion

use crate::foundation::math::{Mat3, Mat4, Transform, Vec3};
use crate::scene::FaceGeometry;

/// Orientation frame of one polygon face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    /// Local X axis
    pub binormal: Vec3,
    /// Local Y axis
    pub normal: Vec3,
    /// Local Z axis
    pub tangent: Vec3,
    /// Origin
    pub centroid: Vec3,
}

impl FaceFrame {
    /// Frame of a queried face
    pub fn from_geometry(geometry: &FaceGeometry) -> Self {
        Self {
            binormal: geometry.binormal,
            normal: geometry.normal,
            tangent: geometry.tangent,
            centroid: geometry.centroid,
        }
    }

    /// Axes (binormal, normal, tangent) as matrix columns
    ///
    /// Mirrored UVs give a left-handed frame. The binormal is flipped then,
    /// so the axes stay a proper rotation with local Y on the face normal.
    pub fn axes(&self) -> Mat3 {
        let axes = Mat3::from_columns(&[self.binormal, self.normal, self.tangent]);
        if axes.determinant() < 0.0 {
            Mat3::from_columns(&[-self.binormal, self.normal, self.tangent])
        } else {
            axes
        }
    }

    /// Transform matrix with the frame axes and the centroid as translation
    pub fn to_matrix(&self) -> Mat4 {
        let mut matrix = self.axes().to_homogeneous();
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.centroid);
        matrix
    }

    /// XYZ Euler rotation of the frame in degrees
    ///
    /// The frame is only near-orthonormal when the mesh UVs are skewed, so
    /// the closest proper rotation is used.
    pub fn euler_degrees(&self) -> Vec3 {
        Transform::from_matrix(&self.to_matrix()).rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-3;

    fn frame(binormal: Vec3, normal: Vec3, tangent: Vec3) -> FaceFrame {
        FaceFrame { binormal, normal, tangent, centroid: Vec3::new(1.0, 2.0, 3.0) }
    }

    #[test]
    fn test_identity_frame() {
        let frame = frame(Vec3::x(), Vec3::y(), Vec3::z());
        assert_relative_eq!(frame.euler_degrees(), Vec3::zeros(), epsilon = EPSILON);

        let matrix = frame.to_matrix();
        assert_relative_eq!(Vec3::new(matrix.m14, matrix.m24, matrix.m34), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(matrix.m44, 1.0);
    }

    #[test]
    fn test_upward_face_tilted_to_x() {
        // Normal along +X: the box's Y axis must point along +X
        let frame = frame(Vec3::new(0.0, -1.0, 0.0), Vec3::x(), Vec3::z());
        let euler = frame.euler_degrees();
        assert_relative_eq!(euler, Vec3::new(0.0, 0.0, -90.0), epsilon = EPSILON);

        let rotation = Transform::new(Vec3::zeros(), euler).rotation_matrix();
        assert_relative_eq!(rotation * Vec3::y(), Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_reproduces_axes() {
        let angle = 0.3_f32;
        let binormal = Vec3::new(angle.cos(), 0.0, -angle.sin());
        let normal = Vec3::y();
        let tangent = Vec3::new(angle.sin(), 0.0, angle.cos());
        let frame = frame(binormal, normal, tangent);

        let rotation = Transform::new(Vec3::zeros(), frame.euler_degrees()).rotation_matrix();
        assert_relative_eq!(rotation * Vec3::x(), binormal, epsilon = EPSILON);
        assert_relative_eq!(rotation * Vec3::y(), normal, epsilon = EPSILON);
        assert_relative_eq!(rotation * Vec3::z(), tangent, epsilon = EPSILON);
    }

    #[test]
    fn test_left_handed_frame_keeps_normal_up() {
        let frame = frame(-Vec3::x(), Vec3::y(), Vec3::z());
        assert!(Mat3::from_columns(&[frame.binormal, frame.normal, frame.tangent]).determinant() < 0.0);

        let rotation = Transform::new(Vec3::zeros(), frame.euler_degrees()).rotation_matrix();
        assert_relative_eq!(rotation * Vec3::y(), Vec3::y(), epsilon = EPSILON);
        assert_relative_eq!(rotation * Vec3::z(), Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_half_turn_frame() {
        let frame = frame(Vec3::z(), -Vec3::y(), Vec3::x());
        let rotation = Transform::new(Vec3::zeros(), frame.euler_degrees()).rotation_matrix();
        assert_relative_eq!(rotation * Vec3::y(), -Vec3::y(), epsilon = EPSILON);
        assert_relative_eq!(rotation * Vec3::x(), Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_frame_is_finite() {
        let frame = frame(Vec3::zeros(), Vec3::zeros(), Vec3::zeros());
        assert!(frame.euler_degrees().iter().all(|v| v.is_finite()));
        assert_relative_eq!(frame.euler_degrees(), Vec3::zeros(), epsilon = EPSILON);
    }
}
