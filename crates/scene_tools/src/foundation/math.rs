//! Math utilities and types
//!
//! Provides the vector and matrix types shared by the exporter and the mesh
//! converter, plus the Euler angle conventions used by scene transforms.

pub use nalgebra::{
    Vector2, Vector3,
    Matrix3, Matrix4,
    Rotation3,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Rotation matrix type
pub type Rot3 = Rotation3<f32>;

/// Scene transform: translation plus XYZ Euler rotation in degrees
///
/// The rotation order is X, then Y, then Z applied to a column vector,
/// i.e. `R = Rz * Ry * Rx`. Angles are stored in degrees because that is
/// how scene transform attributes are authored and exported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in parent space
    pub translation: Vec3,

    /// Euler rotation in degrees (XYZ order)
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with translation and rotation
    pub fn new(translation: Vec3, rotation: Vec3) -> Self {
        Self { translation, rotation }
    }

    /// Rotation part as a rotation matrix
    pub fn rotation_matrix(&self) -> Rot3 {
        euler::to_rotation(&utils::deg_to_rad_vec(self.rotation))
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation) * self.rotation_matrix().to_homogeneous()
    }

    /// Create a transform from a transformation matrix
    ///
    /// Scale and shear are discarded: the rotation is the closest proper
    /// rotation to the upper 3x3 block.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let translation = Vec3::new(matrix.m14, matrix.m24, matrix.m34);
        let upper = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let rotation = closest_rotation(&upper);

        Self {
            translation,
            rotation: utils::rad_to_deg_vec(euler::from_rotation(&rotation)),
        }
    }
}

/// Relative volume below which a 3x3 matrix counts as degenerate
const DEGENERATE_EPSILON: f32 = 1.0e-6;

/// Closest proper rotation to an arbitrary 3x3 matrix
///
/// Uses the polar decomposition `U * V^T` of the SVD. A reflection is turned
/// into a rotation by flipping the axis of the smallest singular value. A
/// zero or otherwise degenerate matrix yields the identity.
pub fn closest_rotation(matrix: &Mat3) -> Rot3 {
    if !matrix.iter().all(|v| v.is_finite()) {
        return Rot3::identity();
    }

    let scale: f32 = matrix.column_iter().map(|column| column.norm()).product();
    if scale <= f32::EPSILON || matrix.determinant().abs() <= DEGENERATE_EPSILON * scale {
        return Rot3::identity();
    }

    let svd = matrix.svd(true, true);
    let (Some(mut u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Rot3::identity();
    };
    if (u * v_t).determinant() < 0.0 {
        let smallest = svd.singular_values.imin();
        let flipped = -u.column(smallest);
        u.set_column(smallest, &flipped);
    }
    Rot3::from_matrix_unchecked(u * v_t)
}

/// XYZ Euler angle conversions (radians)
pub mod euler {
    use super::{Rot3, Vec3};

    /// Build a rotation from XYZ Euler angles in radians
    pub fn to_rotation(angles: &Vec3) -> Rot3 {
        Rot3::from_euler_angles(angles.x, angles.y, angles.z)
    }

    /// Decompose a rotation into XYZ Euler angles in radians
    pub fn from_rotation(rotation: &Rot3) -> Vec3 {
        let (x, y, z) = rotation.euler_angles();
        Vec3::new(x, y, z)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Convert a vector of angles from degrees to radians
    pub fn deg_to_rad_vec(degrees: Vec3) -> Vec3 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert a vector of angles from radians to degrees
    pub fn rad_to_deg_vec(radians: Vec3) -> Vec3 {
        radians * constants::RAD_TO_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_euler_xyz_order() {
        // 90 degrees about X then 90 degrees about Z
        let transform = Transform::new(Vec3::zeros(), Vec3::new(90.0, 0.0, 90.0));
        let rotated = transform.rotation_matrix() * Vec3::new(0.0, 1.0, 0.0);

        // X takes +Y to +Z, Z leaves +Z alone
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let original = Transform::new(Vec3::new(1.0, -2.0, 3.5), Vec3::new(30.0, -45.0, 60.0));
        let restored = Transform::from_matrix(&original.to_matrix());

        assert_relative_eq!(restored.translation, original.translation, epsilon = EPSILON);
        assert_relative_eq!(restored.rotation, original.rotation, epsilon = 1e-2);
    }

    #[test]
    fn test_from_matrix_discards_scale() {
        let rotation = Transform::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 45.0)).rotation_matrix();
        let scaled = rotation.matrix() * 3.0;
        let mut matrix = scaled.to_homogeneous();
        matrix.m14 = 4.0;

        let transform = Transform::from_matrix(&matrix);
        assert_relative_eq!(transform.rotation, Vec3::new(0.0, 0.0, 45.0), epsilon = 1e-2);
        assert_relative_eq!(transform.translation, Vec3::new(4.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_closest_rotation_of_zero_matrix_is_identity() {
        let rotation = closest_rotation(&Mat3::zeros());
        assert_relative_eq!(*rotation.matrix(), Mat3::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_closest_rotation_of_half_turn() {
        // 180 degrees about (X + Z): X and Z swap, Y flips
        let half_turn = Mat3::from_columns(&[Vec3::z(), -Vec3::y(), Vec3::x()]);
        let rotation = closest_rotation(&half_turn);
        assert_relative_eq!(*rotation.matrix(), half_turn, epsilon = EPSILON);
    }

    #[test]
    fn test_closest_rotation_of_rank_deficient_matrix_is_identity() {
        let flat = Mat3::from_columns(&[Vec3::zeros(), Vec3::zeros(), Vec3::x()]);
        assert_relative_eq!(*closest_rotation(&flat).matrix(), Mat3::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_degree_conversions() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::rad_to_deg(constants::PI / 2.0), 90.0, epsilon = EPSILON);
    }
}
