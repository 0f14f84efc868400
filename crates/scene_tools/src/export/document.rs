//! Scene script document model and text rendering
//!
//! ```text
//! @dblock pSphere1
//! $shape 5.0
//! $pos 1.0 2.0 3.0
//! $rot 0.0 0.0 0.0
//! $material "grey"
//! :dblock_commit
//!
//! @camera camera1
//! $pos 0.0 10.0 20.0
//! $rot -30.0 0.0 0.0
//!
//! ```

use crate::core::config::FloatFormat;
use crate::foundation::math::Vec3;

/// Create marker for design blocks
pub const DESIGN_BLOCK_TAG: &str = "dblock";
/// Create marker for cameras
pub const CAMERA_TAG: &str = "camera";
/// Command committing a design block
pub const DESIGN_BLOCK_COMMIT: &str = "dblock_commit";

/// Collision/render shape of a design block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// One value: radius
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Two values: radius and half height (read side only)
    Capsule {
        /// Capsule radius
        radius: f32,
        /// Half of the cylinder height
        half_height: f32,
    },
    /// Three values: half extents
    Box {
        /// Half width, half height, half depth
        half_extents: [f32; 3],
    },
}

impl Shape {
    /// Shape values in file order
    pub fn values(&self) -> Vec<f32> {
        match *self {
            Self::Sphere { radius } => vec![radius],
            Self::Capsule { radius, half_height } => vec![radius, half_height],
            Self::Box { half_extents } => half_extents.to_vec(),
        }
    }

    /// Shape from a `$shape` value list
    pub fn from_values(values: &[f32]) -> Option<Self> {
        match *values {
            [radius] => Some(Self::Sphere { radius }),
            [radius, half_height] => Some(Self::Capsule { radius, half_height }),
            [x, y, z] => Some(Self::Box { half_extents: [x, y, z] }),
            _ => None,
        }
    }
}

/// One exported sphere or box
#[derive(Debug, Clone, PartialEq)]
pub struct DesignBlock {
    /// Transform name
    pub name: String,
    /// Shape values
    pub shape: Shape,
    /// Translation
    pub position: Vec3,
    /// Euler rotation
    pub rotation: Vec3,
    /// Material name
    pub material: String,
}

/// One exported camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraBlock {
    /// Transform name
    pub name: String,
    /// Translation
    pub position: Vec3,
    /// Euler rotation
    pub rotation: Vec3,
}

/// A block of a scene script
#[derive(Debug, Clone, PartialEq)]
pub enum SceneBlock {
    /// `@dblock`
    Design(DesignBlock),
    /// `@camera`
    Camera(CameraBlock),
}

impl SceneBlock {
    /// Entity name
    pub fn name(&self) -> &str {
        match self {
            Self::Design(block) => &block.name,
            Self::Camera(block) => &block.name,
        }
    }

    /// Append this block's text
    pub fn write_to(&self, out: &mut String, format: FloatFormat) {
        match self {
            Self::Design(block) => {
                out.push_str(&format!("@{DESIGN_BLOCK_TAG} {}\n", block.name));
                out.push_str(&format!("$shape {}\n", format.join(&block.shape.values())));
                out.push_str(&format!("$pos {}\n", format.join(block.position.as_slice())));
                out.push_str(&format!("$rot {}\n", format.join(block.rotation.as_slice())));
                out.push_str(&format!("$material \"{}\"\n", block.material));
                out.push_str(&format!(":{DESIGN_BLOCK_COMMIT}\n\n"));
            }
            Self::Camera(block) => {
                out.push_str(&format!("@{CAMERA_TAG} {}\n", block.name));
                out.push_str(&format!("$pos {}\n", format.join(block.position.as_slice())));
                out.push_str(&format!("$rot {}\n\n", format.join(block.rotation.as_slice())));
            }
        }
    }
}

/// Ordered list of scene script blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDocument {
    /// Blocks in output order
    pub blocks: Vec<SceneBlock>,
}

impl SceneDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block
    pub fn push(&mut self, block: SceneBlock) {
        self.blocks.push(block);
    }

    /// Append all blocks of another document
    pub fn extend(&mut self, other: Self) {
        self.blocks.extend(other.blocks);
    }

    /// Design blocks in order
    pub fn design_blocks(&self) -> impl Iterator<Item = &DesignBlock> {
        self.blocks.iter().filter_map(|block| match block {
            SceneBlock::Design(design) => Some(design),
            SceneBlock::Camera(_) => None,
        })
    }

    /// Camera blocks in order
    pub fn camera_blocks(&self) -> impl Iterator<Item = &CameraBlock> {
        self.blocks.iter().filter_map(|block| match block {
            SceneBlock::Camera(camera) => Some(camera),
            SceneBlock::Design(_) => None,
        })
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render the document text
    pub fn render(&self, format: FloatFormat) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.write_to(&mut out, format);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_block() -> SceneBlock {
        SceneBlock::Design(DesignBlock {
            name: "pSphere1".to_string(),
            shape: Shape::Sphere { radius: 5.0 },
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::zeros(),
            material: "grey".to_string(),
        })
    }

    #[test]
    fn test_design_block_layout() {
        let mut document = SceneDocument::new();
        document.push(sphere_block());

        assert_eq!(
            document.render(FloatFormat::Compact),
            "@dblock pSphere1\n$shape 5\n$pos 1 2 3\n$rot 0 0 0\n$material \"grey\"\n:dblock_commit\n\n"
        );
        assert_eq!(
            document.render(FloatFormat::Repr),
            "@dblock pSphere1\n$shape 5.0\n$pos 1.0 2.0 3.0\n$rot 0.0 0.0 0.0\n$material \"grey\"\n:dblock_commit\n\n"
        );
    }

    #[test]
    fn test_camera_block_layout() {
        let mut document = SceneDocument::new();
        document.push(SceneBlock::Camera(CameraBlock {
            name: "camera1".to_string(),
            position: Vec3::new(0.0, 10.0, 20.5),
            rotation: Vec3::new(-30.0, 0.0, 0.0),
        }));

        assert_eq!(
            document.render(FloatFormat::Repr),
            "@camera camera1\n$pos 0.0 10.0 20.5\n$rot -30.0 0.0 0.0\n\n"
        );
    }

    #[test]
    fn test_shape_values() {
        assert_eq!(Shape::from_values(&[1.0, 2.0, 3.0]), Some(Shape::Box { half_extents: [1.0, 2.0, 3.0] }));
        assert_eq!(Shape::from_values(&[1.0, 2.0]), Some(Shape::Capsule { radius: 1.0, half_height: 2.0 }));
        assert_eq!(Shape::from_values(&[]), None);
        assert_eq!(Shape::from_values(&[1.0; 4]), None);
        assert_eq!(Shape::Box { half_extents: [1.0, 2.0, 3.0] }.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_block_filters() {
        let mut document = SceneDocument::new();
        document.push(sphere_block());
        document.push(SceneBlock::Camera(CameraBlock {
            name: "cam".to_string(),
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
        }));

        assert_eq!(document.design_blocks().count(), 1);
        assert_eq!(document.camera_blocks().count(), 1);
        assert_eq!(document.blocks[1].name(), "cam");
    }
}
