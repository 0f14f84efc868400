//! OBJ file loader for polygon meshes
//!
//! Faces keep their vertex count and winding; normals in the file are
//! ignored because face normals are recomputed from positions.

use crate::foundation::math::{Vec2, Vec3};
use crate::scene::{Face, PolygonMesh};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed value
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Structurally invalid file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ reader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a polygon mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<PolygonMesh, ObjError> {
        let file = File::open(path)?;
        Self::read_obj(BufReader::new(file))
    }

    /// Parse OBJ text
    pub fn parse_obj(contents: &str) -> Result<PolygonMesh, ObjError> {
        Self::read_obj(contents.as_bytes())
    }

    fn read_obj<R: Read>(reader: R) -> Result<PolygonMesh, ObjError> {
        let reader = BufReader::new(reader);

        let mut positions = Vec::new();
        let mut tex_coords = Vec::new();
        let mut faces = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(command) = parts.next() else {
                continue;
            };
            let args: Vec<&str> = parts.collect();

            match command {
                "v" => {
                    if args.len() < 3 {
                        return Err(ObjError::ParseError(format!("Line {}: vertex needs 3 values", line_num + 1)));
                    }
                    positions.push(Vec3::new(
                        Self::parse_f32(args[0], line_num, "vertex x")?,
                        Self::parse_f32(args[1], line_num, "vertex y")?,
                        Self::parse_f32(args[2], line_num, "vertex z")?,
                    ));
                }
                "vt" => {
                    if args.len() < 2 {
                        return Err(ObjError::ParseError(format!("Line {}: tex coord needs 2 values", line_num + 1)));
                    }
                    tex_coords.push(Vec2::new(
                        Self::parse_f32(args[0], line_num, "tex coord u")?,
                        Self::parse_f32(args[1], line_num, "tex coord v")?,
                    ));
                }
                "f" => {
                    if args.len() < 3 {
                        return Err(ObjError::InvalidFormat(format!("Line {}: face needs at least 3 vertices", line_num + 1)));
                    }
                    faces.push(Self::parse_face(&args, line_num, positions.len(), tex_coords.len())?);
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        if faces.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        PolygonMesh::new(positions, tex_coords, faces).map_err(ObjError::InvalidFormat)
    }

    fn parse_face(args: &[&str], line_num: usize, position_count: usize, tex_count: usize) -> Result<Face, ObjError> {
        let mut position_indices = Vec::with_capacity(args.len());
        let mut uv_indices = Vec::with_capacity(args.len());

        for vertex_data in args {
            let mut indices_parts = vertex_data.split('/');

            let pos_token = indices_parts.next().unwrap_or_default();
            position_indices.push(Self::resolve_index(pos_token, position_count, line_num)?);

            // Texture coordinate index if present
            if let Some(tex_token) = indices_parts.next().filter(|t| !t.is_empty()) {
                uv_indices.push(Self::resolve_index(tex_token, tex_count, line_num)?);
            }
        }

        // Partial UV assignments are dropped
        if uv_indices.len() != position_indices.len() {
            uv_indices.clear();
        }

        Ok(Face::with_uvs(position_indices, uv_indices))
    }

    /// OBJ indices are 1-based; negative values count back from the end
    fn resolve_index(token: &str, count: usize, line_num: usize) -> Result<usize, ObjError> {
        let raw: i64 = token
            .parse()
            .map_err(|_| ObjError::ParseError(format!("Line {}: invalid index '{}'", line_num + 1, token)))?;

        let resolved = match raw {
            0 => None,
            n if n > 0 => usize::try_from(n - 1).ok(),
            n => usize::try_from(-n).ok().and_then(|back| count.checked_sub(back)),
        };

        resolved
            .filter(|index| *index < count)
            .ok_or_else(|| ObjError::InvalidFormat(format!("Line {}: index {} out of bounds", line_num + 1, raw)))
    }

    fn parse_f32(token: &str, line_num: usize, what: &str) -> Result<f32, ObjError> {
        token
            .parse::<f32>()
            .map_err(|_| ObjError::ParseError(format!("Line {}: invalid {} '{}'", line_num + 1, what, token)))
    }
}
