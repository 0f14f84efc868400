//! Rebuilds scene documents from scene script text
//!
//! Design blocks only enter the document on `:dblock_commit`, and only when
//! they carry a name, a shape and a material. Camera blocks have no commit
//! command; a camera is complete when the next object starts or the input
//! ends. Problems with single statements are logged and the statement is
//! skipped, unless the reader is strict.

use std::path::Path;

use super::parser::{parse_line, AttribData, ScriptEvent};
use super::ScriptError;
use crate::export::document::{CAMERA_TAG, DESIGN_BLOCK_COMMIT, DESIGN_BLOCK_TAG};
use crate::export::{CameraBlock, DesignBlock, SceneBlock, SceneDocument, Shape};
use crate::foundation::math::Vec3;

#[derive(Debug, Default)]
struct PendingDesignBlock {
    name: String,
    shape: Option<Shape>,
    position: Vec3,
    rotation: Vec3,
    material: Option<String>,
}

impl PendingDesignBlock {
    fn finish(self) -> Result<DesignBlock, String> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.shape.is_none() {
            missing.push("shape");
        }
        if self.material.is_none() {
            missing.push("material");
        }

        match (self.shape, self.material) {
            (Some(shape), Some(material)) if missing.is_empty() => Ok(DesignBlock {
                name: self.name,
                shape,
                position: self.position,
                rotation: self.rotation,
                material,
            }),
            _ => Err(format!("design block '{}' is missing {}", self.name, missing.join(", "))),
        }
    }
}

#[derive(Debug)]
enum Current {
    None,
    Design(PendingDesignBlock),
    Camera(CameraBlock),
    Other(String),
}

/// Reads scene scripts into [`SceneDocument`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneScriptReader {
    strict: bool,
}

impl SceneScriptReader {
    /// Create a lenient reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: fail on the first bad statement instead of skipping it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read a scene script file
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<SceneDocument, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Reading scene script {}", path.display());
        self.read(&text)
    }

    /// Read scene script text
    pub fn read(&self, text: &str) -> Result<SceneDocument, ScriptError> {
        let mut document = SceneDocument::new();
        let mut current = Current::None;

        for (index, line) in text.lines().enumerate() {
            let event = match parse_line(line, index + 1) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    log::error!("{}", e);
                    continue;
                }
            };

            match event {
                ScriptEvent::Create { type_name, name } => {
                    Self::close(&mut document, std::mem::replace(&mut current, Current::None));
                    current = match type_name.as_str() {
                        DESIGN_BLOCK_TAG => Current::Design(PendingDesignBlock { name, ..Default::default() }),
                        CAMERA_TAG => Current::Camera(CameraBlock {
                            name,
                            position: Vec3::zeros(),
                            rotation: Vec3::zeros(),
                        }),
                        _ => {
                            log::warn!("line {}: unknown object type '{}'", index + 1, type_name);
                            Current::Other(type_name)
                        }
                    };
                }
                ScriptEvent::Attribute { name, data } => {
                    Self::apply_attribute(&mut current, &name, &data, index + 1);
                }
                ScriptEvent::Command { name, .. } => {
                    if name == DESIGN_BLOCK_COMMIT {
                        match std::mem::replace(&mut current, Current::None) {
                            Current::Design(pending) => match pending.finish() {
                                Ok(block) => document.push(SceneBlock::Design(block)),
                                Err(e) => log::error!("line {}: {}", index + 1, e),
                            },
                            other => {
                                log::warn!("line {}: '{}' outside a design block", index + 1, name);
                                current = other;
                            }
                        }
                    } else {
                        log::debug!("line {}: ignoring command '{}'", index + 1, name);
                    }
                }
            }
        }

        Self::close(&mut document, current);
        log::debug!("Read {} scene block(s)", document.len());
        Ok(document)
    }

    fn apply_attribute(current: &mut Current, name: &str, data: &AttribData, line: usize) {
        match current {
            Current::Design(block) => match name {
                "shape" => match data.numbers().and_then(Shape::from_values) {
                    Some(shape) => block.shape = Some(shape),
                    None => log::error!("line {}: $shape expects 1 to 3 numbers, got {:?}", line, data),
                },
                "pos" => Self::set_vec3(&mut block.position, name, data, line),
                "rot" => Self::set_vec3(&mut block.rotation, name, data, line),
                "material" => match data.text() {
                    Some(material) => block.material = Some(material.to_string()),
                    None => log::error!("line {}: $material expects a string", line),
                },
                _ => log::warn!("line {}: unknown design block attribute '{}'", line, name),
            },
            Current::Camera(camera) => match name {
                "pos" => Self::set_vec3(&mut camera.position, name, data, line),
                "rot" => Self::set_vec3(&mut camera.rotation, name, data, line),
                _ => log::warn!("line {}: unknown camera attribute '{}'", line, name),
            },
            Current::Other(type_name) => {
                log::debug!("line {}: ignoring '{}' on '{}'", line, name, type_name);
            }
            Current::None => {
                log::debug!("line {}: attribute '{}' outside any object", line, name);
            }
        }
    }

    fn set_vec3(target: &mut Vec3, name: &str, data: &AttribData, line: usize) {
        match data.numbers() {
            Some(&[x, y, z]) => *target = Vec3::new(x, y, z),
            _ => log::error!("line {}: ${} expects 3 numbers, got {:?}", line, name, data),
        }
    }

    fn close(document: &mut SceneDocument, current: Current) {
        match current {
            Current::Camera(camera) if camera.name.is_empty() => log::error!("camera block without a name"),
            Current::Camera(camera) => document.push(SceneBlock::Camera(camera)),
            Current::Design(pending) => {
                log::warn!("design block '{}' was never committed", pending.name);
            }
            Current::Other(_) | Current::None => {}
        }
    }
}
