//! Asset loading for the command line host
//!
//! Scenes and meshes come from disk here because there is no host
//! application to query: OBJ files provide polygon meshes and scene
//! snapshots (RON/TOML) describe whole scenes.

pub mod obj_loader;
pub mod snapshot;

pub use obj_loader::{ObjError, ObjLoader};
pub use snapshot::{SceneSnapshot, SnapshotObject, SnapshotShape};
