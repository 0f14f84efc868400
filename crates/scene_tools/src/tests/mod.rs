//! End-to-end tests across the export, script and conversion layers

mod mesh_conversion;
