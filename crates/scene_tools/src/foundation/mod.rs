//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the tools:
//! - Math types and Euler angle conversions
//! - Handle-based collections for scene nodes
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
