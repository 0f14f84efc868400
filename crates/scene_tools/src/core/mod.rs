//! # Core Module
//!
//! Shared configuration used by every tool in the crate.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for logging, export and conversion
//! - **Foundation**: Low-level utilities (math, collections, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ToolsConfig,
    LoggingConfig,
    ExportConfig,
    ConvertConfig,
    BlockOrder,
    FloatFormat,
    BoxSizeRule,
    Config,
    ConfigError,
};
