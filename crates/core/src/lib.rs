//! Core types for the tsgraph declaration linker
//!
//! This crate provides the foundational pieces shared by the linker, the
//! storage layer and the CLI:
//!
//! - **Records**: raw analyzer output, every cross reference still a string FQN
//! - **Graph**: the linked property graph produced by a linking session
//! - **Configuration**: linker and output settings
//! - **Error handling**: unified error types
//!

#![cfg_attr(not(test), deny(clippy::unwrap_used))]

pub mod config;
pub mod error;
pub mod graph;
pub mod records;

// Re-export main types for convenience
pub use config::{Config, LinkerConfig, OutputConfig};
pub use error::{Error, Result, ResultExt};
pub use graph::{
    DeclId, Declaration, DeclarationBuilder, DeclarationKind, DeferredRef, DependencyEdge,
    ElementId, ExportEdge, LinkReport, LinkedGraph, ProjectId, TypeId, TypeKind, ValueId,
    ValueKind,
};
pub use records::{ProjectRecord, ScanInput};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::graph::{DeclId, LinkedGraph};
}
