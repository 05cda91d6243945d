//! Declaration linker
//!
//! Turns the flat, string-referencing analyzer output of one or more projects
//! into a single cross-referenced [`LinkedGraph`]:
//!
//! - **Symbol table**: global FQN to declaration, first registration wins
//! - **Deferred resolution**: declared references resolved after all projects
//! - **Type-parameter scopes**: lexical resolution of generic parameters
//! - **Dependency graph**: containment-aware propagation and aggregation
//! - **Linkage**: exports, project references and render edges
//!

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod dependencies;
pub mod exports;
pub mod ingest;
pub mod projects;
pub mod render;
pub mod resolution;
pub mod session;
pub mod symbols;
pub mod type_params;

pub use dependencies::{DependencyBuild, DependencyGraphBuilder};
pub use session::LinkSession;
pub use symbols::SymbolTable;
pub use type_params::TypeParameterScopes;

use tsgraph_core::{LinkedGraph, LinkerConfig, Result, ScanInput};

/// Links `input` in a fresh session
pub fn link(config: &LinkerConfig, input: &ScanInput) -> Result<LinkedGraph> {
    LinkSession::new(config.clone()).link(input)
}
