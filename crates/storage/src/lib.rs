//! Persistence of linked declaration graphs
//!
//! [`GraphStore`] is the boundary to a property-graph backend. The crate
//! ships [`MemoryGraphStore`] and [`persist_graph`], which writes every node
//! and edge of a [`tsgraph_core::LinkedGraph`] through the trait.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod error;
pub mod memory;
pub mod persist;
pub mod traits;

pub use error::StorageError;
pub use memory::{GraphSnapshot, MemoryGraphStore, StoredEdge, StoredNode};
pub use persist::{persist_graph, PersistStats};
pub use traits::{GraphStore, NodeHandle, Properties, PropertyValue};
