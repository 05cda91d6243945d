//! In-memory graph store
//!
//! Backs the CLI and the tests. Data sits behind `Arc<Mutex<_>>` so clones
//! share one store.

use crate::error::StorageError;
use crate::traits::{
    check_edge_kind, check_labels, check_properties, GraphStore, NodeHandle, Properties,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;
use tsgraph_core::Result;

/// A stored node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredNode {
    pub handle: NodeHandle,
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl StoredNode {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A stored edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEdge {
    pub from: NodeHandle,
    pub to: NodeHandle,
    pub kind: String,
    pub properties: Properties,
}

/// Serializable copy of the store contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<StoredNode>,
    pub edges: Vec<StoredEdge>,
}

#[derive(Debug, Default)]
struct MemoryData {
    nodes: Vec<StoredNode>,
    edges: Vec<StoredEdge>,
    keys: HashMap<String, NodeHandle>,
}

impl MemoryData {
    fn insert_node(&mut self, labels: &[&str], properties: Properties) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len() as u64);
        self.nodes.push(StoredNode {
            handle,
            labels: labels.iter().map(|label| label.to_string()).collect(),
            properties,
        });
        handle
    }

    fn get(&self, handle: NodeHandle) -> Option<&StoredNode> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.nodes.get(index))
    }

    fn contains(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGraphStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, MemoryData>, StorageError> {
        self.data.lock().map_err(|_| StorageError::LockPoisoned)
    }

    pub fn node_count(&self) -> Result<usize> {
        Ok(self.lock()?.nodes.len())
    }

    pub fn edge_count(&self) -> Result<usize> {
        Ok(self.lock()?.edges.len())
    }

    pub fn node(&self, handle: NodeHandle) -> Result<StoredNode> {
        self.lock()?
            .get(handle)
            .cloned()
            .ok_or_else(|| StorageError::NodeNotFound(handle.0).into())
    }

    pub fn nodes_with_label(&self, label: &str) -> Result<Vec<StoredNode>> {
        Ok(self
            .lock()?
            .nodes
            .iter()
            .filter(|node| node.has_label(label))
            .cloned()
            .collect())
    }

    pub fn edges_of_kind(&self, kind: &str) -> Result<Vec<StoredEdge>> {
        Ok(self
            .lock()?
            .edges
            .iter()
            .filter(|edge| edge.kind == kind)
            .cloned()
            .collect())
    }

    /// Node count per label, sorted by label
    pub fn label_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for node in &self.lock()?.nodes {
            for label in &node.labels {
                *counts.entry(label.clone()).or_default() += 1;
            }
        }
        Ok(counts)
    }

    /// Edge count per kind, sorted by kind
    pub fn edge_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for edge in &self.lock()?.edges {
            *counts.entry(edge.kind.clone()).or_default() += 1;
        }
        Ok(counts)
    }

    pub fn snapshot(&self) -> Result<GraphSnapshot> {
        let data = self.lock()?;
        Ok(GraphSnapshot {
            nodes: data.nodes.clone(),
            edges: data.edges.clone(),
        })
    }
}

impl GraphStore for MemoryGraphStore {
    fn create_node(&self, labels: &[&str], properties: Properties) -> Result<NodeHandle> {
        check_labels(labels)?;
        check_properties(&properties)?;
        let handle = self.lock()?.insert_node(labels, properties);
        trace!("Created node {} {:?}", handle.0, labels);
        Ok(handle)
    }

    fn create_edge(
        &self,
        from: NodeHandle,
        to: NodeHandle,
        kind: &str,
        properties: Properties,
    ) -> Result<()> {
        check_edge_kind(kind)?;
        check_properties(&properties)?;
        let mut data = self.lock()?;
        for handle in [from, to] {
            if !data.contains(handle) {
                return Err(StorageError::NodeNotFound(handle.0).into());
            }
        }
        data.edges.push(StoredEdge {
            from,
            to,
            kind: kind.to_string(),
            properties,
        });
        Ok(())
    }

    fn find_or_create_node(
        &self,
        key: &str,
        labels: &[&str],
        properties: Properties,
    ) -> Result<NodeHandle> {
        check_labels(labels)?;
        check_properties(&properties)?;
        let mut data = self.lock()?;
        if let Some(handle) = data.keys.get(key) {
            return Ok(*handle);
        }
        let handle = data.insert_node(labels, properties);
        data.keys.insert(key.to_string(), handle);
        Ok(handle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::traits::PropertyValue;
    use pretty_assertions::assert_eq;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), PropertyValue::from(*value)))
            .collect()
    }

    #[test]
    fn test_create_and_count() {
        let store = MemoryGraphStore::new();
        let a = store
            .create_node(&["TS", "Class"], props(&[("name", "A")]))
            .unwrap();
        let b = store
            .create_node(&["TS", "Interface"], props(&[("name", "B")]))
            .unwrap();
        store
            .create_edge(a, b, "IMPLEMENTS", Properties::new())
            .unwrap();

        assert_eq!(store.node_count().unwrap(), 2);
        assert_eq!(store.edge_count().unwrap(), 1);
        assert_eq!(store.nodes_with_label("TS").unwrap().len(), 2);
        assert_eq!(store.label_counts().unwrap().get("Class"), Some(&1));
        assert_eq!(store.edge_counts().unwrap().get("IMPLEMENTS"), Some(&1));
        assert_eq!(
            store.node(b).unwrap().properties.get("name"),
            Some(&PropertyValue::from("B"))
        );
    }

    #[test]
    fn test_find_or_create_is_keyed() {
        let store = MemoryGraphStore::new();
        let first = store
            .find_or_create_node("file:/a.ts", &["File"], props(&[("fileName", "/a.ts")]))
            .unwrap();
        let second = store
            .find_or_create_node("file:/a.ts", &["File"], Properties::new())
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.node_count().unwrap(), 1);
        assert!(store.node(first).unwrap().properties.contains_key("fileName"));
    }

    #[test]
    fn test_rejects_invalid_names() {
        let store = MemoryGraphStore::new();
        assert!(store.create_node(&["Bad Label"], Properties::new()).is_err());
        assert!(store
            .create_node(&["TS"], props(&[("bad-key", "x")]))
            .is_err());

        let a = store.create_node(&["TS"], Properties::new()).unwrap();
        assert!(store
            .create_edge(a, a, "depends_on", Properties::new())
            .is_err());
        assert_eq!(store.edge_count().unwrap(), 0);
    }

    #[test]
    fn test_edge_to_unknown_node_fails() {
        let store = MemoryGraphStore::new();
        let a = store.create_node(&["TS"], Properties::new()).unwrap();
        let result = store.create_edge(a, NodeHandle(42), "DECLARES", Properties::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_handle_beyond_address_space_is_not_found() {
        let store = MemoryGraphStore::new();
        let a = store.create_node(&["TS"], Properties::new()).unwrap();
        // would alias handle 0 if narrowed to a 32-bit index
        let foreign = NodeHandle(1 << 32);

        assert!(store.node(foreign).is_err());
        assert!(store
            .create_edge(a, foreign, "DECLARES", Properties::new())
            .is_err());
        assert_eq!(store.edge_count().unwrap(), 0);
    }

    #[test]
    fn test_clones_share_data() {
        let store = MemoryGraphStore::new();
        let clone = store.clone();
        clone.create_node(&["TS"], Properties::new()).unwrap();
        assert_eq!(store.node_count().unwrap(), 1);
    }
}
