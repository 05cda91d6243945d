use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tsgraph_core::Result;

/// Opaque handle of a stored node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(pub u64);

/// A node or edge property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    Json(serde_json::Value),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// Store primitives needed to persist a linked graph
///
/// Implementations must reject labels, edge kinds and property keys that are
/// not plain identifiers, since backends may interpolate them into queries.
pub trait GraphStore: Send + Sync {
    /// Create a node carrying `labels`
    fn create_node(&self, labels: &[&str], properties: Properties) -> Result<NodeHandle>;

    /// Create a directed edge
    fn create_edge(
        &self,
        from: NodeHandle,
        to: NodeHandle,
        kind: &str,
        properties: Properties,
    ) -> Result<()>;

    /// Return the node stored under `key`, creating it on first use
    ///
    /// Labels and properties are only applied when the node is created.
    fn find_or_create_node(
        &self,
        key: &str,
        labels: &[&str],
        properties: Properties,
    ) -> Result<NodeHandle>;
}

/// Labels and property keys: an ASCII letter followed by letters, digits or `_`
pub fn validate_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Edge kinds: upper-case words joined by `_`, such as `DEPENDS_ON`
pub fn validate_edge_kind(kind: &str) -> bool {
    let mut chars = kind.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

pub(crate) fn check_labels(labels: &[&str]) -> std::result::Result<(), StorageError> {
    match labels.iter().find(|label| !validate_identifier(label)) {
        Some(label) => Err(StorageError::InvalidLabel(label.to_string())),
        None => Ok(()),
    }
}

pub(crate) fn check_properties(properties: &Properties) -> std::result::Result<(), StorageError> {
    match properties.keys().find(|key| !validate_identifier(key)) {
        Some(key) => Err(StorageError::InvalidPropertyKey(key.clone())),
        None => Ok(()),
    }
}

pub(crate) fn check_edge_kind(kind: &str) -> std::result::Result<(), StorageError> {
    if validate_edge_kind(kind) {
        Ok(())
    } else {
        Err(StorageError::InvalidEdgeKind(kind.to_string()))
    }
}
