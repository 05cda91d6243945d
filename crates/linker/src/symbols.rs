//! Global FQN symbol table
//!
//! One table is shared by every project of a linking session so that
//! cross-project references resolve against the full symbol population.

use std::collections::HashMap;
use tsgraph_core::DeclId;
use tracing::{debug, info, warn};

/// Mapping from global FQN to the declaration registered under it
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, DeclId>,
    /// Registration order, used for deterministic dumps
    order: Vec<String>,
    duplicates: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration under its global FQN
    ///
    /// The first registration of an FQN wins. A later registration of the same
    /// FQN is dropped with a warning and `false` is returned.
    pub fn register(&mut self, fqn: &str, id: DeclId) -> bool {
        if let Some(existing) = self.entries.get(fqn) {
            warn!(
                "FQN {} already registered (declaration {}), dropping declaration {}",
                fqn,
                existing.index(),
                id.index()
            );
            self.duplicates += 1;
            return false;
        }
        self.entries.insert(fqn.to_string(), id);
        self.order.push(fqn.to_string());
        true
    }

    pub fn lookup(&self, fqn: &str) -> Option<DeclId> {
        self.entries.get(fqn).copied()
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.entries.contains_key(fqn)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of dropped duplicate registrations
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Registered FQNs in registration order
    pub fn fqns(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Dumps every registered FQN at debug level and the total at info level
    pub fn log_all(&self) {
        for fqn in self.fqns() {
            debug!("Registered FQN: {}", fqn);
        }
        info!("{} FQNs registered", self.len());
    }
}
