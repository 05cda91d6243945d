//! Deferred reference resolution
//!
//! Declared type and value references are queued as they are built and
//! resolved in one pass once every project of the session has been ingested.
//! A reference that does not resolve keeps an empty target; that is not an error.

use crate::symbols::SymbolTable;
use tracing::{debug, trace};
use tsgraph_core::graph::{TypeKind, ValueKind};
use tsgraph_core::{LinkedGraph, Result, TypeId, ValueId};

/// A node holding a [`tsgraph_core::DeferredRef`] slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSlot {
    Type(TypeId),
    Value(ValueId),
}

/// Outcome of [`ResolutionQueue::resolve_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub resolved: usize,
    pub unresolved: usize,
}

/// Queue of references waiting for the full symbol population
#[derive(Debug, Default)]
pub struct ResolutionQueue {
    pending: Vec<ReferenceSlot>,
}

impl ResolutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, slot: ReferenceSlot) {
        self.pending.push(slot);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fills every queued reference slot from the symbol table
    ///
    /// Consumes the queue, so it runs at most once per session.
    pub fn resolve_all(
        self,
        symbols: &SymbolTable,
        graph: &mut LinkedGraph,
    ) -> Result<ResolutionStats> {
        let mut stats = ResolutionStats::default();

        for slot in self.pending {
            let reference = match slot {
                ReferenceSlot::Type(id) => match &mut graph.type_node_mut(id)?.kind {
                    TypeKind::Declared { reference, .. } => reference,
                    _ => continue,
                },
                ReferenceSlot::Value(id) => match &mut graph.value_node_mut(id)?.kind {
                    ValueKind::Declared { reference } => reference,
                    _ => continue,
                },
            };

            // slots are filled exactly once
            if reference.is_resolved() {
                continue;
            }

            match symbols.lookup(&reference.fqn) {
                Some(target) => {
                    trace!("Resolved {} -> declaration {}", reference.fqn, target.index());
                    reference.target = Some(target);
                    stats.resolved += 1;
                }
                None => {
                    trace!("Unresolved reference {}", reference.fqn);
                    stats.unresolved += 1;
                }
            }
        }

        debug!(
            "Deferred resolution finished: {} resolved, {} unresolved",
            stats.resolved, stats.unresolved
        );
        Ok(stats)
    }
}
