//! Dependency graph builder
//!
//! Turns raw `(source, target, cardinality)` tallies into weighted edges between
//! declarations. A dependency on a nested declaration is generalized to its
//! containers, and a dependency of a nested declaration to the containers of
//! the source. Propagation runs once against a fixed snapshot, never to a
//! fixpoint. Parallel edges are then merged by summing their cardinalities and
//! self-loops are removed.

use crate::symbols::SymbolTable;
use std::collections::BTreeMap;
use tracing::{debug, info};
use tsgraph_core::records::DependencyRecord;
use tsgraph_core::{DeclId, DependencyEdge, LinkedGraph};

/// Result of one dependency build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyBuild {
    /// Aggregated edges, ordered by source and target
    pub edges: Vec<DependencyEdge>,
    /// Raw tallies dropped because an endpoint did not resolve
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DependencyGraphBuilder {
    propagate: bool,
}

impl Default for DependencyGraphBuilder {
    fn default() -> Self {
        Self { propagate: true }
    }
}

impl DependencyGraphBuilder {
    pub fn new(propagate: bool) -> Self {
        Self { propagate }
    }

    /// Resolves raw tallies through the symbol table and builds the edge set
    pub fn build<'r>(
        &self,
        records: impl IntoIterator<Item = &'r DependencyRecord>,
        symbols: &SymbolTable,
        graph: &LinkedGraph,
    ) -> DependencyBuild {
        let mut direct = Vec::new();
        let mut dropped = 0;

        for record in records {
            let source = symbols.lookup(&record.global_source_fqn);
            let target = symbols.lookup(&record.global_fqn);
            match (source, target) {
                (Some(source), Some(target)) => direct.push(DependencyEdge {
                    source,
                    target,
                    cardinality: record.cardinality,
                }),
                _ => {
                    debug!(
                        "Dropping dependency {} -> {}: endpoint not found",
                        record.global_source_fqn, record.global_fqn
                    );
                    dropped += 1;
                }
            }
        }

        let edges = self.build_edges(&direct, graph);
        info!(
            "Built {} dependency edges from {} direct dependencies ({} dropped)",
            edges.len(),
            direct.len(),
            dropped
        );
        DependencyBuild { edges, dropped }
    }

    /// Propagates, aggregates and cleans a set of direct edges
    pub fn build_edges(
        &self,
        direct: &[DependencyEdge],
        graph: &LinkedGraph,
    ) -> Vec<DependencyEdge> {
        let mut edges = direct.to_vec();

        if self.propagate {
            let target_propagated = propagate_to_target_parents(direct, graph);
            edges.extend_from_slice(&target_propagated);
            // sources generalize over direct and target-propagated edges alike
            let source_propagated = propagate_from_source_parents(&edges, graph);
            edges.extend(source_propagated);
        }

        aggregate(&edges)
    }
}

/// `decl -> target` implies `decl -> p` for every container `p` of `target`
/// that does not itself contain `decl`
fn propagate_to_target_parents(
    edges: &[DependencyEdge],
    graph: &LinkedGraph,
) -> Vec<DependencyEdge> {
    let mut propagated = Vec::new();
    for edge in edges {
        for parent in graph.ancestors(edge.target) {
            if !graph.is_ancestor(parent, edge.source) {
                propagated.push(DependencyEdge {
                    source: edge.source,
                    target: parent,
                    cardinality: edge.cardinality,
                });
            }
        }
    }
    propagated
}

/// `decl -> target` implies `p -> target` for every container `p` of `decl`
/// that does not itself contain `target`
fn propagate_from_source_parents(
    edges: &[DependencyEdge],
    graph: &LinkedGraph,
) -> Vec<DependencyEdge> {
    let mut propagated = Vec::new();
    for edge in edges {
        for parent in graph.ancestors(edge.source) {
            if !graph.is_ancestor(parent, edge.target) {
                propagated.push(DependencyEdge {
                    source: parent,
                    target: edge.target,
                    cardinality: edge.cardinality,
                });
            }
        }
    }
    propagated
}

/// Sums parallel edges into one, saturating at `u32::MAX`, and removes self-loops
fn aggregate(edges: &[DependencyEdge]) -> Vec<DependencyEdge> {
    let mut merged: BTreeMap<(DeclId, DeclId), u32> = BTreeMap::new();
    for edge in edges {
        let cardinality = merged.entry((edge.source, edge.target)).or_default();
        *cardinality = cardinality.saturating_add(edge.cardinality);
    }
    merged
        .into_iter()
        .filter(|((source, target), _)| source != target)
        .map(|((source, target), cardinality)| DependencyEdge {
            source,
            target,
            cardinality,
        })
        .collect()
}
