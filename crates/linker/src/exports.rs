//! Export linkage
//!
//! Wires module export statements and external module declarations to the
//! declarations they expose. Both ends are resolved through the symbol table;
//! an export whose ends do not resolve is not linked.

use crate::symbols::SymbolTable;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use tsgraph_core::records::{ExportKind, ExportRecord, ExternalModuleRecord};
use tsgraph_core::{DeclId, ExportEdge, LinkedGraph, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub linked: usize,
    pub skipped_namespace: usize,
    pub unresolved: usize,
}

/// Collects export edges, dropping exact duplicates
#[derive(Debug, Default)]
pub struct ExportLinker {
    seen: HashSet<(DeclId, DeclId, String)>,
    stats: ExportStats,
}

impl ExportLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links export statements of internal modules
    ///
    /// The edge carries the alias when present, the exported identifier otherwise.
    pub fn link_exports<'r>(
        &mut self,
        records: impl IntoIterator<Item = &'r ExportRecord>,
        symbols: &SymbolTable,
        graph: &mut LinkedGraph,
    ) -> Result<()> {
        for record in records {
            if record.kind == ExportKind::Namespace {
                warn!(
                    "Skipping namespace export {} of {}: namespace re-exports are not supported",
                    record.identifier, record.source_file_path_absolute
                );
                self.stats.skipped_namespace += 1;
                continue;
            }

            let module = symbols.lookup(&record.source_file_path_absolute);
            let target = record
                .global_decl_fqn
                .as_deref()
                .and_then(|fqn| symbols.lookup(fqn));
            let (Some(module), Some(target)) = (module, target) else {
                debug!(
                    "Unresolved export {} of {} (target {:?})",
                    record.identifier, record.source_file_path_absolute, record.global_decl_fqn
                );
                self.stats.unresolved += 1;
                continue;
            };

            if !graph.declaration(module)?.kind.is_module() {
                debug!(
                    "Export source {} is not a module",
                    record.source_file_path_absolute
                );
                self.stats.unresolved += 1;
                continue;
            }

            let exported_name = record.alias.as_deref().unwrap_or(&record.identifier);
            self.push(graph, module, target, exported_name);
        }
        Ok(())
    }

    /// Links external modules to their declarations under each declaration's own name
    pub fn link_external_exports<'r>(
        &mut self,
        records: impl IntoIterator<Item = &'r ExternalModuleRecord>,
        symbols: &SymbolTable,
        graph: &mut LinkedGraph,
    ) -> Result<()> {
        for record in records {
            let Some(module) = symbols.lookup(&record.global_fqn) else {
                self.stats.unresolved += record.declarations.len();
                continue;
            };
            if !graph.declaration(module)?.kind.is_external_module() {
                debug!("{} is not an external module", record.global_fqn);
                self.stats.unresolved += record.declarations.len();
                continue;
            }

            for declaration in &record.declarations {
                match symbols.lookup(&declaration.global_fqn) {
                    Some(target) => self.push(graph, module, target, &declaration.name),
                    None => {
                        debug!("Unresolved external declaration {}", declaration.global_fqn);
                        self.stats.unresolved += 1;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> ExportStats {
        info!(
            "Linked {} exports ({} namespace exports skipped, {} unresolved)",
            self.stats.linked, self.stats.skipped_namespace, self.stats.unresolved
        );
        self.stats
    }

    fn push(&mut self, graph: &mut LinkedGraph, module: DeclId, target: DeclId, name: &str) {
        if self.seen.insert((module, target, name.to_string())) {
            graph.exports.push(ExportEdge {
                module,
                target,
                exported_name: name.to_string(),
            });
            self.stats.linked += 1;
        }
    }
}
