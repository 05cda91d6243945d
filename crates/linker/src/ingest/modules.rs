//! Module and external module ingestion

use super::ProjectIngestor;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use tsgraph_core::graph::DeclarationKind;
use tsgraph_core::records::{CodeCoordinates, ExternalModuleRecord, ProjectRecord};
use tsgraph_core::{DeclId, Declaration, Error, Result};

impl ProjectIngestor<'_> {
    /// Creates a module node for every scanned source file
    ///
    /// Module records for files outside `source_file_paths` are dropped. Each
    /// module adopts the top-level declarations located in its file.
    pub(super) fn ingest_modules(
        &mut self,
        project: &ProjectRecord,
        top_level: &[DeclId],
    ) -> Result<Vec<DeclId>> {
        let scanned: HashSet<&str> = project
            .source_file_paths
            .iter()
            .map(String::as_str)
            .collect();

        let mut by_file: HashMap<String, Vec<DeclId>> = HashMap::new();
        for id in top_level {
            let declaration = self.graph.declaration(*id)?;
            if let Some(coordinates) = &declaration.coordinates {
                by_file
                    .entry(coordinates.file_name.clone())
                    .or_default()
                    .push(*id);
            }
        }

        let mut modules = Vec::new();
        for record in &project.concepts.modules {
            if !scanned.contains(record.path.as_str()) {
                debug!("Skipping module {} which was not scanned", record.path);
                continue;
            }

            let name = record.path.rsplit('/').next().unwrap_or(&record.path);
            let module = self.declare(
                DeclarationKind::Module {
                    path: record.path.clone(),
                },
                name,
                &record.local_fqn,
                &record.global_fqn,
                &CodeCoordinates {
                    file_name: record.path.clone(),
                    ..Default::default()
                },
                None,
            )?;

            // a second record for the same path finds its members already adopted
            let members = by_file.remove(record.path.as_str()).unwrap_or_default();
            self.adopt(&members, module)?;
            modules.push(module);
        }
        Ok(modules)
    }

    /// Finds or creates external modules and their declarations
    ///
    /// External modules are keyed by global FQN across the whole session, so a
    /// library imported by several projects yields one node.
    pub(super) fn ingest_external_modules(
        &mut self,
        records: &[ExternalModuleRecord],
    ) -> Result<Vec<DeclId>> {
        let mut modules = Vec::with_capacity(records.len());
        for record in records {
            let name = record.local_fqn.as_deref().unwrap_or(&record.global_fqn);
            let module = self.find_or_declare_external(
                DeclarationKind::ExternalModule,
                name,
                &record.global_fqn,
            )?;

            // linked to the module through export edges only, never containment
            for declaration in &record.declarations {
                self.find_or_declare_external(
                    DeclarationKind::ExternalDeclaration,
                    &declaration.name,
                    &declaration.global_fqn,
                )?;
            }
            modules.push(module);
        }
        Ok(modules)
    }

    fn find_or_declare_external(
        &mut self,
        kind: DeclarationKind,
        name: &str,
        global_fqn: &str,
    ) -> Result<DeclId> {
        if let Some(existing) = self.symbols.lookup(global_fqn) {
            return Ok(existing);
        }

        let declaration = Declaration::builder()
            .kind(kind)
            .name(name)
            .global_fqn(global_fqn)
            .build()
            .map_err(|e| {
                Error::invalid_input(format!(
                    "Failed to build external declaration {global_fqn}: {e}"
                ))
            })?;
        Ok(self.add_declaration(declaration))
    }
}
