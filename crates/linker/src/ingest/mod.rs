//! Forward ingestion pass
//!
//! Converts one project's raw records into graph nodes. Every declaration that
//! carries a global FQN is registered in the shared symbol table, every
//! declared type or value reference is queued for deferred resolution, and
//! type-parameter references are resolved on the spot against the lexical
//! scope stack.

mod declarations;
mod modules;
mod types;
mod values;

use crate::resolution::ResolutionQueue;
use crate::symbols::SymbolTable;
use crate::type_params::TypeParameterScopes;
use tracing::debug;
use tsgraph_core::graph::DeclarationKind;
use tsgraph_core::records::{CodeCoordinates, ProjectRecord};
use tsgraph_core::{DeclId, Declaration, Error, LinkedGraph, Result};

/// Nodes produced for one project
#[derive(Debug, Default)]
pub struct IngestedProject {
    pub modules: Vec<DeclId>,
    pub external_modules: Vec<DeclId>,
    /// Top-level declarations, whether or not a module adopted them
    pub top_level: Vec<DeclId>,
}

/// Session state borrowed for the ingestion of one project
pub struct ProjectIngestor<'a> {
    graph: &'a mut LinkedGraph,
    symbols: &'a mut SymbolTable,
    queue: &'a mut ResolutionQueue,
    scopes: &'a mut TypeParameterScopes,
}

impl<'a> ProjectIngestor<'a> {
    pub fn new(
        graph: &'a mut LinkedGraph,
        symbols: &'a mut SymbolTable,
        queue: &'a mut ResolutionQueue,
        scopes: &'a mut TypeParameterScopes,
    ) -> Self {
        Self {
            graph,
            symbols,
            queue,
            scopes,
        }
    }

    /// Ingests every declaration of `project`
    pub fn ingest(mut self, project: &ProjectRecord) -> Result<IngestedProject> {
        // type parameters never cross project boundaries
        self.scopes.reset();

        let concepts = &project.concepts;
        let mut top_level = Vec::new();

        for record in &concepts.class_declarations {
            top_level.push(self.ingest_class(record)?);
        }
        for record in &concepts.interface_declarations {
            top_level.push(self.ingest_interface(record)?);
        }
        for record in &concepts.type_alias_declarations {
            top_level.push(self.ingest_type_alias(record)?);
        }
        for record in &concepts.enum_declarations {
            top_level.push(self.ingest_enum(record)?);
        }
        for record in &concepts.function_declarations {
            top_level.push(self.ingest_function(record)?);
        }
        for record in &concepts.variable_declarations {
            top_level.push(self.ingest_variable(record)?);
        }

        let modules = self.ingest_modules(project, &top_level)?;
        let external_modules = self.ingest_external_modules(&concepts.external_modules)?;

        debug!(
            "Ingested project {}: {} top-level declarations, {} modules, {} external modules",
            project.project_path,
            top_level.len(),
            modules.len(),
            external_modules.len()
        );

        Ok(IngestedProject {
            modules,
            external_modules,
            top_level,
        })
    }

    /// Adds a declaration and registers it under its global FQN, if any
    fn add_declaration(&mut self, declaration: Declaration) -> DeclId {
        let fqn = declaration.global_fqn.clone();
        let id = self.graph.add_declaration(declaration);
        if let Some(fqn) = fqn {
            self.symbols.register(&fqn, id);
        }
        id
    }

    /// Builds and adds a declaration with FQNs and coordinates
    fn declare(
        &mut self,
        kind: DeclarationKind,
        name: &str,
        local_fqn: &str,
        global_fqn: &str,
        coordinates: &CodeCoordinates,
        parent: Option<DeclId>,
    ) -> Result<DeclId> {
        let mut builder = Declaration::builder();
        builder
            .kind(kind)
            .name(name)
            .local_fqn(local_fqn)
            .global_fqn(global_fqn)
            .coordinates(coordinates.clone());
        if let Some(parent) = parent {
            builder.parent(parent);
        }
        let declaration = builder.build().map_err(|e| {
            Error::invalid_input(format!("Failed to build declaration {global_fqn}: {e}"))
        })?;
        Ok(self.add_declaration(declaration))
    }

    /// Builds and adds an anonymous declaration that is never registered
    fn declare_unregistered(
        &mut self,
        kind: DeclarationKind,
        name: &str,
        coordinates: Option<&CodeCoordinates>,
        parent: Option<DeclId>,
    ) -> Result<DeclId> {
        let mut builder = Declaration::builder();
        builder.kind(kind).name(name);
        if let Some(coordinates) = coordinates {
            builder.coordinates(coordinates.clone());
        }
        if let Some(parent) = parent {
            builder.parent(parent);
        }
        let declaration = builder
            .build()
            .map_err(|e| Error::invalid_input(format!("Failed to build {name}: {e}")))?;
        Ok(self.graph.add_declaration(declaration))
    }

    /// Sets `parent` as the container of each child
    fn adopt(&mut self, children: &[DeclId], parent: DeclId) -> Result<()> {
        for child in children {
            self.graph.declaration_mut(*child)?.parent = Some(parent);
        }
        Ok(())
    }

    /// Runs `f` inside a fresh type-parameter scope
    fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.scopes.push_scope();
        let result = f(self);
        self.scopes.pop_scope();
        result
    }
}
