//! Linking session
//!
//! Owns the symbol table, the deferred-reference queue and the type-parameter
//! scope stack for one run over a set of projects. Phases run strictly in
//! sequence:
//!
//! 1. forward ingestion of every project
//! 2. deferred resolution of all queued references
//! 3. project reference linkage (fatal on a missing sub-project)
//! 4. dependency graph build
//! 5. export linkage
//! 6. render linkage

use crate::dependencies::DependencyGraphBuilder;
use crate::exports::ExportLinker;
use crate::ingest::ProjectIngestor;
use crate::projects::link_projects;
use crate::render::link_renders;
use crate::resolution::ResolutionQueue;
use crate::symbols::SymbolTable;
use crate::type_params::TypeParameterScopes;
use tracing::{debug, info};
use tsgraph_core::graph::Project;
use tsgraph_core::{LinkedGraph, LinkerConfig, Result, ScanInput};

pub struct LinkSession {
    config: LinkerConfig,
    graph: LinkedGraph,
    symbols: SymbolTable,
    queue: ResolutionQueue,
    scopes: TypeParameterScopes,
}

impl LinkSession {
    pub fn new(config: LinkerConfig) -> Self {
        Self {
            config,
            graph: LinkedGraph::new(),
            symbols: SymbolTable::new(),
            queue: ResolutionQueue::new(),
            scopes: TypeParameterScopes::new(),
        }
    }

    /// Links every project of `input` into one graph
    ///
    /// Consuming the session guarantees deferred resolution runs exactly once.
    pub fn link(self, input: &ScanInput) -> Result<LinkedGraph> {
        let Self {
            config,
            mut graph,
            mut symbols,
            mut queue,
            mut scopes,
        } = self;

        info!("Linking {} projects", input.projects.len());

        for record in &input.projects {
            info!("Ingesting project {}", record.project_path);
            let ingested =
                ProjectIngestor::new(&mut graph, &mut symbols, &mut queue, &mut scopes)
                    .ingest(record)?;

            graph.add_project(Project {
                root_path: record.root_path.clone(),
                project_path: record.project_path.clone(),
                config_file_path: config.config_file_path(&record.project_path),
                sub_project_paths: record.sub_project_paths.clone(),
                modules: ingested.modules,
                external_modules: ingested.external_modules,
                references: Vec::new(),
            });
        }
        info!(
            "Ingestion finished: {} declarations, {} FQNs registered, {} references deferred",
            graph.declarations.len(),
            symbols.len(),
            queue.len()
        );
        if config.log_registered_fqns {
            symbols.log_all();
        }

        let resolution = queue.resolve_all(&symbols, &mut graph)?;
        info!(
            "Resolved {} references ({} unresolved)",
            resolution.resolved, resolution.unresolved
        );

        let project_references = link_projects(&mut graph, &config)?;

        let concepts = || input.projects.iter().map(|project| &project.concepts);

        let dependencies = DependencyGraphBuilder::new(config.propagate_dependencies).build(
            concepts().flat_map(|concepts| &concepts.dependencies),
            &symbols,
            &graph,
        );
        graph.dependencies = dependencies.edges;

        let mut exports = ExportLinker::new();
        exports.link_exports(
            concepts().flat_map(|concepts| &concepts.export_declarations),
            &symbols,
            &mut graph,
        )?;
        exports.link_external_exports(
            concepts().flat_map(|concepts| &concepts.external_modules),
            &symbols,
            &mut graph,
        )?;
        let exports = exports.finish();

        let renders = link_renders(
            concepts().flat_map(|concepts| &concepts.react_components),
            &symbols,
            &mut graph,
        )?;

        let report = &mut graph.report;
        report.projects = input.projects.len();
        report.registered_fqns = symbols.len();
        report.duplicate_fqns = symbols.duplicates();
        report.resolved_references = resolution.resolved;
        report.unresolved_references = resolution.unresolved;
        report.project_references = project_references;
        report.dependency_edges = graph.dependencies.len();
        report.dropped_dependencies = dependencies.dropped;
        report.exports = exports.linked;
        report.skipped_namespace_exports = exports.skipped_namespace;
        report.unresolved_exports = exports.unresolved;
        report.components = renders.components;
        report.render_edges = renders.render_edges;

        debug!("Link report: {:?}", graph.report);
        Ok(graph)
    }
}
