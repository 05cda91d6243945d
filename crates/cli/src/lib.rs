//! Library interface for the tsgraph CLI
//!
//! The `link` command lives here so integration tests can drive it without
//! spawning the binary.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;
use tsgraph_core::{LinkReport, ScanInput};
use tsgraph_storage::{persist_graph, GraphSnapshot, MemoryGraphStore, PersistStats};

pub use tsgraph_core::Config;

/// Scope token recorded on the scan root node when none is given
pub const DEFAULT_SCOPE: &str = "typescript:project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl OutputFormat {
    /// Format named in a validated configuration
    pub fn from_config(config: &Config) -> Self {
        match config.output.format.as_str() {
            "json" => Self::Json,
            _ => Self::Summary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub config_path: Option<PathBuf>,
    pub scope: String,
    /// Overrides the configured output format
    pub format: Option<OutputFormat>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            scope: DEFAULT_SCOPE.to_string(),
            format: None,
        }
    }
}

/// Everything produced by one `link` run
#[derive(Debug)]
pub struct LinkOutcome {
    pub report: LinkReport,
    pub persisted: PersistStats,
    pub store: MemoryGraphStore,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    scope: &'a str,
    report: &'a LinkReport,
    graph: GraphSnapshot,
}

/// Reads, links and persists the scan artifact at `input`
pub fn link_file(input: &Path, options: &LinkOptions) -> Result<LinkOutcome> {
    let config = Config::load(options.config_path.as_deref())
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let scan = ScanInput::from_file(input).context("Failed to load scan input")?;

    let graph = tsgraph_linker::link(&config.linker, &scan).context("Linking failed")?;

    let store = MemoryGraphStore::new();
    let persisted =
        persist_graph(&graph, &store, &options.scope).context("Failed to persist graph")?;
    info!(
        "Stored {} nodes and {} edges under scope {}",
        persisted.nodes, persisted.edges, options.scope
    );

    Ok(LinkOutcome {
        report: graph.report,
        persisted,
        store,
        format: options
            .format
            .unwrap_or_else(|| OutputFormat::from_config(&config)),
    })
}

/// Renders the outcome in its selected format
pub fn render(outcome: &LinkOutcome, scope: &str) -> Result<String> {
    match outcome.format {
        OutputFormat::Summary => render_summary(outcome),
        OutputFormat::Json => {
            let output = JsonOutput {
                scope,
                report: &outcome.report,
                graph: outcome.store.snapshot()?,
            };
            serde_json::to_string_pretty(&output).context("Failed to serialize graph")
        }
    }
}

fn render_summary(outcome: &LinkOutcome) -> Result<String> {
    let report = &outcome.report;
    let mut out = String::new();

    writeln!(out, "Linked {} projects", report.projects)?;
    writeln!(
        out,
        "  FQNs registered:      {} ({} duplicates)",
        report.registered_fqns, report.duplicate_fqns
    )?;
    writeln!(
        out,
        "  References resolved:  {} ({} unresolved)",
        report.resolved_references, report.unresolved_references
    )?;
    writeln!(out, "  Project references:   {}", report.project_references)?;
    writeln!(
        out,
        "  Dependency edges:     {} ({} triples dropped)",
        report.dependency_edges, report.dropped_dependencies
    )?;
    writeln!(
        out,
        "  Exports:              {} ({} namespace skipped, {} unresolved)",
        report.exports, report.skipped_namespace_exports, report.unresolved_exports
    )?;
    writeln!(
        out,
        "  Components:           {} ({} render edges)",
        report.components, report.render_edges
    )?;

    writeln!(out, "Nodes: {}", outcome.persisted.nodes)?;
    for (label, count) in outcome.store.label_counts()? {
        writeln!(out, "  {label}: {count}")?;
    }
    writeln!(out, "Edges: {}", outcome.persisted.edges)?;
    for (kind, count) in outcome.store.edge_counts()? {
        writeln!(out, "  {kind}: {count}")?;
    }
    Ok(out)
}
