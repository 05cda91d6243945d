//! Project reference linkage
//!
//! A project's sub-project paths must each match the config-file path of an
//! ingested project. A reference that matches nothing means the scanned
//! project set is inconsistent and aborts the session.

use tracing::{debug, info};
use tsgraph_core::{Error, LinkedGraph, LinkerConfig, Result};

/// Resolves every sub-project path and records the references on the projects
///
/// Returns the number of linked references.
pub fn link_projects(graph: &mut LinkedGraph, config: &LinkerConfig) -> Result<usize> {
    let mut resolved = Vec::with_capacity(graph.projects.len());

    for project in &graph.projects {
        let mut references = Vec::with_capacity(project.sub_project_paths.len());
        for sub_project_path in &project.sub_project_paths {
            let config_file_path = config.config_file_path(sub_project_path);
            let Some(target) = graph.find_project(&config_file_path) else {
                return Err(Error::unresolved_project_reference(
                    &project.project_path,
                    sub_project_path,
                ));
            };
            debug!(
                "Project {} references {}",
                project.project_path, config_file_path
            );
            references.push(target);
        }
        resolved.push(references);
    }

    let mut linked = 0;
    for (project, references) in graph.projects.iter_mut().zip(resolved) {
        linked += references.len();
        project.references = references;
    }
    info!("Linked {} project references", linked);
    Ok(linked)
}
