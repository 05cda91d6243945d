//! Render graph linkage
//!
//! Marks component declarations and draws weighted "renders" edges to the
//! element types they render. Element types are deduplicated by global FQN
//! across the session; repeated renders of one element are summed.

use crate::symbols::SymbolTable;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};
use tsgraph_core::graph::{ComponentInfo, ElementType, RenderEdge};
use tsgraph_core::records::ComponentRecord;
use tsgraph_core::{DeclId, ElementId, LinkedGraph, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub components: usize,
    pub render_edges: usize,
    pub unresolved_components: usize,
}

pub fn link_renders<'r>(
    records: impl IntoIterator<Item = &'r ComponentRecord>,
    symbols: &SymbolTable,
    graph: &mut LinkedGraph,
) -> Result<RenderStats> {
    let mut stats = RenderStats::default();
    let mut elements: HashMap<String, ElementId> = HashMap::new();
    let mut renders: BTreeMap<(DeclId, ElementId), u32> = BTreeMap::new();

    for record in records {
        let Some(component) = symbols.lookup(&record.global_fqn) else {
            debug!("Component {} has no declaration", record.global_fqn);
            stats.unresolved_components += 1;
            continue;
        };

        let declaration = graph.declaration_mut(component)?;
        if declaration.component.is_none() {
            stats.components += 1;
        }
        declaration.component = Some(ComponentInfo {
            name: record.component_name.clone(),
            class_component: record.class_component,
        });

        for rendered in &record.rendered_elements {
            let element = match elements.get(&rendered.global_fqn) {
                Some(element) => *element,
                None => {
                    graph.element_types.push(ElementType {
                        global_fqn: rendered.global_fqn.clone(),
                        name: rendered.name.clone(),
                        reference: symbols.lookup(&rendered.global_fqn),
                    });
                    let element = ElementId(graph.element_types.len() - 1);
                    elements.insert(rendered.global_fqn.clone(), element);
                    element
                }
            };
            let cardinality = renders.entry((component, element)).or_default();
            *cardinality = cardinality.saturating_add(rendered.cardinality);
        }
    }

    graph.renders = renders
        .into_iter()
        .map(|((component, element), cardinality)| RenderEdge {
            component,
            element,
            cardinality,
        })
        .collect();
    stats.render_edges = graph.renders.len();

    info!(
        "Linked {} components with {} render edges to {} element types",
        stats.components,
        stats.render_edges,
        graph.element_types.len()
    );
    Ok(stats)
}
