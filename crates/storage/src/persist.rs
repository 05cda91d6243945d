//! Writes a [`LinkedGraph`] into a [`GraphStore`]
//!
//! All nodes are created first so every edge can be drawn from arena
//! indices alone. File and element-type nodes are find-or-create, keyed
//! within the scan scope.

use crate::error::StorageError;
use crate::traits::{GraphStore, NodeHandle, Properties, PropertyValue};
use std::collections::HashMap;
use tracing::{debug, info};
use tsgraph_core::graph::{DeclarationKind, TypeKind, ValueKind};
use tsgraph_core::records::{CodeCoordinates, MemberModifiers};
use tsgraph_core::{DeclId, Declaration, LinkedGraph, Result, TypeId, ValueId};

/// Counts of everything written by [`persist_graph`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub nodes: usize,
    pub edges: usize,
}

fn props<const N: usize>(pairs: [(&str, PropertyValue); N]) -> Properties {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Handle created for arena slot `index`, if the slot exists
fn created(handles: &[NodeHandle], index: usize) -> Result<NodeHandle> {
    handles.get(index).copied().ok_or_else(|| {
        StorageError::NodeNotFound(u64::try_from(index).unwrap_or(u64::MAX)).into()
    })
}

fn index_props(index: usize) -> Properties {
    props([("index", index.into())])
}

/// Persists `graph` under a scan root node tagged with `scope`
pub fn persist_graph(
    graph: &LinkedGraph,
    store: &dyn GraphStore,
    scope: &str,
) -> Result<PersistStats> {
    info!(
        "Persisting {} declarations, {} types, {} values",
        graph.declarations.len(),
        graph.types.len(),
        graph.values.len()
    );
    let mut persister = Persister {
        graph,
        store,
        scope,
        declarations: Vec::with_capacity(graph.declarations.len()),
        types: Vec::with_capacity(graph.types.len()),
        values: Vec::with_capacity(graph.values.len()),
        keyed: HashMap::new(),
        stats: PersistStats::default(),
    };
    persister.write_nodes()?;
    persister.write_declaration_edges()?;
    persister.write_type_edges()?;
    persister.write_value_edges()?;
    persister.write_projects()?;
    persister.write_linkage()?;

    info!(
        "Persisted {} nodes and {} edges",
        persister.stats.nodes, persister.stats.edges
    );
    Ok(persister.stats)
}

struct Persister<'a> {
    graph: &'a LinkedGraph,
    store: &'a dyn GraphStore,
    scope: &'a str,
    declarations: Vec<NodeHandle>,
    types: Vec<NodeHandle>,
    values: Vec<NodeHandle>,
    keyed: HashMap<String, NodeHandle>,
    stats: PersistStats,
}

impl Persister<'_> {
    fn node(&mut self, labels: &[&str], properties: Properties) -> Result<NodeHandle> {
        self.stats.nodes += 1;
        self.store.create_node(labels, properties)
    }

    fn keyed_node(
        &mut self,
        key: &str,
        labels: &[&str],
        properties: Properties,
    ) -> Result<NodeHandle> {
        let key = format!("{}|{key}", self.scope);
        if let Some(handle) = self.keyed.get(&key) {
            return Ok(*handle);
        }
        let handle = self.store.find_or_create_node(&key, labels, properties)?;
        self.stats.nodes += 1;
        self.keyed.insert(key, handle);
        Ok(handle)
    }

    fn edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        kind: &str,
        properties: Properties,
    ) -> Result<()> {
        self.stats.edges += 1;
        self.store.create_edge(from, to, kind, properties)
    }

    fn file_node(&mut self, path: &str) -> Result<NodeHandle> {
        self.keyed_node(
            &format!("file:{path}"),
            &["File"],
            props([("fileName", path.into())]),
        )
    }

    fn decl(&self, id: DeclId) -> Result<NodeHandle> {
        created(&self.declarations, id.index())
    }

    fn ty(&self, id: TypeId) -> Result<NodeHandle> {
        created(&self.types, id.index())
    }

    fn value(&self, id: ValueId) -> Result<NodeHandle> {
        created(&self.values, id.index())
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    fn write_nodes(&mut self) -> Result<()> {
        let graph = self.graph;
        for declaration in &graph.declarations {
            let mut labels = vec!["TS", declaration.kind.label()];
            if declaration.component.is_some() {
                labels.push("Component");
            }
            let handle = self.node(&labels, declaration_properties(declaration))?;
            self.declarations.push(handle);
        }

        for node in &graph.types {
            let mut properties = Properties::new();
            match &node.kind {
                TypeKind::Primitive { name } | TypeKind::TypeParameterRef { name, .. } => {
                    properties.insert("name".into(), name.as_str().into());
                }
                TypeKind::Declared { reference, .. } => {
                    properties.insert("fqn".into(), reference.fqn.as_str().into());
                }
                TypeKind::Literal { value } => {
                    properties.insert("value".into(), value.clone().into());
                }
                TypeKind::NotIdentified { identifier } => {
                    properties.insert("identifier".into(), identifier.as_str().into());
                }
                _ => {}
            }
            let handle = self.node(&["TS", "Type", node.kind.label()], properties)?;
            self.types.push(handle);
        }

        for node in &graph.values {
            let mut properties = Properties::new();
            match &node.kind {
                ValueKind::Null { kind } => {
                    properties.insert("kind".into(), kind.as_str().into());
                }
                ValueKind::Literal { value } => {
                    properties.insert("value".into(), value.clone().into());
                }
                ValueKind::Declared { reference } => {
                    properties.insert("fqn".into(), reference.fqn.as_str().into());
                }
                ValueKind::Function { arrow_function } => {
                    properties.insert("arrowFunction".into(), (*arrow_function).into());
                }
                ValueKind::Complex { expression } => {
                    properties.insert("expression".into(), expression.as_str().into());
                }
                _ => {}
            }
            let handle = self.node(&["TS", "Value", node.kind.label()], properties)?;
            self.values.push(handle);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    fn write_declaration_edges(&mut self) -> Result<()> {
        let graph = self.graph;
        for id in graph.declaration_ids() {
            let declaration = graph.declaration(id)?;
            let node = self.decl(id)?;

            if let Some(parent) = declaration.parent {
                let kind = match declaration.kind {
                    DeclarationKind::Decorator { .. } => "DECORATED_BY",
                    _ => "DECLARES",
                };
                self.edge(self.decl(parent)?, node, kind, Properties::new())?;
            }

            match &declaration.kind {
                DeclarationKind::Module { path } => {
                    let file = self.file_node(path)?;
                    self.edge(file, node, "HAS_MODULE", Properties::new())?;
                }
                DeclarationKind::Class {
                    extends_class,
                    implements_interfaces,
                    ..
                } => {
                    if let Some(extends) = extends_class {
                        self.edge(node, self.ty(*extends)?, "EXTENDS", Properties::new())?;
                    }
                    for (index, interface) in implements_interfaces.iter().enumerate() {
                        self.edge(node, self.ty(*interface)?, "IMPLEMENTS", index_props(index))?;
                    }
                }
                DeclarationKind::Interface { extends_interfaces } => {
                    for (index, interface) in extends_interfaces.iter().enumerate() {
                        self.edge(node, self.ty(*interface)?, "EXTENDS", index_props(index))?;
                    }
                }
                DeclarationKind::TypeAlias { aliased } => {
                    self.edge(node, self.ty(*aliased)?, "HAS_TYPE", Properties::new())?;
                }
                DeclarationKind::EnumMember {
                    init_value: Some(value),
                } => {
                    self.edge(node, self.value(*value)?, "HAS_INIT_VALUE", Properties::new())?;
                }
                DeclarationKind::Function { return_type }
                | DeclarationKind::Method { return_type, .. }
                | DeclarationKind::Getter { return_type, .. } => {
                    self.edge(node, self.ty(*return_type)?, "RETURNS", Properties::new())?;
                }
                DeclarationKind::Property { ty, .. }
                | DeclarationKind::Parameter { ty, .. }
                | DeclarationKind::AutoAccessor { ty, .. } => {
                    self.edge(node, self.ty(*ty)?, "HAS_TYPE", Properties::new())?;
                }
                DeclarationKind::Variable { ty, init_value, .. } => {
                    self.edge(node, self.ty(*ty)?, "HAS_TYPE", Properties::new())?;
                    if let Some(value) = init_value {
                        self.edge(node, self.value(*value)?, "HAS_INIT_VALUE", Properties::new())?;
                    }
                }
                DeclarationKind::TypeParameter {
                    constraint: Some(constraint),
                    ..
                } => {
                    self.edge(node, self.ty(*constraint)?, "CONSTRAINED_BY", Properties::new())?;
                }
                DeclarationKind::Decorator { value: Some(value) } => {
                    self.edge(node, self.value(*value)?, "HAS_VALUE", Properties::new())?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_type_edges(&mut self) -> Result<()> {
        let graph = self.graph;
        for (index, node) in graph.types.iter().enumerate() {
            let from = self.types[index];
            match &node.kind {
                TypeKind::Declared {
                    reference,
                    type_arguments,
                } => {
                    if let Some(target) = reference.target {
                        self.edge(from, self.decl(target)?, "REFERENCES", Properties::new())?;
                    }
                    for (position, argument) in type_arguments.iter().enumerate() {
                        self.edge(
                            from,
                            self.ty(*argument)?,
                            "HAS_TYPE_ARGUMENT",
                            index_props(position),
                        )?;
                    }
                }
                TypeKind::Union { types }
                | TypeKind::Intersection { types }
                | TypeKind::Tuple { types } => {
                    for (position, member) in types.iter().enumerate() {
                        self.edge(from, self.ty(*member)?, "CONTAINS", index_props(position))?;
                    }
                }
                TypeKind::Object { members } => {
                    for member in members {
                        let properties = props([
                            ("name", member.name.as_str().into()),
                            ("optional", member.optional.into()),
                            ("readonly", member.readonly.into()),
                        ]);
                        self.edge(from, self.ty(member.ty)?, "HAS_MEMBER", properties)?;
                    }
                }
                TypeKind::Function {
                    parameters,
                    return_type,
                    type_parameters,
                } => {
                    for parameter in parameters {
                        let properties = props([
                            ("index", parameter.index.into()),
                            ("name", parameter.name.as_str().into()),
                            ("optional", parameter.optional.into()),
                        ]);
                        self.edge(from, self.ty(parameter.ty)?, "HAS_PARAMETER", properties)?;
                    }
                    self.edge(from, self.ty(*return_type)?, "RETURNS", Properties::new())?;
                    for type_parameter in type_parameters {
                        self.edge(
                            from,
                            self.decl(*type_parameter)?,
                            "DECLARES",
                            Properties::new(),
                        )?;
                    }
                }
                TypeKind::TypeParameterRef {
                    declaration: Some(declaration),
                    ..
                } => {
                    self.edge(from, self.decl(*declaration)?, "REFERENCES", Properties::new())?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_value_edges(&mut self) -> Result<()> {
        let graph = self.graph;
        for (index, node) in graph.values.iter().enumerate() {
            let from = self.values[index];
            self.edge(from, self.ty(node.ty)?, "HAS_TYPE", Properties::new())?;
            match &node.kind {
                ValueKind::Declared { reference } => {
                    if let Some(target) = reference.target {
                        self.edge(from, self.decl(target)?, "REFERENCES", Properties::new())?;
                    }
                }
                ValueKind::Member { parent, member } => {
                    self.edge(from, self.value(*parent)?, "PARENT", Properties::new())?;
                    self.edge(from, self.value(*member)?, "MEMBER", Properties::new())?;
                }
                ValueKind::Object { members } => {
                    for (name, member) in members {
                        let properties = props([("name", name.as_str().into())]);
                        self.edge(from, self.value(*member)?, "HAS_MEMBER", properties)?;
                    }
                }
                ValueKind::Array { items } => {
                    for (position, item) in items.iter().enumerate() {
                        self.edge(from, self.value(*item)?, "HAS_ITEM", index_props(position))?;
                    }
                }
                ValueKind::Call {
                    callee,
                    args,
                    type_args,
                } => {
                    self.edge(from, self.value(*callee)?, "CALLEE", Properties::new())?;
                    for (position, arg) in args.iter().enumerate() {
                        self.edge(from, self.value(*arg)?, "HAS_ARGUMENT", index_props(position))?;
                    }
                    for (position, arg) in type_args.iter().enumerate() {
                        self.edge(
                            from,
                            self.ty(*arg)?,
                            "HAS_TYPE_ARGUMENT",
                            index_props(position),
                        )?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_projects(&mut self) -> Result<()> {
        let graph = self.graph;
        let scan = self.node(&["Scan"], props([("scope", self.scope.into())]))?;

        let mut projects = Vec::with_capacity(graph.projects.len());
        for project in &graph.projects {
            let handle = self.node(
                &["TS", "Project"],
                props([
                    ("rootPath", project.root_path.as_str().into()),
                    ("projectPath", project.project_path.as_str().into()),
                    ("configFilePath", project.config_file_path.as_str().into()),
                ]),
            )?;
            self.edge(scan, handle, "CONTAINS", Properties::new())?;
            let config = self.file_node(&project.config_file_path)?;
            self.edge(handle, config, "HAS_CONFIG", Properties::new())?;
            projects.push(handle);
        }

        for (project, handle) in graph.projects.iter().zip(projects.iter().copied()) {
            for module in project.modules.iter().chain(&project.external_modules) {
                self.edge(handle, self.decl(*module)?, "CONTAINS", Properties::new())?;
            }
            for reference in &project.references {
                self.edge(
                    handle,
                    created(&projects, reference.index())?,
                    "REFERENCES",
                    Properties::new(),
                )?;
            }
        }
        debug!("Persisted {} projects", projects.len());
        Ok(())
    }

    fn write_linkage(&mut self) -> Result<()> {
        let graph = self.graph;
        for dependency in &graph.dependencies {
            self.edge(
                self.decl(dependency.source)?,
                self.decl(dependency.target)?,
                "DEPENDS_ON",
                props([("cardinality", dependency.cardinality.into())]),
            )?;
        }

        for export in &graph.exports {
            self.edge(
                self.decl(export.module)?,
                self.decl(export.target)?,
                "EXPORTS",
                props([("exportedName", export.exported_name.as_str().into())]),
            )?;
        }

        let mut elements = Vec::with_capacity(graph.element_types.len());
        for element in &graph.element_types {
            let handle = self.keyed_node(
                &format!("element:{}", element.global_fqn),
                &["TS", "ElementType"],
                props([
                    ("globalFqn", element.global_fqn.as_str().into()),
                    ("name", element.name.as_str().into()),
                ]),
            )?;
            if let Some(reference) = element.reference {
                self.edge(handle, self.decl(reference)?, "REFERENCES", Properties::new())?;
            }
            elements.push(handle);
        }

        for render in &graph.renders {
            self.edge(
                self.decl(render.component)?,
                created(&elements, render.element.index())?,
                "RENDERS",
                props([("cardinality", render.cardinality.into())]),
            )?;
        }
        Ok(())
    }
}

fn insert_coordinates(properties: &mut Properties, coordinates: &CodeCoordinates) {
    properties.insert("fileName".into(), coordinates.file_name.as_str().into());
    properties.insert("startLine".into(), coordinates.start_line.into());
    properties.insert("startColumn".into(), coordinates.start_column.into());
    properties.insert("endLine".into(), coordinates.end_line.into());
    properties.insert("endColumn".into(), coordinates.end_column.into());
}

fn insert_modifiers(properties: &mut Properties, modifiers: &MemberModifiers) {
    if let Some(visibility) = &modifiers.visibility {
        properties.insert("visibility".into(), visibility.as_str().into());
    }
    properties.insert("override".into(), modifiers.is_override.into());
    properties.insert("abstract".into(), modifiers.is_abstract.into());
    properties.insert("static".into(), modifiers.is_static.into());
}

fn declaration_properties(declaration: &Declaration) -> Properties {
    let mut properties = props([("name", declaration.name.as_str().into())]);
    if let Some(local_fqn) = &declaration.local_fqn {
        properties.insert("localFqn".into(), local_fqn.as_str().into());
    }
    if let Some(global_fqn) = &declaration.global_fqn {
        properties.insert("globalFqn".into(), global_fqn.as_str().into());
    }
    if let Some(coordinates) = &declaration.coordinates {
        insert_coordinates(&mut properties, coordinates);
    }
    if let Some(component) = &declaration.component {
        properties.insert("componentName".into(), component.name.as_str().into());
        properties.insert("classComponent".into(), component.class_component.into());
    }

    match &declaration.kind {
        DeclarationKind::Module { path } => {
            properties.insert("path".into(), path.as_str().into());
        }
        DeclarationKind::Class { is_abstract, .. } => {
            properties.insert("abstract".into(), (*is_abstract).into());
        }
        DeclarationKind::Enum { constant, declared } => {
            properties.insert("constant".into(), (*constant).into());
            properties.insert("declared".into(), (*declared).into());
        }
        DeclarationKind::Method { modifiers, .. }
        | DeclarationKind::Getter { modifiers, .. }
        | DeclarationKind::Setter { modifiers }
        | DeclarationKind::AutoAccessor { modifiers, .. } => {
            insert_modifiers(&mut properties, modifiers);
        }
        DeclarationKind::Property {
            optional,
            readonly,
            modifiers,
            parameter_index,
            ..
        } => {
            properties.insert("optional".into(), (*optional).into());
            properties.insert("readonly".into(), (*readonly).into());
            insert_modifiers(&mut properties, modifiers);
            if let Some(index) = parameter_index {
                properties.insert("parameterIndex".into(), (*index).into());
            }
        }
        DeclarationKind::Parameter {
            index, optional, ..
        } => {
            properties.insert("index".into(), (*index).into());
            properties.insert("optional".into(), (*optional).into());
        }
        DeclarationKind::Variable { kind, .. } => {
            properties.insert("kind".into(), kind.to_string().into());
        }
        DeclarationKind::TypeParameter { index, .. } => {
            properties.insert("index".into(), (*index).into());
        }
        _ => {}
    }
    properties
}
