//! Linked property graph
//!
//! The output of a linking session. Nodes live in arenas owned by
//! [`LinkedGraph`] and point at each other through typed indices, so a
//! reference slot can be filled after construction without shared ownership.

use crate::error::{Error, Result};
use crate::records::{CodeCoordinates, MemberModifiers};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumString, IntoStaticStr};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Index of a declaration node
    DeclId
);
arena_id!(
    /// Index of a type node
    TypeId
);
arena_id!(
    /// Index of a value node
    ValueId
);
arena_id!(
    /// Index of a project node
    ProjectId
);
arena_id!(
    /// Index of a rendered element type
    ElementId
);

/// An FQN reference whose target is filled in by deferred resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredRef {
    pub fqn: String,
    pub target: Option<DeclId>,
}

impl DeferredRef {
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            target: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// Binding keyword of a variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariableKind {
    Var,
    #[default]
    Let,
    Const,
}

// ============================================================================
// Declarations
// ============================================================================

/// Kind-specific payload of a declaration node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "declaration", rename_all = "snake_case")]
pub enum DeclarationKind {
    Module {
        path: String,
    },
    Class {
        is_abstract: bool,
        extends_class: Option<TypeId>,
        implements_interfaces: Vec<TypeId>,
    },
    Interface {
        extends_interfaces: Vec<TypeId>,
    },
    TypeAlias {
        aliased: TypeId,
    },
    Enum {
        constant: bool,
        declared: bool,
    },
    EnumMember {
        init_value: Option<ValueId>,
    },
    Function {
        return_type: TypeId,
    },
    Method {
        return_type: TypeId,
        modifiers: MemberModifiers,
    },
    Constructor,
    Property {
        ty: TypeId,
        optional: bool,
        readonly: bool,
        modifiers: MemberModifiers,
        /// Set when the property is declared through a constructor parameter
        parameter_index: Option<u32>,
    },
    Parameter {
        index: u32,
        ty: TypeId,
        optional: bool,
    },
    #[strum(serialize = "AccessorProperty")]
    Accessor,
    Getter {
        return_type: TypeId,
        modifiers: MemberModifiers,
    },
    Setter {
        modifiers: MemberModifiers,
    },
    AutoAccessor {
        ty: TypeId,
        modifiers: MemberModifiers,
    },
    Variable {
        kind: VariableKind,
        ty: TypeId,
        init_value: Option<ValueId>,
    },
    TypeParameter {
        index: u32,
        constraint: Option<TypeId>,
    },
    Decorator {
        value: Option<ValueId>,
    },
    ExternalModule,
    ExternalDeclaration,
}

impl DeclarationKind {
    /// Node label for this kind
    pub fn label(&self) -> &'static str {
        self.into()
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module { .. })
    }

    pub fn is_external_module(&self) -> bool {
        matches!(self, Self::ExternalModule)
    }
}

/// Marks a declaration as a UI component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: String,
    pub class_component: bool,
}

/// A declaration node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Declaration {
    pub kind: DeclarationKind,

    /// Simple name
    pub name: String,

    /// Project-relative FQN
    #[builder(default, setter(strip_option))]
    pub local_fqn: Option<String>,

    /// Session-absolute FQN, the symbol table key
    #[builder(default, setter(strip_option))]
    pub global_fqn: Option<String>,

    #[builder(default, setter(strip_option))]
    pub coordinates: Option<CodeCoordinates>,

    /// Containing declaration ("declares" edge)
    #[builder(default, setter(strip_option))]
    pub parent: Option<DeclId>,

    #[builder(default)]
    pub component: Option<ComponentInfo>,
}

impl Declaration {
    pub fn builder() -> DeclarationBuilder {
        DeclarationBuilder::default()
    }
}

// ============================================================================
// Types and values
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMember {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub index: u32,
    pub name: String,
    pub optional: bool,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeKind {
    Primitive {
        name: String,
    },
    Declared {
        reference: DeferredRef,
        type_arguments: Vec<TypeId>,
    },
    Union {
        types: Vec<TypeId>,
    },
    Intersection {
        types: Vec<TypeId>,
    },
    Object {
        members: Vec<ObjectMember>,
    },
    #[strum(serialize = "FunctionType")]
    Function {
        parameters: Vec<FunctionParameter>,
        return_type: TypeId,
        type_parameters: Vec<DeclId>,
    },
    /// Resolved by lexical scope, never through the symbol table
    #[strum(serialize = "TypeParameterReference")]
    TypeParameterRef {
        name: String,
        declaration: Option<DeclId>,
    },
    Tuple {
        types: Vec<TypeId>,
    },
    Literal {
        value: serde_json::Value,
    },
    NotIdentified {
        identifier: String,
    },
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "value_type", rename_all = "snake_case")]
pub enum ValueKind {
    Null { kind: String },
    Literal { value: serde_json::Value },
    Declared { reference: DeferredRef },
    Member { parent: ValueId, member: ValueId },
    Object { members: Vec<(String, ValueId)> },
    Array { items: Vec<ValueId> },
    Call {
        callee: ValueId,
        args: Vec<ValueId>,
        type_args: Vec<TypeId>,
    },
    Function { arrow_function: bool },
    #[strum(serialize = "ClassValue")]
    Class,
    Complex { expression: String },
}

impl ValueKind {
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// A value node and the type of the value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNode {
    pub kind: ValueKind,
    pub ty: TypeId,
}

// ============================================================================
// Edges and projects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: DeclId,
    pub target: DeclId,
    pub cardinality: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub module: DeclId,
    pub target: DeclId,
    pub exported_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub root_path: String,
    pub project_path: String,
    pub config_file_path: String,
    pub sub_project_paths: Vec<String>,
    pub modules: Vec<DeclId>,
    pub external_modules: Vec<DeclId>,
    /// Resolved sub-projects
    pub references: Vec<ProjectId>,
}

/// A rendered element, deduplicated by global FQN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementType {
    pub global_fqn: String,
    pub name: String,
    pub reference: Option<DeclId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub component: DeclId,
    pub element: ElementId,
    pub cardinality: u32,
}

/// Counters collected over one linking session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub projects: usize,
    pub registered_fqns: usize,
    pub duplicate_fqns: usize,
    pub resolved_references: usize,
    pub unresolved_references: usize,
    pub project_references: usize,
    pub dependency_edges: usize,
    pub dropped_dependencies: usize,
    pub exports: usize,
    pub skipped_namespace_exports: usize,
    pub unresolved_exports: usize,
    pub components: usize,
    pub render_edges: usize,
}

// ============================================================================
// Graph
// ============================================================================

/// Fully linked output of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedGraph {
    pub declarations: Vec<Declaration>,
    pub types: Vec<TypeNode>,
    pub values: Vec<ValueNode>,
    pub projects: Vec<Project>,
    pub dependencies: Vec<DependencyEdge>,
    pub exports: Vec<ExportEdge>,
    pub element_types: Vec<ElementType>,
    pub renders: Vec<RenderEdge>,
    pub report: LinkReport,
}

impl LinkedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_declaration(&mut self, declaration: Declaration) -> DeclId {
        self.declarations.push(declaration);
        DeclId(self.declarations.len() - 1)
    }

    pub fn add_type(&mut self, kind: TypeKind) -> TypeId {
        self.types.push(TypeNode { kind });
        TypeId(self.types.len() - 1)
    }

    pub fn add_value(&mut self, kind: ValueKind, ty: TypeId) -> ValueId {
        self.values.push(ValueNode { kind, ty });
        ValueId(self.values.len() - 1)
    }

    pub fn add_project(&mut self, project: Project) -> ProjectId {
        self.projects.push(project);
        ProjectId(self.projects.len() - 1)
    }

    pub fn declaration(&self, id: DeclId) -> Result<&Declaration> {
        self.declarations
            .get(id.0)
            .ok_or_else(|| Error::invalid_input(format!("Unknown declaration id {}", id.0)))
    }

    pub fn declaration_mut(&mut self, id: DeclId) -> Result<&mut Declaration> {
        self.declarations
            .get_mut(id.0)
            .ok_or_else(|| Error::invalid_input(format!("Unknown declaration id {}", id.0)))
    }

    pub fn type_node(&self, id: TypeId) -> Result<&TypeNode> {
        self.types
            .get(id.0)
            .ok_or_else(|| Error::invalid_input(format!("Unknown type id {}", id.0)))
    }

    pub fn type_node_mut(&mut self, id: TypeId) -> Result<&mut TypeNode> {
        self.types
            .get_mut(id.0)
            .ok_or_else(|| Error::invalid_input(format!("Unknown type id {}", id.0)))
    }

    pub fn value_node(&self, id: ValueId) -> Result<&ValueNode> {
        self.values
            .get(id.0)
            .ok_or_else(|| Error::invalid_input(format!("Unknown value id {}", id.0)))
    }

    pub fn value_node_mut(&mut self, id: ValueId) -> Result<&mut ValueNode> {
        self.values
            .get_mut(id.0)
            .ok_or_else(|| Error::invalid_input(format!("Unknown value id {}", id.0)))
    }

    pub fn declaration_ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.declarations.len()).map(DeclId)
    }

    /// Direct children of a declaration, in creation order
    pub fn children(&self, id: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.declarations
            .iter()
            .enumerate()
            .filter(move |(_, decl)| decl.parent == Some(id))
            .map(|(index, _)| DeclId(index))
    }

    /// Containment ancestors, innermost first
    pub fn ancestors(&self, id: DeclId) -> Vec<DeclId> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.declarations.get(id.0).and_then(|decl| decl.parent);
        while let Some(parent) = current {
            // a malformed parent chain must not loop forever
            if !seen.insert(parent) {
                break;
            }
            ancestors.push(parent);
            current = self.declarations.get(parent.0).and_then(|decl| decl.parent);
        }
        ancestors
    }

    /// Whether `ancestor` contains `descendant` through one or more declares edges
    pub fn is_ancestor(&self, ancestor: DeclId, descendant: DeclId) -> bool {
        self.ancestors(descendant).contains(&ancestor)
    }

    /// First declaration carrying the given global FQN
    pub fn find_by_global_fqn(&self, fqn: &str) -> Option<DeclId> {
        self.declarations
            .iter()
            .position(|decl| decl.global_fqn.as_deref() == Some(fqn))
            .map(DeclId)
    }

    pub fn global_fqn_of(&self, id: DeclId) -> Option<&str> {
        self.declarations
            .get(id.0)
            .and_then(|decl| decl.global_fqn.as_deref())
    }

    /// Cardinality of the dependency edge between two declarations, if any
    pub fn dependency(&self, source: DeclId, target: DeclId) -> Option<u32> {
        self.dependencies
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
            .map(|edge| edge.cardinality)
    }

    pub fn find_project(&self, config_file_path: &str) -> Option<ProjectId> {
        self.projects
            .iter()
            .position(|project| project.config_file_path == config_file_path)
            .map(ProjectId)
    }
}
