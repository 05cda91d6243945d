//! Raw analyzer records
//!
//! These are the pre-resolution shapes emitted by the TypeScript analyzer, one
//! [`ProjectRecord`] per scanned project. Every cross reference is a global
//! fully qualified name string; nothing here points at anything else.
//!
//! Keys are camelCase. Collections in [`ConceptCollection`] are also accepted
//! under the analyzer's kebab-case concept ids (`class-declaration`, ...).

use crate::error::{Error, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use strum_macros::{Display, EnumString};

/// Complete analyzer output for one linking session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanInput {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

impl ScanInput {
    /// Decodes a scan input from its JSON representation
    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads and decodes a scan input file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read scan input {}", path.display()))?;
        Self::from_json_str(&content)
            .map_err(|e| Error::invalid_input(format!("{}: {e}", path.display())))
    }
}

/// One scanned project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Root directory shared by the scanned project set
    pub root_path: String,
    /// Directory containing the project's config file
    pub project_path: String,
    /// Project paths this project's build depends on
    #[serde(default)]
    pub sub_project_paths: Vec<String>,
    /// Absolute paths of every source file scanned for this project
    #[serde(default)]
    pub source_file_paths: Vec<String>,
    #[serde(default)]
    pub concepts: ConceptCollection,
}

/// All records of one project, grouped by concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptCollection {
    #[serde(default, alias = "module")]
    pub modules: Vec<ModuleRecord>,
    #[serde(default, alias = "type-alias-declaration")]
    pub type_alias_declarations: Vec<TypeAliasRecord>,
    #[serde(default, alias = "class-declaration")]
    pub class_declarations: Vec<ClassRecord>,
    #[serde(default, alias = "interface-declaration")]
    pub interface_declarations: Vec<InterfaceRecord>,
    #[serde(default, alias = "enum-declaration")]
    pub enum_declarations: Vec<EnumRecord>,
    #[serde(default, alias = "function-declaration")]
    pub function_declarations: Vec<FunctionRecord>,
    #[serde(default, alias = "variable-declaration")]
    pub variable_declarations: Vec<VariableRecord>,
    #[serde(default, alias = "external-module")]
    pub external_modules: Vec<ExternalModuleRecord>,
    #[serde(default, alias = "export-declaration")]
    pub export_declarations: Vec<ExportRecord>,
    #[serde(default, alias = "dependency")]
    pub dependencies: Vec<DependencyRecord>,
    #[serde(default, alias = "react-component")]
    pub react_components: Vec<ComponentRecord>,
}

/// Source position of a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCoordinates {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub start_line: u32,
    #[serde(default)]
    pub start_column: u32,
    #[serde(default)]
    pub end_line: u32,
    #[serde(default)]
    pub end_column: u32,
}

/// Modifiers shared by class members
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberModifiers {
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default, alias = "override")]
    pub is_override: bool,
    #[serde(default, alias = "abstract")]
    pub is_abstract: bool,
    #[serde(default, alias = "static")]
    pub is_static: bool,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Absolute source file path
    pub path: String,
    pub local_fqn: String,
    pub global_fqn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub class_name: String,
    #[serde(default, alias = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterRecord>,
    #[serde(default)]
    pub extends_class: Option<DeclaredTypeRecord>,
    #[serde(default)]
    pub implements_interfaces: Vec<DeclaredTypeRecord>,
    #[serde(default, alias = "constr")]
    pub constructor: Option<ConstructorRecord>,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
    #[serde(default)]
    pub accessor_properties: Vec<AccessorPropertyRecord>,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub interface_name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterRecord>,
    #[serde(default)]
    pub extends_interfaces: Vec<DeclaredTypeRecord>,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
    #[serde(default)]
    pub accessor_properties: Vec<AccessorPropertyRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
    #[serde(default)]
    pub parameter_properties: Vec<ParameterPropertyRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

/// A constructor parameter that also declares a class property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterPropertyRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub index: u32,
    pub property_name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRecord>,
    #[serde(default, flatten)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub property_name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRecord>,
    #[serde(default, flatten)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub method_name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
    #[serde(default)]
    pub return_type: Option<TypeRecord>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterRecord>,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default, flatten)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub index: u32,
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRecord>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorPropertyRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub accessor_name: String,
    #[serde(default)]
    pub getter: Option<GetterRecord>,
    #[serde(default)]
    pub setter: Option<SetterRecord>,
    #[serde(default)]
    pub auto_accessor: Option<AutoAccessorRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetterRecord {
    #[serde(default)]
    pub return_type: Option<TypeRecord>,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default, flatten)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterRecord {
    #[serde(default)]
    pub parameter: Option<ParameterRecord>,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default, flatten)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAccessorRecord {
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRecord>,
    #[serde(default)]
    pub decorators: Vec<DecoratorRecord>,
    #[serde(default, flatten)]
    pub modifiers: MemberModifiers,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub function_name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
    #[serde(default)]
    pub return_type: Option<TypeRecord>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub variable_name: String,
    /// `var`, `let` or `const`
    #[serde(default)]
    pub kind: String,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRecord>,
    #[serde(default)]
    pub init_value: Option<ValueRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub type_alias_name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterRecord>,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub enum_name: String,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub declared: bool,
    #[serde(default)]
    pub members: Vec<EnumMemberRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMemberRecord {
    pub local_fqn: String,
    pub global_fqn: String,
    pub enum_member_name: String,
    #[serde(default)]
    pub init_value: Option<ValueRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratorRecord {
    pub name: String,
    #[serde(default)]
    pub value: Option<ValueRecord>,
    #[serde(default)]
    pub coordinates: CodeCoordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameterRecord {
    pub name: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub constraint: Option<TypeRecord>,
}

// ============================================================================
// Types and values
// ============================================================================

/// Reference to a declared type by global FQN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredTypeRecord {
    pub fqn: String,
    #[serde(default)]
    pub type_arguments: Vec<TypeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMemberRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRecord,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionParameterRecord {
    #[serde(default)]
    pub index: u32,
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(rename = "type")]
    pub ty: TypeRecord,
}

/// Raw type expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum TypeRecord {
    Primitive {
        name: String,
    },
    Declared(DeclaredTypeRecord),
    Union {
        types: Vec<TypeRecord>,
    },
    Intersection {
        types: Vec<TypeRecord>,
    },
    Object {
        #[serde(default)]
        members: Vec<ObjectMemberRecord>,
    },
    Function {
        return_type: Box<TypeRecord>,
        #[serde(default)]
        parameters: Vec<FunctionParameterRecord>,
        #[serde(default)]
        type_parameters: Vec<TypeParameterRecord>,
    },
    TypeParameter {
        name: String,
    },
    Literal {
        value: serde_json::Value,
    },
    Tuple {
        #[serde(default)]
        types: Vec<TypeRecord>,
    },
    NotIdentified {
        #[serde(default)]
        identifier: String,
    },
}

impl Default for TypeRecord {
    fn default() -> Self {
        Self::NotIdentified {
            identifier: "missing type".to_string(),
        }
    }
}

impl TypeRecord {
    /// Shorthand for a primitive type
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive { name: name.into() }
    }

    /// Shorthand for a declared type without type arguments
    pub fn declared(fqn: impl Into<String>) -> Self {
        Self::Declared(DeclaredTypeRecord {
            fqn: fqn.into(),
            type_arguments: Vec::new(),
        })
    }

    /// Shorthand for a type-parameter reference
    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self::TypeParameter { name: name.into() }
    }
}

/// Raw run-time value tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "valueType",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ValueRecord {
    Null {
        /// `null` or `undefined`
        #[serde(default)]
        kind: String,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Literal {
        value: serde_json::Value,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Declared {
        fqn: String,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Member {
        parent: Box<ValueRecord>,
        member: Box<ValueRecord>,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Object {
        #[serde(default)]
        members: BTreeMap<String, ValueRecord>,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Array {
        #[serde(default)]
        items: Vec<ValueRecord>,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Call {
        callee: Box<ValueRecord>,
        #[serde(default)]
        args: Vec<ValueRecord>,
        #[serde(default)]
        type_args: Vec<TypeRecord>,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Function {
        #[serde(default)]
        arrow_function: bool,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Class {
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
    Complex {
        expression: String,
        #[serde(default, rename = "type")]
        ty: TypeRecord,
    },
}

impl ValueRecord {
    /// Shorthand for a declared value reference
    pub fn declared(fqn: impl Into<String>) -> Self {
        Self::Declared {
            fqn: fqn.into(),
            ty: TypeRecord::default(),
        }
    }
}

// ============================================================================
// Linkage records
// ============================================================================

/// Whether an FQN names a declaration or a whole module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FqnType {
    #[default]
    Declaration,
    Module,
}

/// Raw reference tally between two declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    #[serde(alias = "globalSourceFQN")]
    pub global_source_fqn: String,
    #[serde(default)]
    pub source_type: FqnType,
    /// Global FQN of the dependency target
    pub global_fqn: String,
    #[serde(default)]
    pub target_type: FqnType,
    pub cardinality: u32,
}

impl DependencyRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, cardinality: u32) -> Self {
        Self {
            global_source_fqn: source.into(),
            global_fqn: target.into(),
            cardinality,
            ..Default::default()
        }
    }
}

/// Kind of an export statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExportKind {
    #[default]
    Value,
    Type,
    /// `export * from "..."`
    Namespace,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub identifier: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Global FQN of the exported declaration, if the analyzer could determine it
    #[serde(default)]
    pub global_decl_fqn: Option<String>,
    #[serde(default)]
    pub import_source: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub kind: ExportKind,
    /// Absolute path of the exporting module (its global FQN)
    pub source_file_path_absolute: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalModuleRecord {
    pub global_fqn: String,
    #[serde(default)]
    pub local_fqn: Option<String>,
    #[serde(default)]
    pub declarations: Vec<ExternalDeclarationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDeclarationRecord {
    pub global_fqn: String,
    pub name: String,
}

/// A UI component and the elements it renders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub global_fqn: String,
    pub component_name: String,
    #[serde(default)]
    pub class_component: bool,
    #[serde(default)]
    pub rendered_elements: Vec<RenderedElementRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedElementRecord {
    pub global_fqn: String,
    pub name: String,
    pub cardinality: u32,
}
