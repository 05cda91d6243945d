//! Type expression conversion

use super::ProjectIngestor;
use crate::resolution::ReferenceSlot;
use tracing::debug;
use tsgraph_core::graph::{DeclarationKind, FunctionParameter, ObjectMember, TypeKind};
use tsgraph_core::records::{
    DeclaredTypeRecord, FunctionParameterRecord, TypeParameterRecord, TypeRecord,
};
use tsgraph_core::{DeclId, DeferredRef, Result, TypeId};

const MISSING_TYPE: &str = "missing type";

impl ProjectIngestor<'_> {
    pub(super) fn convert_type(&mut self, record: &TypeRecord) -> Result<TypeId> {
        let kind = match record {
            TypeRecord::Primitive { name } => TypeKind::Primitive { name: name.clone() },
            TypeRecord::Declared(declared) => return self.convert_declared_type(declared),
            TypeRecord::Union { types } => TypeKind::Union {
                types: self.convert_types(types)?,
            },
            TypeRecord::Intersection { types } => TypeKind::Intersection {
                types: self.convert_types(types)?,
            },
            TypeRecord::Object { members } => {
                let mut converted = Vec::with_capacity(members.len());
                for member in members {
                    converted.push(ObjectMember {
                        name: member.name.clone(),
                        ty: self.convert_type(&member.ty)?,
                        optional: member.optional,
                        readonly: member.readonly,
                    });
                }
                TypeKind::Object { members: converted }
            }
            TypeRecord::Function {
                return_type,
                parameters,
                type_parameters,
            } => return self.convert_function_type(return_type, parameters, type_parameters),
            TypeRecord::TypeParameter { name } => {
                let declaration = self.scopes.resolve_parameter(name);
                if declaration.is_none() {
                    debug!("Type parameter {} is not declared in any enclosing scope", name);
                }
                TypeKind::TypeParameterRef {
                    name: name.clone(),
                    declaration,
                }
            }
            TypeRecord::Literal { value } => TypeKind::Literal {
                value: value.clone(),
            },
            TypeRecord::Tuple { types } => TypeKind::Tuple {
                types: self.convert_types(types)?,
            },
            TypeRecord::NotIdentified { identifier } => TypeKind::NotIdentified {
                identifier: identifier.clone(),
            },
        };
        Ok(self.graph.add_type(kind))
    }

    /// Converts an optional type, substituting a not-identified placeholder
    pub(super) fn convert_optional_type(&mut self, record: Option<&TypeRecord>) -> Result<TypeId> {
        match record {
            Some(record) => self.convert_type(record),
            None => Ok(self.graph.add_type(TypeKind::NotIdentified {
                identifier: MISSING_TYPE.to_string(),
            })),
        }
    }

    pub(super) fn convert_types(&mut self, records: &[TypeRecord]) -> Result<Vec<TypeId>> {
        records.iter().map(|record| self.convert_type(record)).collect()
    }

    /// Converts a declared type and queues its reference for deferred resolution
    pub(super) fn convert_declared_type(&mut self, record: &DeclaredTypeRecord) -> Result<TypeId> {
        let type_arguments = self.convert_types(&record.type_arguments)?;
        let id = self.graph.add_type(TypeKind::Declared {
            reference: DeferredRef::new(&record.fqn),
            type_arguments,
        });
        self.queue.defer(ReferenceSlot::Type(id));
        Ok(id)
    }

    pub(super) fn convert_declared_types(
        &mut self,
        records: &[DeclaredTypeRecord],
    ) -> Result<Vec<TypeId>> {
        records
            .iter()
            .map(|record| self.convert_declared_type(record))
            .collect()
    }

    /// Declares type parameters in the innermost scope
    ///
    /// Each parameter is visible before its own constraint is converted, so
    /// self-referencing constraints such as `T extends Node<T>` resolve.
    pub(super) fn declare_type_parameters(
        &mut self,
        records: &[TypeParameterRecord],
    ) -> Result<Vec<DeclId>> {
        let mut declared = Vec::with_capacity(records.len());
        for record in records {
            let id = self.declare_unregistered(
                DeclarationKind::TypeParameter {
                    index: record.index,
                    constraint: None,
                },
                &record.name,
                None,
                None,
            )?;
            self.scopes.register_parameter(&record.name, id);
            declared.push(id);
        }

        for (record, id) in records.iter().zip(&declared) {
            let Some(constraint) = &record.constraint else {
                continue;
            };
            let constraint = self.convert_type(constraint)?;
            if let DeclarationKind::TypeParameter {
                constraint: slot, ..
            } = &mut self.graph.declaration_mut(*id)?.kind
            {
                *slot = Some(constraint);
            }
        }

        Ok(declared)
    }

    fn convert_function_type(
        &mut self,
        return_type: &TypeRecord,
        parameters: &[FunctionParameterRecord],
        type_parameters: &[TypeParameterRecord],
    ) -> Result<TypeId> {
        self.with_scope(|this| {
            let type_parameters = this.declare_type_parameters(type_parameters)?;
            let mut converted = Vec::with_capacity(parameters.len());
            for parameter in parameters {
                converted.push(FunctionParameter {
                    index: parameter.index,
                    name: parameter.name.clone(),
                    optional: parameter.optional,
                    ty: this.convert_type(&parameter.ty)?,
                });
            }
            let return_type = this.convert_type(return_type)?;
            Ok(this.graph.add_type(TypeKind::Function {
                parameters: converted,
                return_type,
                type_parameters,
            }))
        })
    }
}
