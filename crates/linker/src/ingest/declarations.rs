//! Declaration conversion
//!
//! Generic constructs open a type-parameter scope: classes around their whole
//! body, interfaces and type aliases around their body, and methods,
//! constructors and functions around their signature. Type parameters are
//! declared first so that every later type in the construct can see them.

use super::ProjectIngestor;
use tsgraph_core::graph::{DeclarationKind, VariableKind};
use tsgraph_core::records::{
    AccessorPropertyRecord, ClassRecord, ConstructorRecord, DecoratorRecord, EnumRecord,
    FunctionRecord, InterfaceRecord, MethodRecord, ParameterPropertyRecord, ParameterRecord,
    PropertyRecord, TypeAliasRecord, VariableRecord,
};
use tsgraph_core::{DeclId, Result};

impl ProjectIngestor<'_> {
    pub(super) fn ingest_class(&mut self, record: &ClassRecord) -> Result<DeclId> {
        self.with_scope(|this| {
            let type_parameters = this.declare_type_parameters(&record.type_parameters)?;
            let extends_class = record
                .extends_class
                .as_ref()
                .map(|declared| this.convert_declared_type(declared))
                .transpose()?;
            let implements_interfaces =
                this.convert_declared_types(&record.implements_interfaces)?;

            let class = this.declare(
                DeclarationKind::Class {
                    is_abstract: record.is_abstract,
                    extends_class,
                    implements_interfaces,
                },
                &record.class_name,
                &record.local_fqn,
                &record.global_fqn,
                &record.coordinates,
                None,
            )?;
            this.adopt(&type_parameters, class)?;
            this.ingest_decorators(&record.decorators, class)?;

            if let Some(constructor) = &record.constructor {
                this.ingest_constructor(constructor, class)?;
            }
            for property in &record.properties {
                this.ingest_property(property, class)?;
            }
            for method in &record.methods {
                this.ingest_method(method, class)?;
            }
            for accessor in &record.accessor_properties {
                this.ingest_accessor(accessor, class)?;
            }
            Ok(class)
        })
    }

    pub(super) fn ingest_interface(&mut self, record: &InterfaceRecord) -> Result<DeclId> {
        self.with_scope(|this| {
            let type_parameters = this.declare_type_parameters(&record.type_parameters)?;
            let extends_interfaces = this.convert_declared_types(&record.extends_interfaces)?;

            let interface = this.declare(
                DeclarationKind::Interface { extends_interfaces },
                &record.interface_name,
                &record.local_fqn,
                &record.global_fqn,
                &record.coordinates,
                None,
            )?;
            this.adopt(&type_parameters, interface)?;

            for property in &record.properties {
                this.ingest_property(property, interface)?;
            }
            for method in &record.methods {
                this.ingest_method(method, interface)?;
            }
            for accessor in &record.accessor_properties {
                this.ingest_accessor(accessor, interface)?;
            }
            Ok(interface)
        })
    }

    pub(super) fn ingest_type_alias(&mut self, record: &TypeAliasRecord) -> Result<DeclId> {
        self.with_scope(|this| {
            let type_parameters = this.declare_type_parameters(&record.type_parameters)?;
            let aliased = this.convert_optional_type(record.ty.as_ref())?;
            let alias = this.declare(
                DeclarationKind::TypeAlias { aliased },
                &record.type_alias_name,
                &record.local_fqn,
                &record.global_fqn,
                &record.coordinates,
                None,
            )?;
            this.adopt(&type_parameters, alias)?;
            Ok(alias)
        })
    }

    pub(super) fn ingest_enum(&mut self, record: &EnumRecord) -> Result<DeclId> {
        let declaration = self.declare(
            DeclarationKind::Enum {
                constant: record.constant,
                declared: record.declared,
            },
            &record.enum_name,
            &record.local_fqn,
            &record.global_fqn,
            &record.coordinates,
            None,
        )?;
        for member in &record.members {
            let init_value = self.convert_optional_value(member.init_value.as_ref())?;
            self.declare(
                DeclarationKind::EnumMember { init_value },
                &member.enum_member_name,
                &member.local_fqn,
                &member.global_fqn,
                &member.coordinates,
                Some(declaration),
            )?;
        }
        Ok(declaration)
    }

    pub(super) fn ingest_function(&mut self, record: &FunctionRecord) -> Result<DeclId> {
        self.with_scope(|this| {
            let type_parameters = this.declare_type_parameters(&record.type_parameters)?;
            let return_type = this.convert_optional_type(record.return_type.as_ref())?;
            let function = this.declare(
                DeclarationKind::Function { return_type },
                &record.function_name,
                &record.local_fqn,
                &record.global_fqn,
                &record.coordinates,
                None,
            )?;
            this.adopt(&type_parameters, function)?;
            this.ingest_parameters(&record.parameters, function)?;
            Ok(function)
        })
    }

    pub(super) fn ingest_variable(&mut self, record: &VariableRecord) -> Result<DeclId> {
        let ty = self.convert_optional_type(record.ty.as_ref())?;
        let init_value = self.convert_optional_value(record.init_value.as_ref())?;
        // unknown keywords fall back to `let`
        let kind = record.kind.parse::<VariableKind>().unwrap_or_default();
        self.declare(
            DeclarationKind::Variable {
                kind,
                ty,
                init_value,
            },
            &record.variable_name,
            &record.local_fqn,
            &record.global_fqn,
            &record.coordinates,
            None,
        )
    }

    fn ingest_constructor(&mut self, record: &ConstructorRecord, class: DeclId) -> Result<DeclId> {
        self.with_scope(|this| {
            let constructor = this.declare(
                DeclarationKind::Constructor,
                "constructor",
                &record.local_fqn,
                &record.global_fqn,
                &record.coordinates,
                Some(class),
            )?;
            this.ingest_parameters(&record.parameters, constructor)?;
            for property in &record.parameter_properties {
                this.ingest_parameter_property(property, class)?;
            }
            Ok(constructor)
        })
    }

    /// A constructor parameter that is also a property of the class
    fn ingest_parameter_property(
        &mut self,
        record: &ParameterPropertyRecord,
        class: DeclId,
    ) -> Result<DeclId> {
        let ty = self.convert_optional_type(record.ty.as_ref())?;
        let property = self.declare(
            DeclarationKind::Property {
                ty,
                optional: record.optional,
                readonly: record.readonly,
                modifiers: record.modifiers.clone(),
                parameter_index: Some(record.index),
            },
            &record.property_name,
            &record.local_fqn,
            &record.global_fqn,
            &record.coordinates,
            Some(class),
        )?;
        self.ingest_decorators(&record.decorators, property)?;
        Ok(property)
    }

    fn ingest_property(&mut self, record: &PropertyRecord, parent: DeclId) -> Result<DeclId> {
        let ty = self.convert_optional_type(record.ty.as_ref())?;
        let property = self.declare(
            DeclarationKind::Property {
                ty,
                optional: record.optional,
                readonly: record.readonly,
                modifiers: record.modifiers.clone(),
                parameter_index: None,
            },
            &record.property_name,
            &record.local_fqn,
            &record.global_fqn,
            &record.coordinates,
            Some(parent),
        )?;
        self.ingest_decorators(&record.decorators, property)?;
        Ok(property)
    }

    fn ingest_method(&mut self, record: &MethodRecord, parent: DeclId) -> Result<DeclId> {
        self.with_scope(|this| {
            let type_parameters = this.declare_type_parameters(&record.type_parameters)?;
            let return_type = this.convert_optional_type(record.return_type.as_ref())?;
            let method = this.declare(
                DeclarationKind::Method {
                    return_type,
                    modifiers: record.modifiers.clone(),
                },
                &record.method_name,
                &record.local_fqn,
                &record.global_fqn,
                &record.coordinates,
                Some(parent),
            )?;
            this.adopt(&type_parameters, method)?;
            this.ingest_parameters(&record.parameters, method)?;
            this.ingest_decorators(&record.decorators, method)?;
            Ok(method)
        })
    }

    fn ingest_accessor(
        &mut self,
        record: &AccessorPropertyRecord,
        parent: DeclId,
    ) -> Result<DeclId> {
        // the accessor itself is positioned at its first accessor function
        let coordinates = record
            .getter
            .as_ref()
            .map(|getter| &getter.coordinates)
            .or_else(|| record.setter.as_ref().map(|setter| &setter.coordinates))
            .or_else(|| record.auto_accessor.as_ref().map(|auto| &auto.coordinates))
            .cloned()
            .unwrap_or_default();
        let accessor = self.declare(
            DeclarationKind::Accessor,
            &record.accessor_name,
            &record.local_fqn,
            &record.global_fqn,
            &coordinates,
            Some(parent),
        )?;

        if let Some(getter) = &record.getter {
            let return_type = self.convert_optional_type(getter.return_type.as_ref())?;
            let id = self.declare_unregistered(
                DeclarationKind::Getter {
                    return_type,
                    modifiers: getter.modifiers.clone(),
                },
                &record.accessor_name,
                Some(&getter.coordinates),
                Some(accessor),
            )?;
            self.ingest_decorators(&getter.decorators, id)?;
        }

        if let Some(setter) = &record.setter {
            let id = self.declare_unregistered(
                DeclarationKind::Setter {
                    modifiers: setter.modifiers.clone(),
                },
                &record.accessor_name,
                Some(&setter.coordinates),
                Some(accessor),
            )?;
            if let Some(parameter) = &setter.parameter {
                self.ingest_parameters(std::slice::from_ref(parameter), id)?;
            }
            self.ingest_decorators(&setter.decorators, id)?;
        }

        if let Some(auto) = &record.auto_accessor {
            let ty = self.convert_optional_type(auto.ty.as_ref())?;
            let id = self.declare_unregistered(
                DeclarationKind::AutoAccessor {
                    ty,
                    modifiers: auto.modifiers.clone(),
                },
                &record.accessor_name,
                Some(&auto.coordinates),
                Some(accessor),
            )?;
            self.ingest_decorators(&auto.decorators, id)?;
        }

        Ok(accessor)
    }

    fn ingest_parameters(&mut self, records: &[ParameterRecord], parent: DeclId) -> Result<()> {
        for record in records {
            let ty = self.convert_optional_type(record.ty.as_ref())?;
            let parameter = self.declare_unregistered(
                DeclarationKind::Parameter {
                    index: record.index,
                    ty,
                    optional: record.optional,
                },
                &record.name,
                Some(&record.coordinates),
                Some(parent),
            )?;
            self.ingest_decorators(&record.decorators, parameter)?;
        }
        Ok(())
    }

    fn ingest_decorators(&mut self, records: &[DecoratorRecord], parent: DeclId) -> Result<()> {
        for record in records {
            let value = self.convert_optional_value(record.value.as_ref())?;
            self.declare_unregistered(
                DeclarationKind::Decorator { value },
                &record.name,
                Some(&record.coordinates),
                Some(parent),
            )?;
        }
        Ok(())
    }
}
