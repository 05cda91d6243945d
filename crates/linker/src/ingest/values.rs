//! Value expression conversion

use super::ProjectIngestor;
use crate::resolution::ReferenceSlot;
use tsgraph_core::graph::ValueKind;
use tsgraph_core::records::ValueRecord;
use tsgraph_core::{DeferredRef, Result, ValueId};

impl ProjectIngestor<'_> {
    pub(super) fn convert_value(&mut self, record: &ValueRecord) -> Result<ValueId> {
        let (kind, ty) = match record {
            ValueRecord::Null { kind, ty } => (ValueKind::Null { kind: kind.clone() }, ty),
            ValueRecord::Literal { value, ty } => (
                ValueKind::Literal {
                    value: value.clone(),
                },
                ty,
            ),
            ValueRecord::Declared { fqn, ty } => {
                let ty = self.convert_type(ty)?;
                let id = self.graph.add_value(
                    ValueKind::Declared {
                        reference: DeferredRef::new(fqn),
                    },
                    ty,
                );
                self.queue.defer(ReferenceSlot::Value(id));
                return Ok(id);
            }
            ValueRecord::Member { parent, member, ty } => (
                ValueKind::Member {
                    parent: self.convert_value(parent)?,
                    member: self.convert_value(member)?,
                },
                ty,
            ),
            ValueRecord::Object { members, ty } => {
                let mut converted = Vec::with_capacity(members.len());
                for (name, value) in members {
                    converted.push((name.clone(), self.convert_value(value)?));
                }
                (ValueKind::Object { members: converted }, ty)
            }
            ValueRecord::Array { items, ty } => (
                ValueKind::Array {
                    items: self.convert_values(items)?,
                },
                ty,
            ),
            ValueRecord::Call {
                callee,
                args,
                type_args,
                ty,
            } => (
                ValueKind::Call {
                    callee: self.convert_value(callee)?,
                    args: self.convert_values(args)?,
                    type_args: self.convert_types(type_args)?,
                },
                ty,
            ),
            ValueRecord::Function { arrow_function, ty } => (
                ValueKind::Function {
                    arrow_function: *arrow_function,
                },
                ty,
            ),
            ValueRecord::Class { ty } => (ValueKind::Class, ty),
            ValueRecord::Complex { expression, ty } => (
                ValueKind::Complex {
                    expression: expression.clone(),
                },
                ty,
            ),
        };
        let ty = self.convert_type(ty)?;
        Ok(self.graph.add_value(kind, ty))
    }

    pub(super) fn convert_optional_value(
        &mut self,
        record: Option<&ValueRecord>,
    ) -> Result<Option<ValueId>> {
        record.map(|record| self.convert_value(record)).transpose()
    }

    fn convert_values(&mut self, records: &[ValueRecord]) -> Result<Vec<ValueId>> {
        records.iter().map(|record| self.convert_value(record)).collect()
    }
}
