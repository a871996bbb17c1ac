use crate::{
    ast::{Document, OperationType, SchemaDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

/// Checks that every kind of operation gets its root type once, across the
/// schema definition and its extensions.
#[derive(Default)]
pub struct UniqueOperationTypes<'a> {
    operations: NameGroups<'a>,
}

pub fn factory<'a>() -> UniqueOperationTypes<'a> {
    UniqueOperationTypes::default()
}

impl<'a> Visitor<'a> for UniqueOperationTypes<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        self.operations.report(ctx, duplicate_message);
    }

    fn enter_schema_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a Spanning<SchemaDefinition<'a>>,
    ) {
        for op in &def.item.operation_types {
            let keyword = match op.item.operation {
                OperationType::Query => "query",
                OperationType::Mutation => "mutation",
                OperationType::Subscription => "subscription",
            };
            self.operations.insert(keyword, op.span.start);
        }
    }
}

fn duplicate_message(operation: &str) -> String {
    format!("There can be only one {operation} type in schema")
}
