use crate::{
    ast::{Document, Operation},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

#[derive(Default)]
pub struct UniqueOperationNames<'a> {
    names: NameGroups<'a>,
}

pub fn factory<'a>() -> UniqueOperationNames<'a> {
    UniqueOperationNames::default()
}

impl<'a> Visitor<'a> for UniqueOperationNames<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        self.names.report(ctx, error_message);
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        if let Some(op_name) = &op.item.name {
            self.names.insert(op_name.item, op_name.span.start);
        }
    }
}

fn error_message(op_name: &str) -> String {
    format!("There can only be one operation named \"{op_name}\"")
}
