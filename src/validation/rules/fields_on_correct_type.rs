use crate::{
    ast::{Field, Operation, OperationType, Selection},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct FieldsOnCorrectType;

pub fn factory() -> FieldsOnCorrectType {
    FieldsOnCorrectType
}

impl<'a> Visitor<'a> for FieldsOnCorrectType {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        operation: &'a Spanning<Operation<'a>>,
    ) {
        if operation.item.operation_type != OperationType::Subscription {
            return;
        }
        // A subscription root selects exactly one event stream.
        let typenames = operation.item.selection_set.iter().filter_map(|s| match s {
            Selection::Field(f) if f.item.name.item == "__typename" => Some(f.item.name.span.start),
            _ => None,
        });
        for at in typenames {
            ctx.report_error(SUBSCRIPTION_TYPENAME_MESSAGE, &[at]);
        }
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        let Some(owner) = ctx.parent_type() else {
            return;
        };
        let name = &field.item.name;
        if ctx.schema.lookup_field(owner, name.item).is_none() {
            ctx.report_error(&error_message(name.item, owner.name()), &[name.span.start]);
        }
    }
}

const SUBSCRIPTION_TYPENAME_MESSAGE: &str =
    "`__typename` may not be included as a root field in a subscription operation";

fn error_message(field: &str, type_name: &str) -> String {
    format!(r#"Unknown field "{field}" on type "{type_name}""#)
}
