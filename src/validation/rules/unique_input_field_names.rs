use crate::{
    ast::InputValue,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

pub struct UniqueInputFieldNames;

pub fn factory() -> UniqueInputFieldNames {
    UniqueInputFieldNames
}

impl<'a> Visitor<'a> for UniqueInputFieldNames {
    fn enter_object_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        object: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        object
            .item
            .iter()
            .map(|(key, _)| key.as_ref().map(String::as_str))
            .collect::<NameGroups<'_>>()
            .report(ctx, error_message);
    }
}

fn error_message(field_name: &str) -> String {
    format!("There can only be one input field named \"{field_name}\"")
}
