use crate::{
    ast::{DirectiveDefinition, Document},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

#[derive(Default)]
pub struct UniqueDirectiveNames<'a> {
    names: NameGroups<'a>,
}

pub fn factory<'a>() -> UniqueDirectiveNames<'a> {
    UniqueDirectiveNames::default()
}

impl<'a> Visitor<'a> for UniqueDirectiveNames<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        self.names.report(ctx, duplicate_message);
    }

    fn enter_directive_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a Spanning<DirectiveDefinition<'a>>,
    ) {
        self.names.insert(def.item.name.item, def.item.name.span.start);
    }
}

fn duplicate_message(directive_name: &str) -> String {
    format!("There can only be one directive named \"@{directive_name}\"")
}
