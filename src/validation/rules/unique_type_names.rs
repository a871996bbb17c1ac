use crate::{
    ast::{Document, TypeDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

/// Checks that no two type definitions share a name. Extensions don't count.
#[derive(Default)]
pub struct UniqueTypeNames<'a> {
    names: NameGroups<'a>,
}

pub fn factory<'a>() -> UniqueTypeNames<'a> {
    UniqueTypeNames::default()
}

impl<'a> Visitor<'a> for UniqueTypeNames<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        self.names.report(ctx, duplicate_message);
    }

    fn enter_type_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        if !def.item.extension {
            self.names.insert(def.item.name.item, def.item.name.span.start);
        }
    }
}

fn duplicate_message(type_name: &str) -> String {
    format!("There can only be one type named \"{type_name}\"")
}
