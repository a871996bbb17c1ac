use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::{
    ast::{Document, TypeDefinition, TypeDefinitionKind},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

/// Checks that the values of an enum, extensions included, have distinct
/// names.
#[derive(Default)]
pub struct UniqueEnumValueNames<'a> {
    enums: IndexMap<&'a str, NameGroups<'a>, FnvBuildHasher>,
}

pub fn factory<'a>() -> UniqueEnumValueNames<'a> {
    UniqueEnumValueNames::default()
}

impl<'a> Visitor<'a> for UniqueEnumValueNames<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        for (enum_name, values) in &self.enums {
            values.report(ctx, |value| duplicate_message(enum_name, value));
        }
    }

    fn enter_type_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        if let TypeDefinitionKind::Enum { values } = &def.item.kind {
            let groups = self.enums.entry(def.item.name.item).or_default();
            for value in values {
                groups.insert(value.item.name.item, value.item.name.span.start);
            }
        }
    }
}

fn duplicate_message(enum_name: &str, value_name: &str) -> String {
    format!("Enum value \"{enum_name}.{value_name}\" can only be defined once")
}
