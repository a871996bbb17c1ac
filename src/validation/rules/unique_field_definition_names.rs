use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::{
    ast::{Document, TypeDefinition, TypeDefinitionKind},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

/// Checks that the fields of an object, interface or input object,
/// extensions included, have distinct names.
#[derive(Default)]
pub struct UniqueFieldDefinitionNames<'a> {
    types: IndexMap<&'a str, NameGroups<'a>, FnvBuildHasher>,
}

pub fn factory<'a>() -> UniqueFieldDefinitionNames<'a> {
    UniqueFieldDefinitionNames::default()
}

impl<'a> Visitor<'a> for UniqueFieldDefinitionNames<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        for (type_name, fields) in &self.types {
            fields.report(ctx, |field| duplicate_message(type_name, field));
        }
    }

    fn enter_type_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        let names: Vec<(&'a str, SourcePosition)> = match &def.item.kind {
            TypeDefinitionKind::Object { fields, .. }
            | TypeDefinitionKind::Interface { fields, .. } => fields
                .iter()
                .map(|f| (f.item.name.item, f.item.name.span.start))
                .collect(),
            TypeDefinitionKind::InputObject { fields } => fields
                .iter()
                .map(|f| (f.item.name.item, f.item.name.span.start))
                .collect(),
            _ => return,
        };

        let groups = self.types.entry(def.item.name.item).or_default();
        for (name, at) in names {
            groups.insert(name, at);
        }
    }
}

fn duplicate_message(type_name: &str, field_name: &str) -> String {
    format!("Field \"{type_name}.{field_name}\" can only be defined once")
}
