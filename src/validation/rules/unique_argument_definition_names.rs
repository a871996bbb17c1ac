use crate::{
    ast::{DirectiveDefinition, InputValueDefinition, TypeDefinition, TypeDefinitionKind},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

/// Checks that the arguments of a field or directive definition have
/// distinct names.
pub struct UniqueArgumentDefinitionNames;

pub fn factory() -> UniqueArgumentDefinitionNames {
    UniqueArgumentDefinitionNames
}

impl<'a> Visitor<'a> for UniqueArgumentDefinitionNames {
    fn enter_type_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        if let TypeDefinitionKind::Object { fields, .. }
        | TypeDefinitionKind::Interface { fields, .. } = &def.item.kind
        {
            for field in fields {
                let owner = format!("{}.{}", def.item.name.item, field.item.name.item);
                check_arguments(ctx, &owner, &field.item.arguments);
            }
        }
    }

    fn enter_directive_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<DirectiveDefinition<'a>>,
    ) {
        let owner = format!("@{}", def.item.name.item);
        check_arguments(ctx, &owner, &def.item.arguments);
    }
}

fn check_arguments<'a>(
    ctx: &mut ValidatorContext<'a>,
    owner: &str,
    arguments: &'a [Spanning<InputValueDefinition<'a>>],
) {
    arguments
        .iter()
        .map(|arg| arg.item.name)
        .collect::<NameGroups<'_>>()
        .report(ctx, |arg_name| duplicate_message(owner, arg_name));
}

fn duplicate_message(owner: &str, arg_name: &str) -> String {
    format!("Argument \"{owner}({arg_name}:)\" can only be defined once")
}
