use crate::{
    ast::{Arguments, Directive, Field},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

pub struct UniqueArgumentNames;

pub fn factory() -> UniqueArgumentNames {
    UniqueArgumentNames
}

impl<'a> Visitor<'a> for UniqueArgumentNames {
    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Spanning<Directive<'a>>,
    ) {
        check_arguments(ctx, directive.item.arguments.as_ref());
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        check_arguments(ctx, field.item.arguments.as_ref());
    }
}

fn check_arguments(ctx: &mut ValidatorContext<'_>, arguments: Option<&Spanning<Arguments<'_>>>) {
    if let Some(args) = arguments {
        args.item
            .iter()
            .map(|(name, _)| *name)
            .collect::<NameGroups<'_>>()
            .report(ctx, error_message);
    }
}

fn error_message(arg_name: &str) -> String {
    format!("There can only be one argument named \"{arg_name}\"")
}
