use derive_more::with_trait::Display;

use crate::{
    ast::{Arguments, Directive, Field},
    parser::{SourcePosition, Spanning},
    schema::meta::Argument,
    validation::{ValidatorContext, Visitor},
};

pub struct ProvidedNonNullArguments;

pub fn factory() -> ProvidedNonNullArguments {
    ProvidedNonNullArguments
}

/// The field or directive an argument is declared on.
#[derive(Clone, Copy, Display)]
enum Owner<'a> {
    #[display("Field \"{_0}\"")]
    Field(&'a str),
    #[display("Directive \"@{_0}\"")]
    Directive(&'a str),
}

impl<'a> Visitor<'a> for ProvidedNonNullArguments {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        let schema = ctx.schema;
        let name = field.item.name.item;
        if let Some(def) = ctx.parent_type().and_then(|t| schema.lookup_field(t, name)) {
            let given = field.item.arguments.as_ref();
            report_missing(ctx, Owner::Field(name), &def.arguments, given, field.span.start);
        }
    }

    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Spanning<Directive<'a>>,
    ) {
        let schema = ctx.schema;
        let name = directive.item.name.item;
        if let Some(def) = schema.directive_by_name(name) {
            let (given, at) = (directive.item.arguments.as_ref(), directive.span.start);
            report_missing(ctx, Owner::Directive(name), &def.arguments, given, at);
        }
    }
}

/// Reports every non-null argument without a default that `given` lacks.
fn report_missing(
    ctx: &mut ValidatorContext<'_>,
    owner: Owner<'_>,
    declared: &[Argument],
    given: Option<&Spanning<Arguments<'_>>>,
    at: SourcePosition,
) {
    let is_given = |name: &str| given.is_some_and(|args| args.item.get(name).is_some());
    for arg in declared.iter().filter(|a| a.is_required() && !is_given(&a.name)) {
        ctx.report_error(&error_message(owner, &arg.name, &arg.arg_type), &[at]);
    }
}

fn error_message(owner: Owner<'_>, arg: &str, arg_type: impl Display) -> String {
    format!("{owner} argument \"{arg}\" of type \"{arg_type}\" is required but not provided")
}
