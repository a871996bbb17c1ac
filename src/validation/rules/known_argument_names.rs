use fnv::FnvHashMap;

use crate::{
    ast::{Definition, Directive, Document, Field, InputValue},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

#[derive(Debug)]
enum ArgumentPosition<'a> {
    Directive(&'a str),
    Field(&'a str, &'a str),
}

/// Also checks directive arguments against the directives defined by the
/// document itself, for type system documents.
pub struct KnownArgumentNames<'a> {
    defined_directives: FnvHashMap<&'a str, Vec<&'a str>>,
    current_args: Option<(ArgumentPosition<'a>, Vec<&'a str>)>,
}

pub fn factory<'a>() -> KnownArgumentNames<'a> {
    KnownArgumentNames {
        defined_directives: FnvHashMap::default(),
        current_args: None,
    }
}

impl<'a> Visitor<'a> for KnownArgumentNames<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        for def in doc {
            if let Definition::Directive(d) = def {
                self.defined_directives.insert(
                    d.item.name.item,
                    d.item.arguments.iter().map(|a| a.item.name.item).collect(),
                );
            }
        }
    }

    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Spanning<Directive<'a>>,
    ) {
        let name = directive.item.name.item;
        let known_args = self.defined_directives.get(name).cloned().or_else(|| {
            ctx.schema
                .directive_by_name(name)
                .map(|d| d.arguments.iter().map(|a| a.name.as_str()).collect())
        });
        self.current_args = known_args.map(|args| (ArgumentPosition::Directive(name), args));
    }

    fn exit_directive(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Directive<'a>>) {
        self.current_args = None;
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        let schema = ctx.schema;
        self.current_args = ctx.parent_type().and_then(|parent| {
            let meta_field = schema.lookup_field(parent, field.item.name.item)?;
            Some((
                ArgumentPosition::Field(field.item.name.item, parent.name().as_str()),
                meta_field.arguments.iter().map(|a| a.name.as_str()).collect(),
            ))
        });
    }

    fn exit_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Field<'a>>) {
        self.current_args = None;
    }

    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (arg_name, _): &'a (Spanning<&'a str>, Spanning<InputValue>),
    ) {
        let Some((pos, args)) = &self.current_args else {
            return;
        };
        if args.contains(&arg_name.item) {
            return;
        }

        let message = match *pos {
            ArgumentPosition::Field(field_name, type_name) => {
                field_error_message(arg_name.item, field_name, type_name)
            }
            ArgumentPosition::Directive(directive_name) => {
                directive_error_message(arg_name.item, directive_name)
            }
        };
        ctx.report_error(&message, &[arg_name.span.start]);
    }
}

fn field_error_message(arg_name: &str, field_name: &str, type_name: &str) -> String {
    format!(r#"Unknown argument "{arg_name}" on field "{field_name}" of type "{type_name}""#)
}

fn directive_error_message(arg_name: &str, directive_name: &str) -> String {
    format!(r#"Unknown argument "{arg_name}" on directive "{directive_name}""#)
}
