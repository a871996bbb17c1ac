use crate::{
    ast::{Definition, Document},
    validation::{ValidatorContext, Visitor},
};

pub struct ExecutableDefinitions;

pub fn factory() -> ExecutableDefinitions {
    ExecutableDefinitions
}

impl<'a> Visitor<'a> for ExecutableDefinitions {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        for def in doc {
            let (name, start) = match def {
                Definition::Operation(_) | Definition::Fragment(_) => continue,
                Definition::Schema(s) => ("schema".to_owned(), s.span.start),
                Definition::Type(t) => (format!("\"{}\"", t.item.name.item), t.span.start),
                Definition::Directive(d) => (format!("\"{}\"", d.item.name.item), d.span.start),
            };
            ctx.report_error(&error_message(&name), &[start]);
        }
    }
}

fn error_message(def_name: &str) -> String {
    format!("The {def_name} definition is not executable.")
}
