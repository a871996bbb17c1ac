use crate::{
    ast::InputValue,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Checks argument literals against the argument types. The walker pushes
/// the type of each known argument, unknown ones are left to
/// `KnownArgumentNames`.
pub struct ArgumentsOfCorrectType;

pub fn factory() -> ArgumentsOfCorrectType {
    ArgumentsOfCorrectType
}

impl<'a> Visitor<'a> for ArgumentsOfCorrectType {
    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (name, value): &'a (Spanning<&'a str>, Spanning<InputValue>),
    ) {
        if let Some(reason) = ctx.input_value_error(&value.item) {
            ctx.report_error(&error_message(name.item, &reason), &[value.span.start]);
        }
    }
}

fn error_message(arg_name: &str, reason: &str) -> String {
    format!("Argument \"{arg_name}\" has an invalid value: {reason}")
}
