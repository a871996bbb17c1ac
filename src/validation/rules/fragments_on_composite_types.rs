use crate::{
    ast::{Fragment, InlineFragment},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub struct FragmentsOnCompositeTypes;

pub fn factory() -> FragmentsOnCompositeTypes {
    FragmentsOnCompositeTypes
}

/// The type condition is the current type when a fragment is entered.
/// Unknown type conditions are left to `KnownTypeNames`.
fn check_condition(ctx: &mut ValidatorContext<'_>, fragment: Option<&str>, at: SourcePosition) {
    let Some(condition) = ctx.current_type().filter(|t| !t.is_composite()) else {
        return;
    };
    let message = error_message(fragment, condition.name());
    ctx.report_error(&message, &[at]);
}

impl<'a> Visitor<'a> for FragmentsOnCompositeTypes {
    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment<'a>>,
    ) {
        check_condition(ctx, Some(f.item.name.item), f.item.type_condition.span.start);
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<InlineFragment<'a>>,
    ) {
        if let Some(condition) = &f.item.type_condition {
            check_condition(ctx, None, condition.span.start);
        }
    }
}

fn error_message(fragment: Option<&str>, condition: &str) -> String {
    match fragment {
        Some(name) => format!(
            "Fragment \"{name}\" cannot be conditioned on non-composite type \"{condition}\"",
        ),
        None => {
            format!("Inline fragment cannot be conditioned on non-composite type \"{condition}\"")
        }
    }
}
