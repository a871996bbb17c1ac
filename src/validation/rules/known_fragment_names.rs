use crate::{
    ast::FragmentSpread,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct KnownFragmentNames;

pub fn factory() -> KnownFragmentNames {
    KnownFragmentNames
}

impl<'a> Visitor<'a> for KnownFragmentNames {
    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        let name = &spread.item.name;
        if ctx.is_known_fragment(name.item) {
            return;
        }
        ctx.report_error(&error_message(name.item), &[name.span.start]);
    }
}

fn error_message(fragment: &str) -> String {
    format!("Unknown fragment \"{fragment}\"")
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::SourcePosition,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{error_message, factory};

    #[test]
    fn accepts_fragments_defined_anywhere() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            fragment humanName on Human { name }
            { pets { ...petId ... on Dog { ...dogOwner } } }
            fragment petId on Pet { id }
            fragment dogOwner on Dog { owner { ...humanName } }
            "#,
        );
    }

    #[test]
    fn reports_every_unknown_spread() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            { pets { ...petId ... on Dog { ...dogOwner } } }
            fragment dogOwner on Dog { owner { ...humanName @include(if: true) } }
            query Again { pets { ...petId } }
            "#,
            &[
                RuleError::new(&error_message("petId"), &[SourcePosition::new(25, 1, 24)]),
                RuleError::new(&error_message("humanName"), &[SourcePosition::new(112, 2, 50)]),
                RuleError::new(&error_message("petId"), &[SourcePosition::new(181, 3, 36)]),
            ],
        );
    }
}
