use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Leaf fields take no selection set, composite ones require one.
pub struct ScalarLeafs;

pub fn factory() -> ScalarLeafs {
    ScalarLeafs
}

impl<'a> Visitor<'a> for ScalarLeafs {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        let (Some(named), Some(field_type)) = (ctx.current_type(), ctx.current_type_literal())
        else {
            return;
        };
        let name = field.item.name.item;

        let message = match (&field.item.selection_set, named.is_leaf()) {
            (Some(_), true) => selection_on_leaf(name, &field_type.to_string()),
            (None, false) => missing_selection(name, &field_type.to_string()),
            (Some(_), false) | (None, true) => return,
        };
        ctx.report_error(&message, &[field.span.start]);
    }
}

fn selection_on_leaf(field_name: &str, field_type: &str) -> String {
    format!("Field \"{field_name}\" of leaf type \"{field_type}\" cannot have a selection set")
}

fn missing_selection(field_name: &str, field_type: &str) -> String {
    format!("Field \"{field_name}\" of type \"{field_type}\" needs a selection of subfields")
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::SourcePosition,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{factory, missing_selection, selection_on_leaf};

    #[test]
    fn accepts_well_shaped_selections() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                id
                name(surname: true)
                ... on Dog { born owner { name } }
              }
              catOrDog { __typename }
              node(id: 1) { id }
            }
            "#,
        );
    }

    #[test]
    fn leaves_unknown_fields_alone() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            { pets { nickname { first } tail } }
            "#,
        );
    }

    #[test]
    fn rejects_composites_without_selection() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets
              catOrDog { ... on Dog { owner } }
            }
            "#,
            &[
                RuleError::new(
                    &missing_selection("pets", "[Pet!]!"),
                    &[SourcePosition::new(29, 2, 14)],
                ),
                RuleError::new(
                    &missing_selection("owner", "Human"),
                    &[SourcePosition::new(72, 3, 38)],
                ),
            ],
        );
    }

    #[test]
    fn rejects_selections_on_leaves() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              node(id: 1) { id { value } }
              pets { ... on Dog { born @include(if: true) { year } } }
            }
            "#,
            &[
                RuleError::new(&selection_on_leaf("id", "ID!"), &[SourcePosition::new(43, 2, 28)]),
                RuleError::new(
                    &selection_on_leaf("born", "Date"),
                    &[SourcePosition::new(92, 3, 34)],
                ),
            ],
        );
    }
}
