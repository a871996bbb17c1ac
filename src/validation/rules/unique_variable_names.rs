use crate::{
    ast::Operation,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

pub struct UniqueVariableNames;

pub fn factory() -> UniqueVariableNames {
    UniqueVariableNames
}

impl<'a> Visitor<'a> for UniqueVariableNames {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        if let Some(defs) = &op.item.variable_definitions {
            defs.item
                .iter()
                .map(|(name, _)| *name)
                .collect::<NameGroups<'_>>()
                .report(ctx, error_message);
        }
    }
}

fn error_message(var_name: &str) -> String {
    format!("There can only be one variable named \"${var_name}\"")
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
    fn scopes_names_to_each_operation() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query A($id: ID!, $first: Int) { node(id: $id) { id } pets(first: $first) { id } }
            query B($id: ID!) { node(id: $id) { id } }
            mutation C($id: ID!) { adopt(petId: $id) { id } }
            "#,
        );
    }

    #[test]
    fn reports_repeated_variables() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query A($id: ID!, $first: Int, $id: ID, $first: Int = 3, $id: String) {
              node(id: $id) { id }
            }
            "#,
            &[
                RuleError::new(
                    &error_message("id"),
                    &[
                        SourcePosition::new(21, 1, 20),
                        SourcePosition::new(44, 1, 43),
                        SourcePosition::new(70, 1, 69),
                    ],
                ),
                RuleError::new(
                    &error_message("first"),
                    &[SourcePosition::new(31, 1, 30), SourcePosition::new(53, 1, 52)],
                ),
            ],
        );
    }
}
