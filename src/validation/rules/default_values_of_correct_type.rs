use crate::{
    ast::VariableDefinition,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct DefaultValuesOfCorrectType;

pub fn factory() -> DefaultValuesOfCorrectType {
    DefaultValuesOfCorrectType
}

impl<'a> Visitor<'a> for DefaultValuesOfCorrectType {
    /// The variable type is the current input type here. Variables of
    /// unknown types are reported by `KnownTypeNames`.
    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (name, def): &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        let Some(default) = &def.default_value else {
            return;
        };
        if let Some(reason) = ctx.input_value_error(&default.item) {
            ctx.report_error(&error_message(name.item, &reason), &[default.span.start]);
        }
    }
}

fn error_message(var_name: &str, reason: &str) -> String {
    format!("Variable \"${var_name}\" has an invalid default value: {reason}")
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::InputValue,
        parser::SourcePosition,
        types::utilities::error,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{error_message, factory};

    #[test]
    fn accepts_fitting_defaults() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Pets(
              $first: Int = 5
              $filter: PetFilter = {limit: 3, order: DESC, tags: ["old"]}
              $id: ID = "7"
              $ratio: Float = 2
              $plain: String
              $shape: Shape = {sides: 3}
            ) {
              pets(first: $first, filter: $filter) { id }
            }
            "#,
        );
    }

    #[test]
    fn rejects_defaults_of_another_type() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Pets($first: Int = "five", $id: ID! = null, $filter: PetFilter = {order: UP}) {
              pets { id }
            }
            "#,
            &[
                RuleError::new(
                    &error_message(
                        "first",
                        &error::type_value(InputValue::scalar("five"), "Int"),
                    ),
                    &[SourcePosition::new(38, 1, 37)],
                ),
                RuleError::new(
                    &error_message("id", &error::non_null("ID!")),
                    &[SourcePosition::new(57, 1, 56)],
                ),
                RuleError::new(
                    &error_message(
                        "filter",
                        &error::field("PetFilter", "order", error::type_value("UP", "Order")),
                    ),
                    &[SourcePosition::new(84, 1, 83)],
                ),
            ],
        );
    }

    #[test]
    fn checks_list_items() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Pets($tags: [String!] = ["old", null], $ids: [ID] = [1, "2", 3.5]) {
              pets { id }
            }
            "#,
            &[
                RuleError::new(
                    &error_message("tags", &error::non_null("String!")),
                    &[SourcePosition::new(43, 1, 42)],
                ),
                RuleError::new(
                    &error_message("ids", &error::type_value("3.5", "ID")),
                    &[SourcePosition::new(71, 1, 70)],
                ),
            ],
        );
    }
}
