//! Validation rule rejecting operations that select `__schema` or `__type`.

use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Validation rule rejecting operations that select `__schema` or `__type`.
///
/// `__typename` stays allowed.
pub struct DisableIntrospection;

/// Produces a new [`DisableIntrospection`] validation rule.
#[inline]
#[must_use]
pub fn factory() -> DisableIntrospection {
    DisableIntrospection
}

impl<'a> Visitor<'a> for DisableIntrospection {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        let field_name = field.item.name.item;
        if matches!(field_name, "__schema" | "__type") {
            ctx.report_error(&error_message(field_name), &[field.item.name.span.start]);
        }
    }
}

fn error_message(field_name: &str) -> String {
    format!("GraphQL introspection is not allowed, but the operation contained `{field_name}`")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourcePosition,
        validation::{RuleError, expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn allows_typename_field() {
        expect_passes_rule(
            factory,
            r#"
            query {
                __typename
                dog {
                    __typename
                    ... on Dog {
                        __typename
                    }
                }
                catOrDog { __typename }
            }
            "#,
        );
    }

    #[test]
    fn forbids_query_schema() {
        expect_fails_rule(
            factory,
            r#"
            query {
                __schema {
                    queryType {
                        name
                    }
                }
            }
            "#,
            &[RuleError::new(
                &error_message("__schema"),
                &[SourcePosition::new(37, 2, 16)],
            )],
        );
    }

    #[test]
    fn forbids_query_type() {
        expect_fails_rule(
            factory,
            r#"
            query {
                __type(name: "Dog") {
                    name
                }
            }
            "#,
            &[RuleError::new(
                &error_message("__type"),
                &[SourcePosition::new(37, 2, 16)],
            )],
        );
    }

    #[test]
    fn reports_every_introspection_field() {
        expect_fails_rule(
            factory,
            r#"
            query {
                dog {
                    name
                    ... on Dog {
                        __typename
                    }
                }
                __type(name: "Cat") { name }
                catOrDog { __typename }
                __schema { description }
            }
            "#,
            &[
                RuleError::new(&error_message("__type"), &[SourcePosition::new(192, 8, 16)]),
                RuleError::new(&error_message("__schema"), &[SourcePosition::new(277, 10, 16)]),
            ],
        );
    }
}
