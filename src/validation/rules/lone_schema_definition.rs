use crate::{
    ast::SchemaDefinition,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Checks that a type system document defines at most one schema.
///
/// Schema extensions are not definitions and may repeat.
pub struct LoneSchemaDefinition {
    seen: bool,
}

pub fn factory() -> LoneSchemaDefinition {
    LoneSchemaDefinition { seen: false }
}

impl<'a> Visitor<'a> for LoneSchemaDefinition {
    fn enter_schema_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<SchemaDefinition<'a>>,
    ) {
        if def.item.extension {
            return;
        }
        if self.seen {
            ctx.report_error(error_message(), &[def.span.start]);
        }
        self.seen = true;
    }
}

fn error_message() -> &'static str {
    "Must provide only one schema definition"
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourcePosition,
        validation::{RuleError, expect_fails_sdl_rule, expect_passes_sdl_rule},
    };

    #[test]
    fn no_schema() {
        expect_passes_sdl_rule(
            factory,
            r#"
          type Query { foo: String }
        "#,
        );
    }

    #[test]
    fn one_schema_with_extensions() {
        expect_passes_sdl_rule(
            factory,
            r#"
          type Foo { foo: String }
          schema { query: Foo }
          extend schema { mutation: Foo }
          extend schema { subscription: Foo }
        "#,
        );
    }

    #[test]
    fn multiple_schemas() {
        expect_fails_sdl_rule(
            factory,
            r#"
          type Foo { foo: String }
          schema { query: Foo }
          schema { mutation: Foo }
          "Third"
          schema { subscription: Foo }
        "#,
            &[
                RuleError::new(error_message(), &[SourcePosition::new(78, 3, 10)]),
                RuleError::new(error_message(), &[SourcePosition::new(113, 4, 10)]),
            ],
        );
    }
}
