use fnv::FnvHashSet;

use crate::{
    ast::{
        Definition, Document, FieldDefinition, Fragment, InlineFragment, InputValueDefinition,
        SchemaDefinition, TypeDefinition, TypeDefinitionKind, VariableDefinition,
    },
    parser::{SourcePosition, Spanning},
    schema::meta::is_builtin_scalar_name,
    validation::{ValidatorContext, Visitor},
};

/// Checks that every referenced type exists in the schema or is defined by
/// the document.
pub struct KnownTypeNames<'a> {
    defined_types: FnvHashSet<&'a str>,
    accept_builtin_scalars: bool,
}

pub fn factory<'a>() -> KnownTypeNames<'a> {
    KnownTypeNames {
        defined_types: FnvHashSet::default(),
        accept_builtin_scalars: false,
    }
}

/// Like [`factory()`], additionally accepting the built-in scalars, which a
/// type system document may use without defining them.
pub fn sdl_factory<'a>() -> KnownTypeNames<'a> {
    KnownTypeNames {
        accept_builtin_scalars: true,
        ..factory()
    }
}

impl<'a> KnownTypeNames<'a> {
    fn validate_type(&self, ctx: &mut ValidatorContext<'a>, type_name: &str, at: SourcePosition) {
        let known = self.defined_types.contains(type_name)
            || ctx.schema.concrete_type_by_name(type_name).is_some()
            || (self.accept_builtin_scalars && is_builtin_scalar_name(type_name));
        if !known {
            ctx.report_error(&error_message(type_name), &[at]);
        }
    }
}

impl<'a> Visitor<'a> for KnownTypeNames<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        self.defined_types = doc
            .iter()
            .filter_map(|def| match def {
                Definition::Type(t) if !t.item.extension => Some(t.item.name.item),
                _ => None,
            })
            .collect();
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<InlineFragment<'a>>,
    ) {
        if let Some(type_cond) = &fragment.item.type_condition {
            self.validate_type(ctx, type_cond.item, type_cond.span.start);
        }
    }

    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment<'a>>,
    ) {
        let type_cond = &fragment.item.type_condition;
        self.validate_type(ctx, type_cond.item, type_cond.span.start);
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (_, var_def): &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        let type_name = var_def.var_type.item.innermost_name();
        self.validate_type(ctx, type_name, var_def.var_type.span.start);
    }

    fn enter_schema_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<SchemaDefinition<'a>>,
    ) {
        for op in &def.item.operation_types {
            let named_type = &op.item.named_type;
            self.validate_type(ctx, named_type.item, named_type.span.start);
        }
    }

    fn enter_type_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        let referenced = match &def.item.kind {
            TypeDefinitionKind::Object { interfaces, .. }
            | TypeDefinitionKind::Interface { interfaces, .. } => interfaces,
            TypeDefinitionKind::Union { members } => members,
            TypeDefinitionKind::Scalar
            | TypeDefinitionKind::Enum { .. }
            | TypeDefinitionKind::InputObject { .. } => return,
        };
        for name in referenced {
            self.validate_type(ctx, name.item, name.span.start);
        }
    }

    fn enter_field_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<FieldDefinition<'a>>,
    ) {
        let field_type = &def.item.field_type;
        self.validate_type(ctx, field_type.item.innermost_name(), field_type.span.start);
    }

    fn enter_input_value_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<InputValueDefinition<'a>>,
    ) {
        let value_type = &def.item.value_type;
        self.validate_type(ctx, value_type.item.innermost_name(), value_type.span.start);
    }
}

fn error_message(type_name: &str) -> String {
    format!(r#"Unknown type "{type_name}""#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory, sdl_factory};

    use crate::{
        parser::SourcePosition,
        validation::{
            RuleError, expect_fails_rule, expect_fails_sdl_rule, expect_passes_rule,
            expect_passes_sdl_rule,
        },
    };

    #[test]
    fn known_type_names_are_valid() {
        expect_passes_rule(
            factory,
            r#"
          query Foo($var: String, $required: [String!]!) {
            human(id: 4) {
              pets { ... on Pet { name }, ...PetFields, ... { name } }
            }
          }
          fragment PetFields on Pet {
            name
          }
        "#,
        );
    }

    #[test]
    fn unknown_type_names_are_invalid() {
        expect_fails_rule(
            factory,
            r#"
          query Foo($var: JumbledUpLetters) {
            user(id: 4) {
              name
              pets { ... on Badger { name }, ...PetFields }
            }
          }
          fragment PetFields on Peettt {
            name
          }
        "#,
            &[
                RuleError::new(
                    &error_message("JumbledUpLetters"),
                    &[SourcePosition::new(27, 1, 26)],
                ),
                RuleError::new(&error_message("Badger"), &[SourcePosition::new(120, 4, 28)]),
                RuleError::new(&error_message("Peettt"), &[SourcePosition::new(210, 7, 32)]),
            ],
        );
    }

    #[test]
    fn sdl_references_defined_and_builtin_types() {
        expect_passes_sdl_rule(
            sdl_factory,
            r#"
          schema { query: Query }

          type Query implements Node {
            id: ID!
            node(id: ID!, first: Int = 10): [Node]
            search(filter: Filter): SearchResult
            ratio: Float
            schemaInfo: __Schema
          }

          interface Node { id: ID! }

          union SearchResult = Query

          input Filter { text: String, exact: Boolean }
        "#,
        );
    }

    #[test]
    fn sdl_unknown_references() {
        expect_fails_sdl_rule(
            sdl_factory,
            r#"
          schema { query: Root }

          type Query implements Node {
            pets(filter: PetFilter): [Pet!]
          }

          union Result = Query | Cat
        "#,
            &[
                RuleError::new(&error_message("Root"), &[SourcePosition::new(27, 1, 26)]),
                RuleError::new(&error_message("Node"), &[SourcePosition::new(67, 3, 32)]),
                RuleError::new(&error_message("PetFilter"), &[SourcePosition::new(99, 4, 25)]),
                RuleError::new(&error_message("Pet"), &[SourcePosition::new(111, 4, 37)]),
                RuleError::new(&error_message("Cat"), &[SourcePosition::new(164, 7, 33)]),
            ],
        );
    }
}
