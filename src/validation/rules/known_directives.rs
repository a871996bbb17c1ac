use fnv::FnvHashMap;

use crate::{
    ast::{
        Definition, Directive, Document, EnumValueDefinition, Field, FieldDefinition, Fragment,
        FragmentSpread, InlineFragment, InputValueDefinition, Operation, OperationType,
        SchemaDefinition, TypeDefinition, TypeDefinitionKind, VariableDefinition,
    },
    parser::Spanning,
    schema::model::DirectiveLocation,
    validation::{ValidatorContext, Visitor},
};

/// Checks that every used directive exists and is allowed where it's used.
///
/// Directives defined by the document itself are known as well, so type
/// system documents can use their own directives.
pub struct KnownDirectives<'a> {
    defined_directives: FnvHashMap<&'a str, Vec<DirectiveLocation>>,
    location_stack: Vec<DirectiveLocation>,
}

pub fn factory<'a>() -> KnownDirectives<'a> {
    KnownDirectives {
        defined_directives: FnvHashMap::default(),
        location_stack: Vec::new(),
    }
}

impl KnownDirectives<'_> {
    fn enter(&mut self, location: DirectiveLocation) {
        self.location_stack.push(location);
    }

    fn exit(&mut self) {
        self.location_stack.pop();
    }
}

impl<'a> Visitor<'a> for KnownDirectives<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        for def in doc {
            if let Definition::Directive(d) = def {
                self.defined_directives.insert(
                    d.item.name.item,
                    d.item.locations.iter().map(|l| l.item).collect(),
                );
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.enter(match op.item.operation_type {
            OperationType::Query => DirectiveLocation::Query,
            OperationType::Mutation => DirectiveLocation::Mutation,
            OperationType::Subscription => DirectiveLocation::Subscription,
        });
    }
    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation<'a>>,
    ) {
        self.exit();
    }

    fn enter_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Field<'a>>) {
        self.enter(DirectiveLocation::Field);
    }
    fn exit_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Field<'a>>) {
        self.exit();
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Fragment<'a>>,
    ) {
        self.enter(DirectiveLocation::FragmentDefinition);
    }
    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Fragment<'a>>,
    ) {
        self.exit();
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.enter(DirectiveLocation::FragmentSpread);
    }
    fn exit_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.exit();
    }

    fn enter_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<InlineFragment<'a>>,
    ) {
        self.enter(DirectiveLocation::InlineFragment);
    }
    fn exit_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<InlineFragment<'a>>,
    ) {
        self.exit();
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        self.enter(DirectiveLocation::VariableDefinition);
    }
    fn exit_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        self.exit();
    }

    fn enter_schema_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<SchemaDefinition<'a>>,
    ) {
        self.enter(DirectiveLocation::Schema);
    }
    fn exit_schema_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<SchemaDefinition<'a>>,
    ) {
        self.exit();
    }

    fn enter_type_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        self.enter(match def.item.kind {
            TypeDefinitionKind::Scalar => DirectiveLocation::Scalar,
            TypeDefinitionKind::Object { .. } => DirectiveLocation::Object,
            TypeDefinitionKind::Interface { .. } => DirectiveLocation::Interface,
            TypeDefinitionKind::Union { .. } => DirectiveLocation::Union,
            TypeDefinitionKind::Enum { .. } => DirectiveLocation::Enum,
            TypeDefinitionKind::InputObject { .. } => DirectiveLocation::InputObject,
        });
    }
    fn exit_type_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<TypeDefinition<'a>>,
    ) {
        self.exit();
    }

    fn enter_field_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<FieldDefinition<'a>>,
    ) {
        self.enter(DirectiveLocation::FieldDefinition);
    }
    fn exit_field_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<FieldDefinition<'a>>,
    ) {
        self.exit();
    }

    fn enter_input_value_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<InputValueDefinition<'a>>,
    ) {
        // Input object fields are the only input values defined directly
        // inside a type definition.
        let location = if self.location_stack.last() == Some(&DirectiveLocation::InputObject) {
            DirectiveLocation::InputFieldDefinition
        } else {
            DirectiveLocation::ArgumentDefinition
        };
        self.enter(location);
    }
    fn exit_input_value_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<InputValueDefinition<'a>>,
    ) {
        self.exit();
    }

    fn enter_enum_value_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<EnumValueDefinition<'a>>,
    ) {
        self.enter(DirectiveLocation::EnumValue);
    }
    fn exit_enum_value_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<EnumValueDefinition<'a>>,
    ) {
        self.exit();
    }

    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Spanning<Directive<'a>>,
    ) {
        let directive_name = directive.item.name.item;
        let schema = ctx.schema;

        let locations = match self.defined_directives.get(directive_name) {
            Some(locations) => locations.as_slice(),
            None => match schema.directive_by_name(directive_name) {
                Some(d) => d.locations.as_slice(),
                None => {
                    ctx.report_error(
                        &unknown_error_message(directive_name),
                        &[directive.span.start],
                    );
                    return;
                }
            },
        };

        if let Some(current_location) = self.location_stack.last() {
            if !locations.contains(current_location) {
                ctx.report_error(
                    &misplaced_error_message(directive_name, current_location),
                    &[directive.span.start],
                );
            }
        }
    }
}

fn unknown_error_message(directive_name: &str) -> String {
    format!(r#"Unknown directive "{directive_name}""#)
}

fn misplaced_error_message(directive_name: &str, location: &DirectiveLocation) -> String {
    format!(r#"Directive "{directive_name}" may not be used on {location}"#)
}

#[cfg(test)]
mod tests {
    use super::{factory, misplaced_error_message, unknown_error_message};

    use crate::{
        parser::SourcePosition,
        schema::model::DirectiveLocation,
        validation::{
            RuleError, expect_fails_rule, expect_fails_sdl_rule, expect_passes_rule,
            expect_passes_sdl_rule,
        },
    };

    #[test]
    fn with_known_directives() {
        expect_passes_rule(
            factory,
            r#"
          {
            dog @include(if: true) {
              name
            }
            human @skip(if: false) {
              name
            }
          }
        "#,
        );
    }

    #[test]
    fn with_many_unknown_directives() {
        expect_fails_rule(
            factory,
            r#"
          {
            dog @unknown(directive: "value") {
              name
            }
            human @unknown(directive: "value") {
              name
              pets @unknown(directive: "value") {
                name
              }
            }
          }
        "#,
            &[
                RuleError::new(
                    &unknown_error_message("unknown"),
                    &[SourcePosition::new(29, 2, 16)],
                ),
                RuleError::new(
                    &unknown_error_message("unknown"),
                    &[SourcePosition::new(111, 5, 18)],
                ),
                RuleError::new(
                    &unknown_error_message("unknown"),
                    &[SourcePosition::new(180, 7, 19)],
                ),
            ],
        );
    }

    #[test]
    fn with_unknown_directive_on_var_definition() {
        expect_fails_rule(
            factory,
            r#"query Foo(
                $var1: Int = 1 @skip(if: true) @unknown,
                $var2: String @deprecated
            ) {
                name
            }"#,
            &[
                RuleError::new(
                    &misplaced_error_message("skip", &DirectiveLocation::VariableDefinition),
                    &[SourcePosition::new(42, 1, 31)],
                ),
                RuleError::new(
                    &unknown_error_message("unknown"),
                    &[SourcePosition::new(58, 1, 47)],
                ),
                RuleError::new(
                    &misplaced_error_message("deprecated", &DirectiveLocation::VariableDefinition),
                    &[SourcePosition::new(98, 2, 30)],
                ),
            ],
        );
    }

    #[test]
    fn with_well_placed_directives() {
        expect_passes_rule(
            factory,
            r#"
          query Foo @onQuery {
            name @include(if: true)
            ...Frag @include(if: true)
            skippedField @skip(if: true)
            ...SkippedFrag @skip(if: true)
          }

          mutation Bar @onMutation {
            someField
          }
        "#,
        );
    }

    #[test]
    fn with_misplaced_directives() {
        expect_fails_rule(
            factory,
            r#"
          query Foo @include(if: true) {
            name @onQuery
            ...Frag @onQuery
          }

          mutation Bar @onQuery {
            someField
          }
        "#,
            &[
                RuleError::new(
                    &misplaced_error_message("include", &DirectiveLocation::Query),
                    &[SourcePosition::new(21, 1, 20)],
                ),
                RuleError::new(
                    &misplaced_error_message("onQuery", &DirectiveLocation::Field),
                    &[SourcePosition::new(59, 2, 17)],
                ),
                RuleError::new(
                    &misplaced_error_message("onQuery", &DirectiveLocation::FragmentSpread),
                    &[SourcePosition::new(88, 3, 20)],
                ),
                RuleError::new(
                    &misplaced_error_message("onQuery", &DirectiveLocation::Mutation),
                    &[SourcePosition::new(133, 6, 23)],
                ),
            ],
        );
    }

    #[test]
    fn sdl_with_well_placed_directives() {
        expect_passes_sdl_rule(
            factory,
            r#"
          directive @onObject on OBJECT | INPUT_FIELD_DEFINITION

          scalar Url @specifiedBy(url: "https://url.spec.whatwg.org")

          type Dog @onObject {
            name(style: String @deprecated): String @deprecated
          }

          input DogInput {
            name: String @onObject @deprecated
          }

          enum Mood {
            HAPPY @deprecated(reason: "Dogs are always happy.")
          }
        "#,
        );
    }

    #[test]
    fn sdl_with_misplaced_directives() {
        expect_fails_sdl_rule(
            factory,
            r#"
          directive @onObject on OBJECT

          schema @onObject {
            query: Dog
          }

          type Dog @deprecated {
            name(style: String @onObject): String @unknown
          }
        "#,
            &[
                RuleError::new(
                    &misplaced_error_message("onObject", &DirectiveLocation::Schema),
                    &[SourcePosition::new(59, 3, 17)],
                ),
                RuleError::new(
                    &misplaced_error_message("deprecated", &DirectiveLocation::Object),
                    &[SourcePosition::new(126, 7, 19)],
                ),
                RuleError::new(
                    &misplaced_error_message("onObject", &DirectiveLocation::ArgumentDefinition),
                    &[SourcePosition::new(171, 8, 31)],
                ),
                RuleError::new(
                    &unknown_error_message("unknown"),
                    &[SourcePosition::new(190, 8, 50)],
                ),
            ],
        );
    }
}
