use fnv::FnvHashMap;

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation, Type, VariableDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::operation_scopes::{Scope, ScopeTracker};

type VariableDefinitions<'a> = Vec<&'a (Spanning<&'a str>, VariableDefinition<'a>)>;

/// Checks that every variable usage expects a supertype of the variable's
/// declared type.
///
/// A variable with a non-null default value is considered non-null.
pub struct VariableInAllowedPosition<'a> {
    scopes: ScopeTracker<'a>,
    variable_defs: Vec<VariableDefinitions<'a>>,
    variable_usages: FnvHashMap<Scope<'a>, Vec<(Spanning<&'a str>, Type<'a>)>>,
}

pub fn factory<'a>() -> VariableInAllowedPosition<'a> {
    VariableInAllowedPosition {
        scopes: ScopeTracker::default(),
        variable_defs: Vec::new(),
        variable_usages: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for VariableInAllowedPosition<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        let schema = ctx.schema;

        for (index, var_defs) in self.variable_defs.iter().enumerate() {
            for scope in self.scopes.reachable_from(index) {
                for (var_name, expected_type) in self.variable_usages.get(&scope).into_iter().flatten()
                {
                    let Some((def_name, var_def)) =
                        var_defs.iter().find(|(n, _)| n.item == var_name.item).copied()
                    else {
                        continue;
                    };

                    let var_type = match &var_def.default_value {
                        Some(default) if !default.item.is_null() => {
                            var_def.var_type.item.clone().wrap_non_null()
                        }
                        _ => var_def.var_type.item.clone(),
                    };

                    if !schema.is_subtype(&var_type, expected_type) {
                        ctx.report_error(
                            &error_message(var_name.item, &var_def.var_type.item, expected_type),
                            &[def_name.span.start, var_name.span.start],
                        );
                    }
                }
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation<'a>>,
    ) {
        self.scopes.enter_operation();
        self.variable_defs.push(Vec::new());
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment<'a>>,
    ) {
        self.scopes.enter_fragment(f.item.name.item);
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.scopes.record_spread(spread.item.name.item, spread.span.start);
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        if let Some(defs) = self.variable_defs.last_mut() {
            defs.push(def);
        }
    }

    fn enter_variable_value(&mut self, ctx: &mut ValidatorContext<'a>, var: Spanning<&'a String>) {
        if let (Some(scope), Some(input_type)) =
            (self.scopes.current(), ctx.current_input_type_literal())
        {
            self.variable_usages
                .entry(scope)
                .or_default()
                .push((var.map(String::as_str), input_type.clone()));
        }
    }
}

fn error_message(var_name: &str, type_name: &Type<'_>, expected_type_name: &Type<'_>) -> String {
    format!(
        r#"Variable "${var_name}" of type "{type_name}" used in position expecting type "{expected_type_name}""#,
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::Type,
        parser::SourcePosition,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{error_message, factory};

    #[test]
    fn accepts_matching_and_stricter_types() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Q($id: ID!, $first: Int!, $name: String, $tags: [String!]!, $order: Order) {
              node(id: $id) { id }
              pets(first: $first, filter: {name: $name, tags: $tags, order: $order}) { name }
            }
            "#,
        );
    }

    #[test]
    fn non_null_default_makes_variable_non_null() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Q($id: ID = "1", $flag: Boolean = true) {
              node(id: $id) { id }
              pets { name @include(if: $flag) }
            }
            "#,
        );
    }

    #[test]
    fn ignores_undefined_variables_and_unknown_positions() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Q($flag: String) { node(id: $missing) { id } pets(bogus: $flag) { id } }
            "#,
        );
    }

    #[test]
    fn reports_nullability_and_shape_mismatches() {
        let (id, int, string) = (Type::named("ID"), Type::named("Int"), Type::named("String"));

        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Q($id: ID, $first: [Int], $surname: String, $tag: String) {
              node(id: $id) { id }
              pets(first: $first, filter: {tags: [$tag]}) { name(surname: $surname) }
            }
            "#,
            &[
                RuleError::new(
                    &error_message("id", &id, &id.clone().wrap_non_null()),
                    &[SourcePosition::new(21, 1, 20), SourcePosition::new(102, 2, 23)],
                ),
                RuleError::new(
                    &error_message("first", &int.clone().wrap_list(), &int),
                    &[SourcePosition::new(30, 1, 29), SourcePosition::new(140, 3, 26)],
                ),
                RuleError::new(
                    &error_message("surname", &string, &Type::named("Boolean")),
                    &[SourcePosition::new(45, 1, 44), SourcePosition::new(188, 3, 74)],
                ),
                RuleError::new(
                    &error_message("tag", &string, &string.clone().wrap_non_null()),
                    &[SourcePosition::new(63, 1, 62), SourcePosition::new(164, 3, 50)],
                ),
            ],
        );
    }

    #[test]
    fn checks_fragment_usages_against_each_operation() {
        let id = Type::named("ID");

        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query A($id: ID!) { ...byId }
            query B($id: ID) { ...byId }
            fragment byId on Query { node(id: $id) { id } }
            "#,
            &[RuleError::new(
                &error_message("id", &id, &id.clone().wrap_non_null()),
                &[SourcePosition::new(63, 2, 20), SourcePosition::new(130, 3, 46)],
            )],
        );
    }
}
