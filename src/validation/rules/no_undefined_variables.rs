use fnv::{FnvHashMap, FnvHashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

use super::operation_scopes::{Scope, ScopeTracker};

struct DefinedVariables<'a> {
    operation_name: Option<&'a str>,
    start: SourcePosition,
    names: FnvHashSet<&'a str>,
}

pub struct NoUndefinedVariables<'a> {
    scopes: ScopeTracker<'a>,
    operations: Vec<DefinedVariables<'a>>,
    used_variables: FnvHashMap<Scope<'a>, Vec<Spanning<&'a str>>>,
}

pub fn factory<'a>() -> NoUndefinedVariables<'a> {
    NoUndefinedVariables {
        scopes: ScopeTracker::default(),
        operations: Vec::new(),
        used_variables: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for NoUndefinedVariables<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        for (index, op) in self.operations.iter().enumerate() {
            for scope in self.scopes.reachable_from(index) {
                for var in self.used_variables.get(&scope).into_iter().flatten() {
                    if !op.names.contains(var.item) {
                        ctx.report_error(
                            &error_message(var.item, op.operation_name),
                            &[var.span.start, op.start],
                        );
                    }
                }
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.scopes.enter_operation();
        self.operations.push(DefinedVariables {
            operation_name: op.item.name.as_ref().map(|s| s.item),
            start: op.span.start,
            names: FnvHashSet::default(),
        });
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
        (var_name, _): &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        if let Some(op) = self.operations.last_mut() {
            op.names.insert(var_name.item);
        }
    }

    fn enter_variable_value(&mut self, _: &mut ValidatorContext<'a>, var: Spanning<&'a String>) {
        if let Some(scope) = self.scopes.current() {
            self.used_variables
                .entry(scope)
                .or_default()
                .push(var.map(String::as_str));
        }
    }
}

fn error_message(var_name: &str, op_name: Option<&str>) -> String {
    if let Some(op_name) = op_name {
        format!(r#"Variable "${var_name}" is not defined by operation "{op_name}""#)
    } else {
        format!(r#"Variable "${var_name}" is not defined"#)
    }
}
