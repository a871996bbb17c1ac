use fnv::{FnvHashMap, FnvHashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation, VariableDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::operation_scopes::{Scope, ScopeTracker};

pub struct NoUnusedVariables<'a> {
    scopes: ScopeTracker<'a>,
    /// Name and variable definitions of every operation, in document order.
    operations: Vec<(Option<&'a str>, Vec<&'a Spanning<&'a str>>)>,
    used_variables: FnvHashMap<Scope<'a>, Vec<&'a str>>,
}

pub fn factory<'a>() -> NoUnusedVariables<'a> {
    NoUnusedVariables {
        scopes: ScopeTracker::default(),
        operations: Vec::new(),
        used_variables: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for NoUnusedVariables<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        for (index, (op_name, defined)) in self.operations.iter().enumerate() {
            let used = self
                .scopes
                .reachable_from(index)
                .iter()
                .filter_map(|scope| self.used_variables.get(scope))
                .flatten()
                .copied()
                .collect::<FnvHashSet<_>>();

            for var in defined.iter().filter(|var| !used.contains(var.item)) {
                ctx.report_error(&error_message(var.item, *op_name), &[var.span.start]);
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.scopes.enter_operation();
        self.operations
            .push((op.item.name.as_ref().map(|s| s.item), Vec::new()));
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
        if let Some((_, defined)) = self.operations.last_mut() {
            defined.push(var_name);
        }
    }

    fn enter_variable_value(&mut self, _: &mut ValidatorContext<'a>, var: Spanning<&'a String>) {
        if let Some(scope) = self.scopes.current() {
            self.used_variables
                .entry(scope)
                .or_default()
                .push(var.item.as_str());
        }
    }
}

fn error_message(var_name: &str, op_name: Option<&str>) -> String {
    if let Some(op_name) = op_name {
        format!(r#"Variable "${var_name}" is not used by operation "{op_name}""#)
    } else {
        format!(r#"Variable "${var_name}" is not used"#)
    }
}
