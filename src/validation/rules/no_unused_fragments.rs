use fnv::FnvHashSet;

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

use super::operation_scopes::{Scope, ScopeTracker};

pub struct NoUnusedFragments<'a> {
    scopes: ScopeTracker<'a>,
    operation_count: usize,
    defined_fragments: Vec<(&'a str, SourcePosition)>,
}

pub fn factory<'a>() -> NoUnusedFragments<'a> {
    NoUnusedFragments {
        scopes: ScopeTracker::default(),
        operation_count: 0,
        defined_fragments: Vec::new(),
    }
}

impl<'a> Visitor<'a> for NoUnusedFragments<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        let reachable = (0..self.operation_count)
            .flat_map(|op| self.scopes.reachable_from(op))
            .filter_map(|scope| match scope {
                Scope::Fragment(name) => Some(name),
                Scope::Operation(_) => None,
            })
            .collect::<FnvHashSet<_>>();

        for &(name, start) in &self.defined_fragments {
            if !reachable.contains(name) {
                ctx.report_error(&error_message(name), &[start]);
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation<'a>>,
    ) {
        self.operation_count = self.scopes.enter_operation() + 1;
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment<'a>>,
    ) {
        self.scopes.enter_fragment(f.item.name.item);
        self.defined_fragments.push((f.item.name.item, f.span.start));
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.scopes.record_spread(spread.item.name.item, spread.span.start);
    }
}

fn error_message(frag_name: &str) -> String {
    format!(r#"Fragment "{frag_name}" is never used"#)
}
