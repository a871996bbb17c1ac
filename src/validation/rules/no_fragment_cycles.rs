use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools as _;

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

use super::operation_scopes::{Scope, ScopeTracker};

pub struct NoFragmentCycles<'a> {
    scopes: ScopeTracker<'a>,
    fragments: Vec<&'a str>,
}

pub fn factory<'a>() -> NoFragmentCycles<'a> {
    NoFragmentCycles {
        scopes: ScopeTracker::default(),
        fragments: Vec::new(),
    }
}

/// Depth-first search along fragment spreads. A spread reaching a fragment
/// still on the current path closes a cycle.
struct CycleSearch<'s, 'a> {
    scopes: &'s ScopeTracker<'a>,
    explored: FnvHashSet<&'a str>,
    path: Vec<(&'a str, SourcePosition)>,
    path_index: FnvHashMap<&'a str, usize>,
    cycles: Vec<(&'a str, Vec<(&'a str, SourcePosition)>)>,
}

impl<'a> CycleSearch<'_, 'a> {
    fn explore(&mut self, fragment: &'a str) {
        self.explored.insert(fragment);
        self.path_index.insert(fragment, self.path.len());

        let scopes = self.scopes;
        for &(target, at) in scopes.spreads_in(Scope::Fragment(fragment)) {
            if let Some(&start) = self.path_index.get(target) {
                let mut spreads = self.path[start..].to_vec();
                spreads.push((target, at));
                self.cycles.push((target, spreads));
            } else if !self.explored.contains(target) {
                self.path.push((target, at));
                self.explore(target);
                self.path.pop();
            }
        }

        self.path_index.remove(fragment);
    }
}

impl<'a> Visitor<'a> for NoFragmentCycles<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        let mut search = CycleSearch {
            scopes: &self.scopes,
            explored: FnvHashSet::default(),
            path: Vec::new(),
            path_index: FnvHashMap::default(),
            cycles: Vec::new(),
        };
        for &fragment in &self.fragments {
            if !search.explored.contains(fragment) {
                search.explore(fragment);
            }
        }

        for (fragment, spreads) in search.cycles {
            // The last spread leads back to `fragment` itself.
            let through = &spreads[..spreads.len() - 1];
            let locations = spreads.iter().map(|&(_, at)| at).collect::<Vec<_>>();
            ctx.report_error(&error_message(fragment, through), &locations);
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation<'a>>,
    ) {
        self.scopes.enter_operation();
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment<'a>>,
    ) {
        let name = f.item.name.item;
        self.scopes.enter_fragment(name);
        self.fragments.push(name);
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.scopes.record_spread(spread.item.name.item, spread.span.start);
    }
}

fn error_message(fragment: &str, through: &[(&str, SourcePosition)]) -> String {
    if through.is_empty() {
        format!("Fragment \"{fragment}\" spreads itself")
    } else {
        let through = through.iter().map(|(name, _)| format!("\"{name}\"")).join(", ");
        format!("Fragment \"{fragment}\" spreads itself through {through}")
    }
}
