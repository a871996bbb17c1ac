//! Bookkeeping shared by the rules relating operations to the fragments they
//! spread.

use fnv::{FnvHashMap, FnvHashSet};

use crate::parser::SourcePosition;

/// Operation or fragment definition a node belongs to.
///
/// Operations are numbered in document order, as anonymous ones have no name
/// to tell them apart.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Scope<'a> {
    Operation(usize),
    Fragment(&'a str),
}

#[derive(Default)]
pub(crate) struct ScopeTracker<'a> {
    current: Option<Scope<'a>>,
    operation_count: usize,
    spreads: FnvHashMap<Scope<'a>, Vec<(&'a str, SourcePosition)>>,
}

impl<'a> ScopeTracker<'a> {
    /// Enters the next operation, returning its index.
    pub(crate) fn enter_operation(&mut self) -> usize {
        let index = self.operation_count;
        self.operation_count += 1;
        self.current = Some(Scope::Operation(index));
        index
    }

    pub(crate) fn enter_fragment(&mut self, name: &'a str) {
        self.current = Some(Scope::Fragment(name));
    }

    pub(crate) fn current(&self) -> Option<Scope<'a>> {
        self.current
    }

    pub(crate) fn record_spread(&mut self, fragment_name: &'a str, at: SourcePosition) {
        if let Some(scope) = self.current {
            self.spreads.entry(scope).or_default().push((fragment_name, at));
        }
    }

    /// Fragments spread directly in `scope`, in document order.
    pub(crate) fn spreads_in(&self, scope: Scope<'a>) -> &[(&'a str, SourcePosition)] {
        self.spreads.get(&scope).map_or(&[], Vec::as_slice)
    }

    /// The scope of the operation `index` followed by the scopes of all the
    /// fragments it spreads, directly or not. Every scope appears once, even
    /// for cyclic spreads.
    pub(crate) fn reachable_from(&self, index: usize) -> Vec<Scope<'a>> {
        let start = Scope::Operation(index);
        let mut visited = FnvHashSet::from_iter([start]);
        let mut order = vec![start];
        let mut to_visit = vec![start];

        while let Some(scope) = to_visit.pop() {
            for &(name, _) in self.spreads_in(scope) {
                let next = Scope::Fragment(name);
                if visited.insert(next) {
                    order.push(next);
                    to_visit.push(next);
                }
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parser::SourcePosition;

    use super::{Scope, ScopeTracker};

    fn at(index: usize) -> SourcePosition {
        SourcePosition::new(index, 0, index)
    }

    #[test]
    fn follows_spreads_once() {
        let mut scopes = ScopeTracker::default();
        let op = scopes.enter_operation();
        scopes.record_spread("A", at(1));
        scopes.enter_fragment("A");
        scopes.record_spread("B", at(2));
        scopes.record_spread("A", at(3));
        scopes.enter_fragment("B");
        scopes.record_spread("A", at(4));
        scopes.enter_fragment("C");

        assert_eq!(
            scopes.reachable_from(op),
            [Scope::Operation(0), Scope::Fragment("A"), Scope::Fragment("B")],
        );
        assert_eq!(
            scopes.spreads_in(Scope::Fragment("A")),
            [("B", at(2)), ("A", at(3))],
        );
        assert!(scopes.spreads_in(Scope::Fragment("C")).is_empty());
    }
}
