//! Grouping of repeated names, shared by the uniqueness rules.

use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::{
    parser::{SourcePosition, Spanning},
    validation::ValidatorContext,
};

/// Positions of every name seen in a scope, in first-seen order.
#[derive(Default)]
pub(crate) struct NameGroups<'a> {
    groups: IndexMap<&'a str, Vec<SourcePosition>, FnvBuildHasher>,
}

impl<'a> NameGroups<'a> {
    pub(crate) fn insert(&mut self, name: &'a str, at: SourcePosition) {
        self.groups.entry(name).or_default().push(at);
    }

    /// Reports one error per repeated name, located at all of its
    /// occurrences.
    pub(crate) fn report(&self, ctx: &mut ValidatorContext<'_>, message: impl Fn(&str) -> String) {
        for (name, positions) in &self.groups {
            if positions.len() > 1 {
                ctx.report_error(&message(name), positions);
            }
        }
    }
}

impl<'a> FromIterator<Spanning<&'a str>> for NameGroups<'a> {
    fn from_iter<I: IntoIterator<Item = Spanning<&'a str>>>(names: I) -> Self {
        let mut groups = Self::default();
        for name in names {
            groups.insert(name.item, name.span.start);
        }
        groups
    }
}
