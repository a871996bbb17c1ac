use std::mem;

use fnv::{FnvBuildHasher, FnvHashMap};
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::{
    ast::{Arguments, Definition, Document, Field, Fragment, Selection, Type},
    parser::{SourcePosition, Spanning},
    schema::meta::{Field as FieldType, MetaType},
    validation::{ValidatorContext, Visitor},
};

/// Two selections under one response name that cannot be merged. `left` and
/// `right` hold the positions of both sides, nested conflicts included.
#[derive(Debug)]
struct Conflict {
    reason: Reason,
    left: Vec<SourcePosition>,
    right: Vec<SourcePosition>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Reason {
    response_name: String,
    kind: ReasonKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum ReasonKind {
    Differ(String),
    Subfields(Vec<Reason>),
}

impl Reason {
    fn describe(&self) -> String {
        match &self.kind {
            ReasonKind::Differ(msg) => msg.clone(),
            ReasonKind::Subfields(nested) => nested
                .iter()
                .map(|r| {
                    format!(
                        r#"subfields "{}" conflict because {}"#,
                        r.response_name,
                        r.describe(),
                    )
                })
                .join(" and "),
        }
    }
}

/// Field selection together with the type it is selected on and its schema
/// definition, when both are known.
#[derive(Clone, Copy)]
struct SelectedField<'a> {
    owner: Option<&'a MetaType>,
    node: &'a Spanning<Field<'a>>,
    def: Option<&'a FieldType>,
}

type FieldsByResponseName<'a> = IndexMap<&'a str, Vec<SelectedField<'a>>, FnvBuildHasher>;

/// Fields of a selection set (inline fragments flattened) and the names of
/// the fragments it spreads.
#[derive(Default)]
struct FieldSet<'a> {
    fields: FieldsByResponseName<'a>,
    spreads: Vec<&'a str>,
}

impl<'a> FieldSet<'a> {
    fn of(
        ctx: &ValidatorContext<'a>,
        owner: Option<&'a MetaType>,
        selections: &'a [Selection<'a>],
    ) -> Self {
        let mut set = Self::default();
        set.collect(ctx, owner, selections);
        set
    }

    fn collect(
        &mut self,
        ctx: &ValidatorContext<'a>,
        owner: Option<&'a MetaType>,
        selections: &'a [Selection<'a>],
    ) {
        for selection in selections {
            match selection {
                Selection::Field(node) => {
                    let name = node.item.name.item;
                    let response_name = node.item.alias.as_ref().map_or(name, |a| a.item);
                    self.fields.entry(response_name).or_default().push(SelectedField {
                        owner,
                        node,
                        def: owner.and_then(|t| ctx.schema.lookup_field(t, name)),
                    });
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.item.name.item;
                    if !self.spreads.contains(&name) {
                        self.spreads.push(name);
                    }
                }
                Selection::InlineFragment(inline) => {
                    let inner_owner = match &inline.item.type_condition {
                        Some(cond) => ctx.schema.concrete_type_by_name(cond.item).or(owner),
                        None => owner,
                    };
                    self.collect(ctx, inner_owner, &inline.item.selection_set);
                }
            }
        }
    }
}

/// Unordered pairs of fragments already compared, remembering whether the
/// comparison assumed mutually exclusive parents.
#[derive(Default)]
struct ComparedPairs<'a>(FnvHashMap<(&'a str, &'a str), bool>);

impl<'a> ComparedPairs<'a> {
    fn key(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// A pair compared as mutually exclusive must be compared again when the
    /// parents may overlap.
    fn seen(&self, a: &'a str, b: &'a str, exclusive: bool) -> bool {
        self.0
            .get(&Self::key(a, b))
            .is_some_and(|&was_exclusive| exclusive || !was_exclusive)
    }

    fn mark(&mut self, a: &'a str, b: &'a str, exclusive: bool) {
        self.0.insert(Self::key(a, b), exclusive);
    }
}

pub struct OverlappingFieldsCanBeMerged<'a> {
    fragments: FnvHashMap<&'a str, &'a Fragment<'a>>,
    compared: ComparedPairs<'a>,
}

pub fn factory<'a>() -> OverlappingFieldsCanBeMerged<'a> {
    OverlappingFieldsCanBeMerged {
        fragments: FnvHashMap::default(),
        compared: ComparedPairs::default(),
    }
}

/// Conflict search over one selection set, accumulating into `found`.
struct Checker<'r, 'a> {
    ctx: &'r ValidatorContext<'a>,
    fragments: &'r FnvHashMap<&'a str, &'a Fragment<'a>>,
    compared: &'r mut ComparedPairs<'a>,
    found: Vec<Conflict>,
}

impl<'a> Checker<'_, 'a> {
    fn fragment_set(&self, name: &str) -> Option<FieldSet<'a>> {
        let fragment = *self.fragments.get(name)?;
        let owner = self.ctx.schema.concrete_type_by_name(fragment.type_condition.item);
        Some(FieldSet::of(self.ctx, owner, &fragment.selection_set))
    }

    fn within(&mut self, owner: Option<&'a MetaType>, selections: &'a [Selection<'a>]) {
        let set = FieldSet::of(self.ctx, owner, selections);

        for (response_name, fields) in &set.fields {
            for (i, a) in fields.iter().enumerate() {
                for b in &fields[i + 1..] {
                    self.compare(response_name, a, b, false);
                }
            }
        }

        for (i, &a) in set.spreads.iter().enumerate() {
            self.fields_against_fragment(&set.fields, a, false, &mut Vec::new());
            for &b in &set.spreads[i + 1..] {
                self.fragment_against_fragment(a, b, false);
            }
        }
    }

    fn between(
        &mut self,
        left: &FieldsByResponseName<'a>,
        right: &FieldsByResponseName<'a>,
        exclusive: bool,
    ) {
        for (response_name, lefts) in left {
            let Some(rights) = right.get(response_name) else {
                continue;
            };
            for a in lefts {
                for b in rights {
                    self.compare(response_name, a, b, exclusive);
                }
            }
        }
    }

    /// `visited` holds the fragments already expanded against `fields`, so
    /// that cyclic spreads terminate.
    fn fields_against_fragment(
        &mut self,
        fields: &FieldsByResponseName<'a>,
        name: &'a str,
        exclusive: bool,
        visited: &mut Vec<&'a str>,
    ) {
        if visited.contains(&name) {
            return;
        }
        visited.push(name);

        let Some(other) = self.fragment_set(name) else {
            return;
        };
        self.between(fields, &other.fields, exclusive);
        for spread in other.spreads {
            self.fields_against_fragment(fields, spread, exclusive, visited);
        }
    }

    fn fragment_against_fragment(&mut self, a: &'a str, b: &'a str, exclusive: bool) {
        if a == b || self.compared.seen(a, b, exclusive) {
            return;
        }
        let (Some(left), Some(right)) = (self.fragment_set(a), self.fragment_set(b)) else {
            return;
        };
        self.compared.mark(a, b, exclusive);

        self.between(&left.fields, &right.fields, exclusive);
        for spread in right.spreads {
            self.fragment_against_fragment(a, spread, exclusive);
        }
        for spread in left.spreads {
            self.fragment_against_fragment(spread, b, exclusive);
        }
    }

    fn sub_selections(
        &mut self,
        exclusive: bool,
        (owner1, selections1): (Option<&'a MetaType>, &'a [Selection<'a>]),
        (owner2, selections2): (Option<&'a MetaType>, &'a [Selection<'a>]),
    ) -> Vec<Conflict> {
        let outer = mem::take(&mut self.found);

        let left = FieldSet::of(self.ctx, owner1, selections1);
        let right = FieldSet::of(self.ctx, owner2, selections2);

        self.between(&left.fields, &right.fields, exclusive);
        for &spread in &right.spreads {
            self.fields_against_fragment(&left.fields, spread, exclusive, &mut Vec::new());
        }
        for &spread in &left.spreads {
            self.fields_against_fragment(&right.fields, spread, exclusive, &mut Vec::new());
        }
        for &a in &left.spreads {
            for &b in &right.spreads {
                self.fragment_against_fragment(a, b, exclusive);
            }
        }

        mem::replace(&mut self.found, outer)
    }

    fn compare(
        &mut self,
        response_name: &str,
        a: &SelectedField<'a>,
        b: &SelectedField<'a>,
        parents_exclusive: bool,
    ) {
        // Fields selected on two different object types can never be
        // resolved on the same value.
        let exclusive = parents_exclusive
            || (a.owner.map(MetaType::name) != b.owner.map(MetaType::name)
                && is_object(a.owner)
                && is_object(b.owner));

        let (node1, node2) = (&a.node.item, &b.node.item);
        let (pos1, pos2) = (a.node.span.start, b.node.span.start);
        let differ = |msg: String| Conflict {
            reason: Reason {
                response_name: response_name.into(),
                kind: ReasonKind::Differ(msg),
            },
            left: vec![pos1],
            right: vec![pos2],
        };

        if !exclusive {
            let (name1, name2) = (node1.name.item, node2.name.item);
            if name1 != name2 {
                let c = differ(format!("{name1} and {name2} are different fields"));
                self.found.push(c);
                return;
            }
            if !same_arguments(node1.arguments.as_ref(), node2.arguments.as_ref()) {
                let c = differ("they have differing arguments".into());
                self.found.push(c);
                return;
            }
        }

        let t1 = a.def.map(|d| &d.field_type);
        let t2 = b.def.map(|d| &d.field_type);
        if let (Some(t1), Some(t2)) = (t1, t2) {
            if self.types_conflict(t1, t2) {
                let c = differ(format!("they return conflicting types {t1} and {t2}"));
                self.found.push(c);
                return;
            }
        }

        let (Some(s1), Some(s2)) = (&node1.selection_set, &node2.selection_set) else {
            return;
        };
        let schema = self.ctx.schema;
        let inner = |t: Option<&Type<'_>>| {
            t.and_then(|t| schema.concrete_type_by_name(t.innermost_name()))
        };
        let nested = self.sub_selections(exclusive, (inner(t1), s1), (inner(t2), s2));
        if nested.is_empty() {
            return;
        }

        self.found.push(Conflict {
            reason: Reason {
                response_name: response_name.into(),
                kind: ReasonKind::Subfields(nested.iter().map(|c| c.reason.clone()).collect()),
            },
            left: std::iter::once(pos1)
                .chain(nested.iter().flat_map(|c| c.left.iter().copied()))
                .collect(),
            right: std::iter::once(pos2)
                .chain(nested.iter().flat_map(|c| c.right.iter().copied()))
                .collect(),
        });
    }

    /// Two types conflict unless they have the same shape of list and
    /// non-null wrappers and, when leaves, the same name.
    fn types_conflict(&self, t1: &Type<'_>, t2: &Type<'_>) -> bool {
        match (t1, t2) {
            (Type::List(i1), Type::List(i2)) | (Type::NonNullList(i1), Type::NonNullList(i2)) => {
                self.types_conflict(i1, i2)
            }
            (Type::Named(n1), Type::Named(n2))
            | (Type::NonNullNamed(n1), Type::NonNullNamed(n2)) => {
                let is_leaf = |n: &str| {
                    self.ctx
                        .schema
                        .concrete_type_by_name(n)
                        .is_some_and(MetaType::is_leaf)
                };
                n1 != n2 && (is_leaf(n1.as_ref()) || is_leaf(n2.as_ref()))
            }
            _ => true,
        }
    }
}

fn same_arguments(
    args1: Option<&Spanning<Arguments<'_>>>,
    args2: Option<&Spanning<Arguments<'_>>>,
) -> bool {
    match (args1, args2) {
        (None, None) => true,
        (Some(a1), Some(a2)) => {
            a1.item.len() == a2.item.len()
                && a1.item.iter().all(|(name, v1)| {
                    a2.item
                        .get(name.item)
                        .is_some_and(|v2| v1.item.unlocated_eq(&v2.item))
                })
        }
        _ => false,
    }
}

fn is_object(t: Option<&MetaType>) -> bool {
    matches!(t, Some(MetaType::Object(_)))
}

impl<'a> Visitor<'a> for OverlappingFieldsCanBeMerged<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, defs: &'a Document<'a>) {
        for def in defs {
            if let Definition::Fragment(f) = def {
                self.fragments.entry(f.item.name.item).or_insert(&f.item);
            }
        }
    }

    fn enter_selection_set(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        selection_set: &'a [Selection<'a>],
    ) {
        let owner = ctx.parent_type();
        let mut checker = Checker {
            ctx,
            fragments: &self.fragments,
            compared: &mut self.compared,
            found: Vec::new(),
        };
        checker.within(owner, selection_set);
        let found = checker.found;

        for Conflict { reason, left, right } in found {
            let locations = [left, right].concat();
            ctx.report_error(&error_message(&reason), &locations);
        }
    }
}

fn error_message(reason: &Reason) -> String {
    format!(
        r#"Fields "{}" conflict because {}. Use different aliases on the fields to fetch both if this was intentional"#,
        reason.response_name,
        reason.describe(),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        parser::SourcePosition,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{Reason, ReasonKind, error_message, factory};

    fn conflict(response_name: &str, because: &str) -> String {
        format!(
            "Fields \"{response_name}\" conflict because {because}. Use different aliases on the \
             fields to fetch both if this was intentional",
        )
    }

    #[test]
    fn merges_repeated_fields() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                id
                name(surname: true)
                id
                name(surname: true)
              }
            }
            "#,
        );
    }

    #[test]
    fn compares_arguments_regardless_of_order() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets(first: 2, filter: {name: "Rex", limit: 1}) { id }
              pets(filter: {limit: 1, name: "Rex"}, first: 2) { name }
            }
            "#,
        );
    }

    #[test]
    fn distinct_aliases_may_differ() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                plain: name
                formal: name(surname: true)
                name
              }
            }
            "#,
        );
    }

    #[test]
    fn rejects_alias_shared_by_different_fields() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                label: name
                label: id
              }
            }
            "#,
            &[RuleError::new(
                &conflict("label", "name and id are different fields"),
                &[SourcePosition::new(52, 3, 16), SourcePosition::new(80, 4, 16)],
            )],
        );
    }

    #[test]
    fn rejects_differing_arguments() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                name(surname: true)
                name
              }
            }
            "#,
            &[RuleError::new(
                &conflict("name", "they have differing arguments"),
                &[SourcePosition::new(52, 3, 16), SourcePosition::new(88, 4, 16)],
            )],
        );
    }

    #[test]
    fn exclusive_parents_may_select_different_fields() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog {
                ... on Dog { sound: barks }
                ... on Cat { sound: meows }
              }
              node {
                ... on Dog { name(surname: true) }
                ... on Cat { name }
              }
            }
            "#,
        );
    }

    #[test]
    fn exclusive_parents_still_need_same_leaf_types() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog {
                ... on Dog { extra: born }
                ... on Cat { extra: meows }
              }
            }
            "#,
            &[RuleError::new(
                &conflict("extra", "they return conflicting types Date and Boolean"),
                &[SourcePosition::new(69, 3, 29), SourcePosition::new(112, 4, 29)],
            )],
        );
    }

    #[test]
    fn exclusive_parents_still_need_same_nullability() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog {
                ... on Dog { key: id }
                ... on Cat { key: name }
              }
            }
            "#,
            &[RuleError::new(
                &conflict("key", "they return conflicting types ID! and String"),
                &[SourcePosition::new(69, 3, 29), SourcePosition::new(108, 4, 29)],
            )],
        );
    }

    #[test]
    fn exclusive_parents_still_need_same_list_shape() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              node {
                ... on Dog { company: owner { id } }
                ... on Human { company: pets { id } }
              }
            }
            "#,
            &[RuleError::new(
                &conflict("company", "they return conflicting types Human and [Pet!]!"),
                &[SourcePosition::new(65, 3, 29), SourcePosition::new(120, 4, 31)],
            )],
        );
    }

    #[test]
    fn reports_subfield_conflict_on_the_parent() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                key: id
              }
              pets {
                key: name
              }
            }
            "#,
            &[RuleError::new(
                &conflict(
                    "pets",
                    "subfields \"key\" conflict because id and name are different fields",
                ),
                &[
                    SourcePosition::new(29, 2, 14),
                    SourcePosition::new(52, 3, 16),
                    SourcePosition::new(90, 5, 14),
                    SourcePosition::new(113, 6, 16),
                ],
            )],
        );
    }

    #[test]
    fn reports_every_nested_reason() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog {
                ... on Dog { owner { x: id y: name } }
              }
              catOrDog {
                ... on Dog { owner { x: name y: id } }
              }
            }
            "#,
            &[RuleError::new(
                &conflict(
                    "catOrDog",
                    "subfields \"owner\" conflict because subfields \"x\" conflict because \
                     id and name are different fields and subfields \"y\" conflict because \
                     name and id are different fields",
                ),
                &[
                    SourcePosition::new(29, 2, 14),
                    SourcePosition::new(69, 3, 29),
                    SourcePosition::new(77, 3, 37),
                    SourcePosition::new(83, 3, 43),
                    SourcePosition::new(125, 5, 14),
                    SourcePosition::new(165, 6, 29),
                    SourcePosition::new(173, 6, 37),
                    SourcePosition::new(181, 6, 45),
                ],
            )],
        );
    }

    #[test]
    fn compares_fields_with_spread_fragments() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets {
                ...petName
                name: id
              }
            }

            fragment petName on Pet { name }
            "#,
            &[RuleError::new(
                &conflict("name", "id and name are different fields"),
                &[SourcePosition::new(79, 4, 16), SourcePosition::new(157, 8, 38)],
            )],
        );
    }

    #[test]
    fn compares_spread_fragments_with_each_other() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog {
                ...dogLabel
                ...catLabel
              }
            }

            fragment dogLabel on Dog { label: barks }
            fragment catLabel on Cat { label: id }
            "#,
            &[RuleError::new(
                &conflict("label", "they return conflicting types Boolean and ID!"),
                &[SourcePosition::new(166, 8, 39), SourcePosition::new(220, 9, 39)],
            )],
        );
    }

    #[test]
    fn compares_a_fragment_pair_once() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets { ...first ...second }
              node { ...first ...second }
            }

            fragment first on Pet { key: id }
            fragment second on Pet { key: name }
            "#,
            &[RuleError::new(
                &conflict("key", "id and name are different fields"),
                &[SourcePosition::new(150, 6, 36), SourcePosition::new(197, 7, 37)],
            )],
        );
    }

    #[test]
    fn terminates_on_cyclic_and_unknown_fragments() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets { ...named ...missing }
            }

            fragment named on Pet { name ...identified }
            fragment identified on Pet { id ...named }
            "#,
        );
    }

    #[test]
    fn ignores_types_unknown_to_the_schema() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog {
                ... on Lizard { scales: name }
                ... on Dog { scales: name }
              }
            }
            "#,
        );
    }

    #[test]
    fn joins_nested_reasons() {
        let reason = Reason {
            response_name: "owner".into(),
            kind: ReasonKind::Subfields(vec![
                Reason {
                    response_name: "pets".into(),
                    kind: ReasonKind::Subfields(vec![Reason {
                        response_name: "id".into(),
                        kind: ReasonKind::Differ("they have differing arguments".into()),
                    }]),
                },
                Reason {
                    response_name: "name".into(),
                    kind: ReasonKind::Differ("name and id are different fields".into()),
                },
            ]),
        };

        assert_eq!(
            error_message(&reason),
            "Fields \"owner\" conflict because subfields \"pets\" conflict because subfields \
             \"id\" conflict because they have differing arguments and subfields \"name\" \
             conflict because name and id are different fields. Use different aliases on the \
             fields to fetch both if this was intentional",
        );
    }
}
