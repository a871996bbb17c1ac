use fnv::FnvHashMap;

use crate::{
    ast::{Definition, Document, FragmentSpread, InlineFragment},
    parser::{SourcePosition, Spanning},
    schema::{meta::MetaType, model::SchemaType},
    validation::{ValidatorContext, Visitor},
};

/// Fragment applied within a selection set.
#[derive(Clone, Copy)]
enum Spread<'a> {
    Named(&'a str),
    Inline,
}

pub struct PossibleFragmentSpreads<'a> {
    conditions: FnvHashMap<&'a str, &'a MetaType>,
}

pub fn factory<'a>() -> PossibleFragmentSpreads<'a> {
    PossibleFragmentSpreads {
        conditions: FnvHashMap::default(),
    }
}

impl<'a> PossibleFragmentSpreads<'a> {
    /// Conditions naming unknown types are left to `KnownTypeNames`.
    fn check(
        ctx: &mut ValidatorContext<'a>,
        spread: Spread<'_>,
        condition: Option<&'a MetaType>,
        at: SourcePosition,
    ) {
        let (Some(parent), Some(condition)) = (ctx.parent_type(), condition) else {
            return;
        };
        if !can_apply(ctx.schema, parent, condition) {
            ctx.report_error(&error_message(spread, parent.name(), condition.name()), &[at]);
        }
    }
}

impl<'a> Visitor<'a> for PossibleFragmentSpreads<'a> {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        let schema = ctx.schema;
        let conditions = doc.iter().filter_map(|def| match def {
            Definition::Fragment(f) => Some((
                f.item.name.item,
                schema.concrete_type_by_name(f.item.type_condition.item)?,
            )),
            _ => None,
        });
        for (name, condition) in conditions {
            self.conditions.entry(name).or_insert(condition);
        }
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        inline: &'a Spanning<InlineFragment<'a>>,
    ) {
        let Some(name) = &inline.item.type_condition else {
            return;
        };
        let schema = ctx.schema;
        let condition = schema.concrete_type_by_name(name.item);
        Self::check(ctx, Spread::Inline, condition, inline.span.start);
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        let name = spread.item.name.item;
        let condition = self.conditions.get(name).copied();
        Self::check(ctx, Spread::Named(name), condition, spread.span.start);
    }
}

/// Whether some value of type `parent` may also be of type `condition`.
///
/// An interface condition also applies within any interface it implements,
/// even if no object type implements both yet.
fn can_apply(schema: &SchemaType, parent: &MetaType, condition: &MetaType) -> bool {
    let interface_within_interface = matches!(parent, MetaType::Interface(_))
        && matches!(condition, MetaType::Interface(_))
        && schema.implements_interface(condition, parent);

    interface_within_interface || schema.type_overlap(parent, condition)
}

fn error_message(spread: Spread<'_>, parent: &str, condition: &str) -> String {
    let fragment = match spread {
        Spread::Named(name) => format!("Fragment \"{name}\""),
        Spread::Inline => "Inline fragment".into(),
    };
    format!(
        "{fragment} cannot be spread here, as no value of type \"{parent}\" is ever of type \
         \"{condition}\"",
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, LazyLock};

    use crate::{
        ast::Type,
        parser::SourcePosition,
        schema::{
            meta::{Field, InterfaceMeta, ObjectMeta},
            model::{SchemaConfig, SchemaType},
        },
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{Spread, error_message, factory};

    /// `Resource` implements `Node`, but no object type implements either.
    static UNIMPLEMENTED: LazyLock<SchemaType> = LazyLock::new(|| {
        let id = || Field::new("id", Type::non_null_named("ID"));
        SchemaType::new(SchemaConfig {
            query: Some("Query".into()),
            types: vec![
                ObjectMeta::new(
                    "Query",
                    &[
                        Field::new("node", Type::named("Node")),
                        Field::new("resource", Type::named("Resource")),
                    ],
                )
                .into_meta(),
                InterfaceMeta::new("Node", &[id()]).into_meta(),
                InterfaceMeta::new("Resource", &[id()]).interfaces(&["Node"]).into_meta(),
            ]
            .into_iter()
            .map(Arc::new)
            .collect(),
            ..SchemaConfig::default()
        })
    });

    #[test]
    fn accepts_overlapping_types() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              pets { ...dogBits ... on Cat { meows } ...nodeBits ... on CatOrDog { __typename } }
              catOrDog { ...petBits ... on Dog { barks } }
              node(id: 1) { ...petBits ... on Human { name } ... { id } }
            }

            fragment dogBits on Dog { barks }
            fragment petBits on Pet { name }
            fragment nodeBits on Node { id }
            "#,
        );
    }

    #[test]
    fn ignores_unknown_fragments_and_types() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            { pets { ...missing ...lizardBits ... on Lizard { scales } } }

            fragment lizardBits on Lizard { scales }
            "#,
        );
    }

    #[test]
    fn rejects_disjoint_types() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            {
              catOrDog { ...humanBits ... on Human { name } }
              pets { ... on Human { id } ...humanBits }
              node(id: 1) { ... on Human { ...catBits } }
            }

            fragment humanBits on Human { name }
            fragment catBits on Cat { meows }
            "#,
            &[
                RuleError::new(
                    &error_message(Spread::Named("humanBits"), "CatOrDog", "Human"),
                    &[SourcePosition::new(40, 2, 25)],
                ),
                RuleError::new(
                    &error_message(Spread::Inline, "CatOrDog", "Human"),
                    &[SourcePosition::new(53, 2, 38)],
                ),
                RuleError::new(
                    &error_message(Spread::Inline, "Pet", "Human"),
                    &[SourcePosition::new(98, 3, 21)],
                ),
                RuleError::new(
                    &error_message(Spread::Named("humanBits"), "Pet", "Human"),
                    &[SourcePosition::new(118, 3, 41)],
                ),
                RuleError::new(
                    &error_message(Spread::Named("catBits"), "Human", "Cat"),
                    &[SourcePosition::new(176, 4, 43)],
                ),
            ],
        );
    }

    #[test]
    fn interface_applies_within_the_interfaces_it_implements() {
        expect_passes_rule_with_schema(
            &UNIMPLEMENTED,
            factory,
            r#"
            { node { ... on Resource { id } } }
            "#,
        );
        expect_fails_rule_with_schema(
            &UNIMPLEMENTED,
            factory,
            r#"
            { resource { ... on Node { id } } }
            "#,
            &[RuleError::new(
                &error_message(Spread::Inline, "Resource", "Node"),
                &[SourcePosition::new(26, 1, 25)],
            )],
        );
    }
}
