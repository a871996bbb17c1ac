mod validation;

use std::sync::Arc;

use crate::{
    ast::{InputValue, Type},
    introspection::{BuildClientSchemaOptions, build_client_schema},
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, ObjectMeta,
            ScalarMeta, UnionMeta,
        },
        model::{DirectiveLocation, DirectiveType, SchemaConfig, SchemaType},
    },
};

fn pet_name() -> Field {
    Field::new("name", Type::named("String")).argument(
        Argument::new("surname", Type::named("Boolean")).default_value(InputValue::scalar(false)),
    )
}

fn id() -> Field {
    Field::new("id", Type::non_null_named("ID"))
}

/// Schema exercising every kind of type, default values, deprecations and a
/// custom directive.
pub(crate) fn pet_store() -> SchemaType {
    let mut directives = DirectiveType::specified();
    directives.push(
        DirectiveType::new(
            "cached",
            &[DirectiveLocation::Query, DirectiveLocation::Field],
            &[Argument::new("ttl", Type::named("Int")).default_value(InputValue::scalar(60))],
            true,
        )
        .description("Caches the result for `ttl` seconds."),
    );

    SchemaType::new(SchemaConfig {
        description: Some("A pet store.".into()),
        query: Some("Query".into()),
        mutation: Some("Mutation".into()),
        types: vec![
            ObjectMeta::new(
                "Query",
                &[
                    Field::new("pets", Type::non_null_named("Pet").wrap_list().wrap_non_null())
                        .argument(Argument::new("filter", Type::named("PetFilter")))
                        .argument(
                            Argument::new("first", Type::named("Int"))
                                .default_value(InputValue::scalar(20)),
                        ),
                    Field::new("node", Type::named("Node"))
                        .argument(Argument::new("id", Type::non_null_named("ID"))),
                    Field::new("catOrDog", Type::named("CatOrDog")),
                ],
            )
            .into_meta(),
            ObjectMeta::new(
                "Mutation",
                &[Field::new("adopt", Type::named("Pet"))
                    .argument(Argument::new("petId", Type::non_null_named("ID")))],
            )
            .into_meta(),
            InterfaceMeta::new("Node", &[id()]).into_meta(),
            InterfaceMeta::new("Pet", &[id(), pet_name()])
                .description("Something to adopt.")
                .interfaces(&["Node"])
                .into_meta(),
            ObjectMeta::new(
                "Dog",
                &[
                    id(),
                    pet_name(),
                    Field::new("barks", Type::named("Boolean")).deprecated(Some("Ask the dog.")),
                    Field::new("born", Type::named("Date")),
                    Field::new("owner", Type::named("Human")),
                ],
            )
            .interfaces(&["Pet", "Node"])
            .into_meta(),
            ObjectMeta::new(
                "Cat",
                &[id(), pet_name(), Field::new("meows", Type::named("Boolean"))],
            )
            .interfaces(&["Pet", "Node"])
            .into_meta(),
            ObjectMeta::new(
                "Human",
                &[
                    id(),
                    Field::new("name", Type::named("String")),
                    Field::new("pets", Type::non_null_named("Pet").wrap_list().wrap_non_null()),
                ],
            )
            .interfaces(&["Node"])
            .into_meta(),
            UnionMeta::new("CatOrDog", &["Cat", "Dog"]).into_meta(),
            EnumMeta::new(
                "Order",
                &[
                    EnumValue::new("ASC"),
                    EnumValue::new("DESC"),
                    EnumValue::new("RANDOM").deprecated(None),
                ],
            )
            .into_meta(),
            InputObjectMeta::new(
                "PetFilter",
                &[
                    Argument::new("name", Type::named("String")),
                    Argument::new("limit", Type::named("Int"))
                        .default_value(InputValue::scalar(10)),
                    Argument::new("order", Type::named("Order"))
                        .default_value(InputValue::enum_value("ASC")),
                    Argument::new("tags", Type::non_null_named("String").wrap_list())
                        .default_value(InputValue::list(vec![InputValue::scalar("young")])),
                ],
            )
            .into_meta(),
            ScalarMeta::new("Date")
                .specified_by_url("https://tools.ietf.org/html/rfc3339")
                .into_meta(),
        ]
        .into_iter()
        .map(Arc::new)
        .collect(),
        directives: Some(directives),
        ..SchemaConfig::default()
    })
}

/// [`pet_store()`] as a client sees it, rebuilt from its introspection.
pub(crate) fn client_pet_store() -> SchemaType {
    let introspection = serde_json::to_value(pet_store().introspect()).unwrap();
    build_client_schema(&introspection, &BuildClientSchemaOptions::default()).unwrap()
}
