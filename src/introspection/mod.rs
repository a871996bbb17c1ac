//! Introspection meta types and the serialized introspection format
//!
//! The meta types (`__Schema`, `__Type`, ...) are shared by every schema in
//! the same way the built-in scalars are.

mod builder;
mod introspect;
mod records;

use std::sync::{Arc, LazyLock};

use crate::{
    ast::{InputValue, Type},
    schema::meta::{Argument, EnumMeta, EnumValue, Field, MetaType, ObjectMeta},
};

pub use self::{
    builder::{
        BuildClientSchemaOptions, IntrospectionError, build_client_schema,
        build_client_schema_from_query,
    },
    records::{
        IntrospectionDirective, IntrospectionEnumValue, IntrospectionField,
        IntrospectionInputValue, IntrospectionNamedTypeRef, IntrospectionQuery,
        IntrospectionSchema, IntrospectionType, IntrospectionTypeRef,
    },
};

/// Depth of type reference wrapping the canonical introspection query asks
/// for.
pub const MAX_TYPE_REF_DEPTH: usize = 7;

const INTROSPECTION_TYPE_NAMES: [&str; 8] = [
    "__Schema",
    "__Directive",
    "__DirectiveLocation",
    "__Type",
    "__Field",
    "__InputValue",
    "__EnumValue",
    "__TypeKind",
];

static INTROSPECTION_TYPES: LazyLock<[Arc<MetaType>; 8]> = LazyLock::new(|| {
    [
        schema_meta(),
        directive_meta(),
        directive_location_meta(),
        type_meta(),
        field_meta(),
        input_value_meta(),
        enum_value_meta(),
        type_kind_meta(),
    ]
    .map(Arc::new)
});

pub(crate) static TYPENAME_FIELD: LazyLock<Field> = LazyLock::new(|| {
    Field::new("__typename", Type::non_null_named("String"))
        .description("The name of the current Object type at runtime.")
});

pub(crate) static SCHEMA_FIELD: LazyLock<Field> = LazyLock::new(|| {
    Field::new("__schema", Type::non_null_named("__Schema"))
        .description("Access the current type schema of this server.")
});

pub(crate) static TYPE_FIELD: LazyLock<Field> = LazyLock::new(|| {
    Field::new("__type", Type::named("__Type"))
        .description("Request the type information of a single type.")
        .argument(Argument::new("name", Type::non_null_named("String")))
});

/// The shared `__Schema` type, through which all the other introspection
/// types are reachable.
pub(crate) fn schema_type() -> &'static Arc<MetaType> {
    &INTROSPECTION_TYPES[0]
}

/// The shared introspection type called `name`.
pub fn type_by_name(name: &str) -> Option<&'static Arc<MetaType>> {
    let idx = INTROSPECTION_TYPE_NAMES.iter().position(|&n| n == name)?;
    Some(&INTROSPECTION_TYPES[idx])
}

fn include_deprecated() -> Argument {
    Argument::new("includeDeprecated", Type::named("Boolean"))
        .default_value(InputValue::scalar(false))
}

fn schema_meta() -> MetaType {
    ObjectMeta::new(
        "__Schema",
        &[
            Field::new("description", Type::named("String")),
            Field::new(
                "types",
                Type::non_null_named("__Type").wrap_list().wrap_non_null(),
            )
            .description("A list of all types supported by this server."),
            Field::new("queryType", Type::non_null_named("__Type"))
                .description("The type that query operations will be rooted at."),
            Field::new("mutationType", Type::named("__Type")).description(
                "If this server supports mutation, the type that mutation operations will be \
                 rooted at.",
            ),
            Field::new("subscriptionType", Type::named("__Type")).description(
                "If this server support subscription, the type that subscription operations will \
                 be rooted at.",
            ),
            Field::new(
                "directives",
                Type::non_null_named("__Directive")
                    .wrap_list()
                    .wrap_non_null(),
            )
            .description("A list of all directives supported by this server."),
        ],
    )
    .description(
        "A GraphQL Schema defines the capabilities of a GraphQL server. It exposes all available \
         types and directives on the server, as well as the entry points for query, mutation, \
         and subscription operations.",
    )
    .into_meta()
}

fn directive_meta() -> MetaType {
    ObjectMeta::new(
        "__Directive",
        &[
            Field::new("name", Type::non_null_named("String")),
            Field::new("description", Type::named("String")),
            Field::new("isRepeatable", Type::non_null_named("Boolean")),
            Field::new(
                "locations",
                Type::non_null_named("__DirectiveLocation")
                    .wrap_list()
                    .wrap_non_null(),
            ),
            Field::new(
                "args",
                Type::non_null_named("__InputValue")
                    .wrap_list()
                    .wrap_non_null(),
            )
            .argument(include_deprecated()),
        ],
    )
    .description(
        "A Directive provides a way to describe alternate runtime execution and type validation \
         behavior in a GraphQL document.\n\nIn some cases, you need to provide options to alter \
         GraphQL's execution behavior in ways field arguments will not suffice, such as \
         conditionally including or skipping a field. Directives provide this by describing \
         additional information to the executor.",
    )
    .into_meta()
}

fn directive_location_meta() -> MetaType {
    let value = |name: &str, description: &str| EnumValue::new(name).description(description);
    EnumMeta::new(
        "__DirectiveLocation",
        &[
            value("QUERY", "Location adjacent to a query operation."),
            value("MUTATION", "Location adjacent to a mutation operation."),
            value("SUBSCRIPTION", "Location adjacent to a subscription operation."),
            value("FIELD", "Location adjacent to a field."),
            value("FRAGMENT_DEFINITION", "Location adjacent to a fragment definition."),
            value("FRAGMENT_SPREAD", "Location adjacent to a fragment spread."),
            value("INLINE_FRAGMENT", "Location adjacent to an inline fragment."),
            value("VARIABLE_DEFINITION", "Location adjacent to a variable definition."),
            value("SCHEMA", "Location adjacent to a schema definition."),
            value("SCALAR", "Location adjacent to a scalar definition."),
            value("OBJECT", "Location adjacent to an object type definition."),
            value("FIELD_DEFINITION", "Location adjacent to a field definition."),
            value("ARGUMENT_DEFINITION", "Location adjacent to an argument definition."),
            value("INTERFACE", "Location adjacent to an interface definition."),
            value("UNION", "Location adjacent to a union definition."),
            value("ENUM", "Location adjacent to an enum definition."),
            value("ENUM_VALUE", "Location adjacent to an enum value definition."),
            value("INPUT_OBJECT", "Location adjacent to an input object type definition."),
            value(
                "INPUT_FIELD_DEFINITION",
                "Location adjacent to an input object field definition.",
            ),
        ],
    )
    .description(
        "A Directive can be adjacent to many parts of the GraphQL language, a \
         __DirectiveLocation describes one such possible adjacencies.",
    )
    .into_meta()
}

fn type_meta() -> MetaType {
    let type_list = || Type::non_null_named("__Type").wrap_list();
    ObjectMeta::new(
        "__Type",
        &[
            Field::new("kind", Type::non_null_named("__TypeKind")),
            Field::new("name", Type::named("String")),
            Field::new("description", Type::named("String")),
            Field::new("specifiedByURL", Type::named("String")),
            Field::new("fields", Type::non_null_named("__Field").wrap_list())
                .argument(include_deprecated()),
            Field::new("interfaces", type_list()),
            Field::new("possibleTypes", type_list()),
            Field::new("enumValues", Type::non_null_named("__EnumValue").wrap_list())
                .argument(include_deprecated()),
            Field::new("inputFields", Type::non_null_named("__InputValue").wrap_list())
                .argument(include_deprecated()),
            Field::new("ofType", Type::named("__Type")),
        ],
    )
    .description(
        "The fundamental unit of any GraphQL Schema is the type. There are many kinds of types \
         in GraphQL as represented by the `__TypeKind` enum.\n\nDepending on the kind of a \
         type, certain fields describe information about that type. Scalar types provide no \
         information beyond a name, description and optional `specifiedByURL`, while Enum types \
         provide their values. Object and Interface types provide the fields they describe. \
         Abstract types, Union and Interface, provide the Object types possible at runtime. \
         List and NonNull types compose other types.",
    )
    .into_meta()
}

fn field_meta() -> MetaType {
    ObjectMeta::new(
        "__Field",
        &[
            Field::new("name", Type::non_null_named("String")),
            Field::new("description", Type::named("String")),
            Field::new(
                "args",
                Type::non_null_named("__InputValue")
                    .wrap_list()
                    .wrap_non_null(),
            )
            .argument(include_deprecated()),
            Field::new("type", Type::non_null_named("__Type")),
            Field::new("isDeprecated", Type::non_null_named("Boolean")),
            Field::new("deprecationReason", Type::named("String")),
        ],
    )
    .description(
        "Object and Interface types are described by a list of Fields, each of which has a \
         name, potentially a list of arguments, and a return type.",
    )
    .into_meta()
}

fn input_value_meta() -> MetaType {
    ObjectMeta::new(
        "__InputValue",
        &[
            Field::new("name", Type::non_null_named("String")),
            Field::new("description", Type::named("String")),
            Field::new("type", Type::non_null_named("__Type")),
            Field::new("defaultValue", Type::named("String")).description(
                "A GraphQL-formatted string representing the default value for this input value.",
            ),
            Field::new("isDeprecated", Type::non_null_named("Boolean")),
            Field::new("deprecationReason", Type::named("String")),
        ],
    )
    .description(
        "Arguments provided to Fields or Directives and the input fields of an InputObject are \
         represented as Input Values which describe their type and optionally a default value.",
    )
    .into_meta()
}

fn enum_value_meta() -> MetaType {
    ObjectMeta::new(
        "__EnumValue",
        &[
            Field::new("name", Type::non_null_named("String")),
            Field::new("description", Type::named("String")),
            Field::new("isDeprecated", Type::non_null_named("Boolean")),
            Field::new("deprecationReason", Type::named("String")),
        ],
    )
    .description(
        "One possible value for a given Enum. Enum values are unique values, not a placeholder \
         for a string or numeric value. However an Enum value is returned in a JSON response as \
         a string.",
    )
    .into_meta()
}

fn type_kind_meta() -> MetaType {
    let value = |name: &str, description: &str| EnumValue::new(name).description(description);
    EnumMeta::new(
        "__TypeKind",
        &[
            value("SCALAR", "Indicates this type is a scalar."),
            value(
                "OBJECT",
                "Indicates this type is an object. `fields` and `interfaces` are valid fields.",
            ),
            value(
                "INTERFACE",
                "Indicates this type is an interface. `fields`, `interfaces`, and \
                 `possibleTypes` are valid fields.",
            ),
            value(
                "UNION",
                "Indicates this type is a union. `possibleTypes` is a valid field.",
            ),
            value(
                "ENUM",
                "Indicates this type is an enum. `enumValues` is a valid field.",
            ),
            value(
                "INPUT_OBJECT",
                "Indicates this type is an input object. `inputFields` is a valid field.",
            ),
            value(
                "LIST",
                "Indicates this type is a list. `ofType` is a valid field.",
            ),
            value(
                "NON_NULL",
                "Indicates this type is a non-null. `ofType` is a valid field.",
            ),
        ],
    )
    .description("An enum describing what kind of type a given `__Type` is.")
    .into_meta()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::schema::{
        meta::MetaType,
        model::{SchemaConfig, SchemaType},
    };

    use super::{INTROSPECTION_TYPE_NAMES, type_by_name};

    #[test]
    fn types_are_shared_and_named() {
        for name in INTROSPECTION_TYPE_NAMES {
            let ty = type_by_name(name).unwrap();
            assert_eq!(ty.name().as_str(), name);
            assert!(ty.is_builtin());
            assert!(Arc::ptr_eq(ty, type_by_name(name).unwrap()));
        }
        assert!(type_by_name("__Other").is_none());
    }

    #[test]
    fn every_schema_registers_all_of_them() {
        let schema = SchemaType::new(SchemaConfig::default());
        for name in INTROSPECTION_TYPE_NAMES {
            assert!(
                Arc::ptr_eq(
                    schema.shared_type_by_name(name).unwrap(),
                    type_by_name(name).unwrap(),
                ),
                "{name}",
            );
        }
        assert!(matches!(
            schema.concrete_type_by_name("__TypeKind"),
            Some(MetaType::Enum(_)),
        ));
        assert_eq!(schema.validate().len(), 1, "only the query root is missing");
    }
}
