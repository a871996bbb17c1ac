use pretty_assertions::assert_eq;

use crate::{
    parser::{SourcePosition, parse_document_source},
    validation::{RuleError, ValidationOptions, validate, validate_sdl, validate_with_options},
};

use super::client_pet_store;

#[test]
fn accepts_valid_document() {
    let schema = client_pet_store();
    let doc = parse_document_source(
        r#"
        query Pets($filter: PetFilter = {limit: 5}, $withOwner: Boolean!) @cached(ttl: 10) {
          pets(filter: $filter) {
            ...petFields
            ... on Dog {
              owner @include(if: $withOwner) { name }
              born @cached @cached
            }
          }
          node(id: "1") { id ... on Human { pets { __typename } } }
        }

        fragment petFields on Pet { id name(surname: true) }

        mutation Adopt { adopt(petId: 4) { id } }
        "#,
    )
    .unwrap();

    assert_eq!(validate(&schema, &doc), Vec::<RuleError>::new());
}

#[test]
fn reports_every_error_in_position_order() {
    let schema = client_pet_store();
    let doc = parse_document_source(
        r#"
        query Pets($first: Int, $unused: String) {
          pets(first: $first) { nme }
          catOrDog { name }
        }
        "#,
    )
    .unwrap();

    assert_eq!(
        validate(&schema, &doc),
        [
            RuleError::new(
                r#"Variable "$unused" is not used by operation "Pets""#,
                &[SourcePosition::new(33, 1, 32)],
            ),
            RuleError::new(
                r#"Unknown field "nme" on type "Pet""#,
                &[SourcePosition::new(84, 2, 32)],
            ),
            RuleError::new(
                r#"Unknown field "name" on type "CatOrDog""#,
                &[SourcePosition::new(111, 3, 21)],
            ),
        ],
    );
}

#[test]
fn rejects_type_system_definitions() {
    let schema = client_pet_store();
    let doc = parse_document_source(
        r#"
        type Dog { name: String }
        { pets { id } }
        "#,
    )
    .unwrap();

    assert_eq!(
        validate(&schema, &doc),
        [RuleError::new(
            r#"The "Dog" definition is not executable."#,
            &[SourcePosition::new(9, 1, 8)],
        )],
    );
}

#[test]
fn introspection_can_be_disabled() {
    let schema = client_pet_store();
    let doc = parse_document_source(
        r#"
        { __schema { queryType { name } } }
        "#,
    )
    .unwrap();

    assert_eq!(validate(&schema, &doc), Vec::<RuleError>::new());
    assert_eq!(
        validate_with_options(
            &schema,
            &doc,
            &ValidationOptions {
                disable_introspection: true,
            },
        ),
        [RuleError::new(
            "GraphQL introspection is not allowed, but the operation contained `__schema`",
            &[SourcePosition::new(11, 1, 10)],
        )],
    );
}

#[test]
fn options_deserialize() {
    let options: ValidationOptions =
        serde_json::from_value(serde_json::json!({"disableIntrospection": true})).unwrap();
    assert!(options.disable_introspection);

    let options: ValidationOptions = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(options, ValidationOptions::default());
}

#[test]
fn validates_type_system_documents() {
    let doc = parse_document_source(
        r#"
        type Query { pets: [Pet] }
        type Query { owner: Human }
        enum Order { ASC ASC }
        "#,
    )
    .unwrap();

    assert_eq!(
        validate_sdl(&doc),
        [
            RuleError::new(
                r#"There can only be one type named "Query""#,
                &[SourcePosition::new(14, 1, 13), SourcePosition::new(49, 2, 13)],
            ),
            RuleError::new(r#"Unknown type "Pet""#, &[SourcePosition::new(28, 1, 27)]),
            RuleError::new(r#"Unknown type "Human""#, &[SourcePosition::new(64, 2, 28)]),
            RuleError::new(
                r#"Enum value "Order.ASC" can only be defined once"#,
                &[SourcePosition::new(93, 3, 21), SourcePosition::new(97, 3, 25)],
            ),
        ],
    );
}

#[test]
fn accepts_valid_type_system_document() {
    let doc = parse_document_source(
        r#"
        schema { query: Query }

        "Roots of every query."
        type Query { pets(order: Order = ASC): [Pet!]! @deprecated }
        interface Pet { name: String }
        type Dog implements Pet @tag(name: "dog") @tag(name: "good") { name: String }
        enum Order { ASC DESC }
        directive @tag(name: String!) repeatable on OBJECT
        "#,
    )
    .unwrap();

    assert_eq!(validate_sdl(&doc), Vec::<RuleError>::new());
}
