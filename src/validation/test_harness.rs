use std::sync::{Arc, LazyLock};

use crate::{
    ast::{InputValue, OwnedDocument, Type},
    parser::parse_document_source,
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, MetaType,
            ObjectMeta, UnionMeta,
        },
        model::{DirectiveLocation, DirectiveType, SchemaConfig, SchemaType},
    },
    validation::{MultiVisitorNil, RuleError, ValidatorContext, Visitor, visit},
};

fn name_field() -> Field {
    Field::new("name", Type::named("String"))
        .argument(Argument::new("surname", Type::named("Boolean")))
}

fn int_arg(name: &str) -> Argument {
    Argument::new(name, Type::named("Int"))
}

fn required_int_arg(name: &str) -> Argument {
    Argument::new(name, Type::non_null_named("Int"))
}

fn string_field(name: &str) -> Field {
    Field::new(name, Type::named("String"))
}

fn test_types() -> Vec<MetaType> {
    vec![
        ObjectMeta::new(
            "QueryRoot",
            &[
                Field::new("human", Type::named("Human"))
                    .argument(Argument::new("id", Type::named("ID"))),
                Field::new("alien", Type::named("Alien")),
                Field::new("dog", Type::named("Dog")),
                Field::new("cat", Type::named("Cat")),
                Field::new("pet", Type::named("Pet")),
                Field::new("catOrDog", Type::named("CatOrDog")),
                Field::new("dorOrHuman", Type::named("DogOrHuman")),
                Field::new("humanOrAlien", Type::named("HumanOrAlien")),
                Field::new("complicatedArgs", Type::named("ComplicatedArgs")),
            ],
        )
        .into_meta(),
        ObjectMeta::new(
            "MutationRoot",
            &[Field::new("testInput", Type::non_null_named("Int")).argument(
                Argument::new("input", Type::named("TestInput")).default_value(InputValue::object([
                    ("id", InputValue::scalar(423)),
                    ("name", InputValue::scalar("foo")),
                ])),
            )],
        )
        .into_meta(),
        InterfaceMeta::new("Being", &[name_field()]).into_meta(),
        InterfaceMeta::new("Pet", &[name_field()]).into_meta(),
        InterfaceMeta::new("Canine", &[name_field()]).into_meta(),
        InterfaceMeta::new("Unpopulated", &[name_field()])
            .interfaces(&["Being"])
            .into_meta(),
        EnumMeta::new(
            "DogCommand",
            &[EnumValue::new("SIT"), EnumValue::new("HEEL"), EnumValue::new("DOWN")],
        )
        .into_meta(),
        ObjectMeta::new(
            "Dog",
            &[
                name_field(),
                string_field("nickname"),
                Field::new("barkVolume", Type::named("Int")),
                Field::new("barks", Type::named("Boolean")),
                Field::new("doesKnowCommand", Type::named("Boolean"))
                    .argument(Argument::new("dogCommand", Type::named("DogCommand"))),
                Field::new("isHousetrained", Type::named("Boolean")).argument(
                    Argument::new("atOtherHomes", Type::named("Boolean"))
                        .default_value(InputValue::scalar(true)),
                ),
                Field::new("isAtLocation", Type::named("Boolean"))
                    .argument(int_arg("x"))
                    .argument(int_arg("y")),
            ],
        )
        .interfaces(&["Being", "Pet", "Canine"])
        .into_meta(),
        EnumMeta::new(
            "FurColor",
            &[
                EnumValue::new("BROWN"),
                EnumValue::new("BLACK"),
                EnumValue::new("TAN"),
                EnumValue::new("SPOTTED"),
            ],
        )
        .into_meta(),
        ObjectMeta::new(
            "Cat",
            &[
                name_field(),
                string_field("nickname"),
                Field::new("meows", Type::named("Boolean")),
                Field::new("meowVolume", Type::named("Int")),
                Field::new("furColor", Type::named("FurColor")),
            ],
        )
        .interfaces(&["Being", "Pet"])
        .into_meta(),
        UnionMeta::new("CatOrDog", &["Cat", "Dog"]).into_meta(),
        InterfaceMeta::new("Intelligent", &[Field::new("iq", Type::named("Int"))]).into_meta(),
        ObjectMeta::new(
            "Human",
            &[
                name_field(),
                Field::new("pets", Type::named("Pet").wrap_list()),
                Field::new("relatives", Type::non_null_named("Human").wrap_list()),
                Field::new("iq", Type::named("Int")),
            ],
        )
        .interfaces(&["Being", "Intelligent"])
        .into_meta(),
        ObjectMeta::new(
            "Alien",
            &[
                name_field(),
                Field::new("iq", Type::named("Int")),
                Field::new("numEyes", Type::named("Int")),
            ],
        )
        .interfaces(&["Being", "Intelligent"])
        .into_meta(),
        UnionMeta::new("DogOrHuman", &["Dog", "Human"]).into_meta(),
        UnionMeta::new("HumanOrAlien", &["Human", "Alien"]).into_meta(),
        InputObjectMeta::new(
            "ComplexInput",
            &[
                Argument::new("requiredField", Type::non_null_named("Boolean")),
                int_arg("intField"),
                Argument::new("stringField", Type::named("String")),
                Argument::new("booleanField", Type::named("Boolean")),
                Argument::new("stringListField", Type::named("String").wrap_list()),
            ],
        )
        .into_meta(),
        InputObjectMeta::new(
            "TestInput",
            &[required_int_arg("id"), Argument::new("name", Type::non_null_named("String"))],
        )
        .into_meta(),
        ObjectMeta::new(
            "ComplicatedArgs",
            &[
                string_field("intArgField").argument(int_arg("intArg")),
                string_field("nonNullIntArgField").argument(required_int_arg("nonNullIntArg")),
                string_field("nonNullIntArgFieldWithDefault").argument(
                    required_int_arg("nonNullIntArg").default_value(InputValue::scalar(3)),
                ),
                string_field("stringArgField")
                    .argument(Argument::new("stringArg", Type::named("String"))),
                string_field("booleanArgField")
                    .argument(Argument::new("booleanArg", Type::named("Boolean"))),
                string_field("enumArgField")
                    .argument(Argument::new("enumArg", Type::named("FurColor"))),
                string_field("floatArgField")
                    .argument(Argument::new("floatArg", Type::named("Float"))),
                string_field("idArgField").argument(Argument::new("idArg", Type::named("ID"))),
                string_field("stringListArgField").argument(Argument::new(
                    "stringListArg",
                    Type::named("String").wrap_list(),
                )),
                string_field("nonNullStringListArgField").argument(Argument::new(
                    "nonNullStringListArg",
                    Type::non_null_named("String").wrap_list().wrap_non_null(),
                )),
                string_field("complexArgField")
                    .argument(Argument::new("complexArg", Type::named("ComplexInput"))),
                string_field("multipleReqs")
                    .argument(required_int_arg("req1"))
                    .argument(required_int_arg("req2")),
                string_field("multipleOpts")
                    .argument(int_arg("opt1").default_value(InputValue::scalar(0)))
                    .argument(int_arg("opt2").default_value(InputValue::scalar(0))),
                string_field("multipleOptAndReq")
                    .argument(required_int_arg("req1"))
                    .argument(required_int_arg("req2"))
                    .argument(int_arg("opt1").default_value(InputValue::scalar(0)))
                    .argument(int_arg("opt2").default_value(InputValue::scalar(0))),
            ],
        )
        .into_meta(),
    ]
}

fn test_directives() -> Vec<DirectiveType> {
    let mut directives = DirectiveType::specified();
    directives.extend([
        DirectiveType::new("onQuery", &[DirectiveLocation::Query], &[], false),
        DirectiveType::new("onMutation", &[DirectiveLocation::Mutation], &[], false),
        DirectiveType::new("onField", &[DirectiveLocation::Field], &[], false),
        DirectiveType::new(
            "onFragmentDefinition",
            &[DirectiveLocation::FragmentDefinition],
            &[],
            false,
        ),
        DirectiveType::new("onFragmentSpread", &[DirectiveLocation::FragmentSpread], &[], false),
        DirectiveType::new("onInlineFragment", &[DirectiveLocation::InlineFragment], &[], false),
        DirectiveType::new("repeatableOnField", &[DirectiveLocation::Field], &[], true),
    ]);
    directives
}

/// Schema the rules are tested against.
pub(crate) static SCHEMA: LazyLock<SchemaType> = LazyLock::new(|| {
    SchemaType::new(SchemaConfig {
        query: Some("QueryRoot".into()),
        mutation: Some("MutationRoot".into()),
        types: test_types().into_iter().map(Arc::new).collect(),
        directives: Some(test_directives()),
        ..SchemaConfig::default()
    })
});

/// [`pet_store()`](crate::tests::pet_store), whose `Pet` interface is shared
/// by objects returning differently shaped fields.
pub(crate) static PET_STORE: LazyLock<SchemaType> = LazyLock::new(crate::tests::pet_store);

/// Test documents live for the whole test run, as the rules borrow from them.
fn parse(q: &'static str) -> &'static OwnedDocument<'static> {
    let doc =
        parse_document_source(q).unwrap_or_else(|e| panic!("Parse error on input {q:#?}: {e}"));
    Box::leak(Box::new(doc))
}

fn validate<F>(schema: &'static SchemaType, q: &'static str, visit_fn: F) -> Vec<RuleError>
where
    F: FnOnce(&mut ValidatorContext<'static>, &'static OwnedDocument<'static>),
{
    let doc = parse(q);
    let mut ctx = ValidatorContext::new(schema, doc);

    visit_fn(&mut ctx, doc);

    ctx.into_errors()
}

fn run_rule<V, F>(schema: &'static SchemaType, factory: F, q: &'static str) -> Vec<RuleError>
where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    validate(schema, q, move |ctx, doc| {
        let mut mv = MultiVisitorNil.with(factory());
        visit(&mut mv, ctx, doc);
    })
}

fn check_passes(errs: &[RuleError]) {
    if !errs.is_empty() {
        print_errors(errs);
        panic!("Expected rule to pass, but errors found");
    }
}

fn check_fails(errs: &[RuleError], expected_errors: &[RuleError]) {
    if errs.is_empty() {
        panic!("Expected rule to fail, but no errors were found");
    } else if errs != expected_errors {
        println!("==> Expected errors:");
        print_errors(expected_errors);

        println!("\n==> Actual errors:");
        print_errors(errs);

        panic!("Unexpected set of errors found");
    }
}

pub(crate) fn expect_passes_rule<V, F>(factory: F, q: &'static str)
where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    expect_passes_rule_with_schema(&SCHEMA, factory, q);
}

pub(crate) fn expect_passes_rule_with_schema<V, F>(
    schema: &'static SchemaType,
    factory: F,
    q: &'static str,
) where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    check_passes(&run_rule(schema, factory, q));
}

pub(crate) fn expect_fails_rule<V, F>(factory: F, q: &'static str, expected_errors: &[RuleError])
where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    expect_fails_rule_with_schema(&SCHEMA, factory, q, expected_errors);
}

pub(crate) fn expect_fails_rule_with_schema<V, F>(
    schema: &'static SchemaType,
    factory: F,
    q: &'static str,
    expected_errors: &[RuleError],
) where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    check_fails(&run_rule(schema, factory, q), expected_errors);
}

/// Runs a rule over a type system document, resolving names like
/// [`validate_sdl()`](crate::validation::validate_sdl) does.
pub(crate) fn expect_passes_sdl_rule<V, F>(factory: F, sdl: &'static str)
where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    check_passes(&run_rule(SchemaType::standard(), factory, sdl));
}

pub(crate) fn expect_fails_sdl_rule<V, F>(
    factory: F,
    sdl: &'static str,
    expected_errors: &[RuleError],
) where
    V: Visitor<'static> + 'static,
    F: FnOnce() -> V,
{
    check_fails(&run_rule(SchemaType::standard(), factory, sdl), expected_errors);
}

fn print_errors(errs: &[RuleError]) {
    for err in errs {
        for p in err.locations() {
            print!("[{:>3},{:>3},{:>3}]  ", p.index(), p.line(), p.column());
        }
        println!("{}", err.message());
    }
}
