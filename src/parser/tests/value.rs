use crate::{
    ast::InputValue,
    parser::{ParseError, SourcePosition, Spanning, parse_value_source},
    value::ScalarValue,
};

fn parse_value(s: &str) -> InputValue {
    parse_value_source(s)
        .unwrap_or_else(|e| panic!("Parse error on input {s:#?}: {e}"))
        .item
}

#[test]
fn input_value_literals() {
    assert_eq!(parse_value("123"), InputValue::scalar(123));
    assert_eq!(parse_value("-0.5"), InputValue::scalar(-0.5));
    assert_eq!(parse_value("1e3"), InputValue::scalar(1000.0));
    assert_eq!(parse_value(r#""test""#), InputValue::scalar("test"));
    assert_eq!(parse_value(r#""a\"bA""#), InputValue::scalar("a\"bA"));
    assert_eq!(parse_value("true"), InputValue::scalar(true));
    assert_eq!(parse_value("null"), InputValue::null());
    assert_eq!(parse_value("SOME_ENUM"), InputValue::enum_value("SOME_ENUM"));
    assert_eq!(
        parse_value("\"\"\"\n    block\n      text\n\"\"\""),
        InputValue::scalar("block\n  text"),
    );
}

#[test]
fn structured_literals() {
    let value = parse_value(r#"[1, "two", {a: ENUM, b: [true]}]"#);
    assert!(value.unlocated_eq(&InputValue::list(vec![
        InputValue::scalar(1),
        InputValue::scalar("two"),
        InputValue::object([
            ("a", InputValue::enum_value("ENUM")),
            ("b", InputValue::list(vec![InputValue::scalar(true)])),
        ]),
    ])));
    assert_eq!(value.to_string(), r#"[1, "two", {a: ENUM, b: [true]}]"#);
}

#[test]
fn large_integers_become_floats() {
    assert_eq!(
        parse_value("2147483648"),
        InputValue::Scalar(ScalarValue::Float(2_147_483_648.0)),
    );
    assert_eq!(parse_value("2147483647"), InputValue::scalar(i32::MAX));
}

#[test]
fn rejects_variables_and_trailing_tokens() {
    assert_eq!(
        parse_value_source("$var").unwrap_err(),
        Spanning::single_width(
            &SourcePosition::new(0, 0, 0),
            ParseError::UnexpectedToken("$".into()),
        ),
    );
    assert_eq!(
        parse_value_source("1 2").unwrap_err().item,
        ParseError::UnexpectedToken("2".into()),
    );
    assert_eq!(
        parse_value_source("").unwrap_err().item,
        ParseError::UnexpectedEndOfFile,
    );
}

#[test]
fn object_fields_keep_key_and_value_spans() {
    let parsed = parse_value_source("{a: 1, bc: [2]}").expect("object literal parses");
    assert_eq!(parsed.span.start, SourcePosition::new(0, 0, 0));
    assert_eq!(parsed.span.end, SourcePosition::new(15, 0, 15));

    let InputValue::Object(fields) = parsed.item else {
        panic!("expected an object literal, got {:?}", parsed.item);
    };
    assert_eq!(fields.len(), 2);

    let (key, value) = &fields[1];
    assert_eq!(
        *key,
        Spanning::start_end(
            &SourcePosition::new(7, 0, 7),
            &SourcePosition::new(9, 0, 9),
            "bc".to_owned(),
        ),
    );
    assert_eq!(value.span.start, SourcePosition::new(11, 0, 11));
    assert_eq!(value.span.end, SourcePosition::new(14, 0, 14));
}
