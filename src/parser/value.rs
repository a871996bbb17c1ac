use compact_str::format_compact;

use crate::{
    ast::InputValue,
    parser::{
        ParseError, ParseResult, Parser, ScalarToken, Spanning, Token, lexer::StringLiteral,
    },
    value::ScalarValue,
};

/// Parses a value literal. Variables are rejected when `is_const` is set.
pub fn parse_value_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    match parser.peek().item {
        Token::BracketOpen => parse_list_literal(parser, is_const),
        Token::CurlyOpen => parse_object_literal(parser, is_const),
        Token::Dollar if !is_const => parse_variable_literal(parser),
        Token::Scalar(token) => {
            let span = parser.next_token()?.span;
            parse_scalar_token(token)
                .map(|s| Spanning::new(span, InputValue::Scalar(s)))
                .map_err(|e| Spanning::new(span, e))
        }
        Token::Name("true") => Ok(parser.next_token()?.map(|_| InputValue::scalar(true))),
        Token::Name("false") => Ok(parser.next_token()?.map(|_| InputValue::scalar(false))),
        Token::Name("null") => Ok(parser.next_token()?.map(|_| InputValue::null())),
        Token::Name(name) => Ok(parser.next_token()?.map(|_| InputValue::enum_value(name))),
        _ => Err(parser.unexpected()),
    }
}

fn parse_list_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    Ok(parser
        .delimited_list(
            &Token::BracketOpen,
            |p| parse_value_literal(p, is_const),
            &Token::BracketClose,
        )?
        .map(InputValue::parsed_list))
}

fn parse_object_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    Ok(parser
        .delimited_list(
            &Token::CurlyOpen,
            |p| parse_object_field(p, is_const),
            &Token::CurlyClose,
        )?
        .map(|items| InputValue::parsed_object(items.into_iter().map(|s| s.item).collect())))
}

fn parse_object_field(
    parser: &mut Parser<'_>,
    is_const: bool,
) -> ParseResult<(Spanning<String>, Spanning<InputValue>)> {
    let key = parser.expect_name()?;

    parser.expect(&Token::Colon)?;

    let value = parse_value_literal(parser, is_const)?;
    let span = key.span.to(value.span);

    Ok(Spanning::new(span, (key.map(Into::into), value)))
}

fn parse_variable_literal(parser: &mut Parser<'_>) -> ParseResult<InputValue> {
    let start_pos = parser.expect(&Token::Dollar)?.span.start;
    let name = parser.expect_name()?;

    Ok(Spanning::start_end(
        &start_pos,
        &name.span.end,
        InputValue::variable(name.item),
    ))
}

/// Converts a scalar token into a value.
///
/// Integer literals outside of the 32-bit range become floats, so that they
/// are still accepted where a `Float` is expected.
pub(crate) fn parse_scalar_token(token: ScalarToken<'_>) -> Result<ScalarValue, ParseError> {
    match token {
        ScalarToken::String(lit) => Ok(ScalarValue::String(string_literal_value(lit))),
        ScalarToken::Int(i) => i
            .parse::<i32>()
            .map(ScalarValue::Int)
            .or_else(|_| i.parse::<f64>().map(ScalarValue::Float))
            .map_err(|_| ParseError::InvalidLiteral(i.into())),
        ScalarToken::Float(f) => f
            .parse::<f64>()
            .map(ScalarValue::Float)
            .map_err(|_| ParseError::InvalidLiteral(format_compact!("{f}"))),
    }
}

/// Resolves a raw string literal (quotes included) into the string it
/// denotes.
pub(crate) fn string_literal_value(lit: StringLiteral<'_>) -> String {
    match lit {
        StringLiteral::Quoted(raw) => unescape_quoted(&raw[1..raw.len() - 1]),
        StringLiteral::Block(raw) => block_string_value(&raw[3..raw.len() - 3]),
    }
}

/// Escape sequences have already been checked by the lexer.
fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                if let Some(c) = u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32)
                {
                    out.push(c);
                }
            }
            Some(c) => out.push(c),
            None => {}
        }
    }
    out
}

/// Computes the value of a `"""` block string: common indentation is removed
/// and leading and trailing blank lines are dropped.
fn block_string_value(raw: &str) -> String {
    let raw = raw.replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = raw
        .split("\r\n")
        .flat_map(|l| l.split(['\n', '\r']))
        .collect();

    let indent_of = |l: &str| l.len() - l.trim_start_matches([' ', '\t']).len();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim_start_matches([' ', '\t']).is_empty())
        .map(|l| indent_of(l))
        .min();

    let mut lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| match common_indent {
            Some(indent) if i > 0 => l.get(indent..).unwrap_or(""),
            _ => *l,
        })
        .collect();

    let is_blank = |l: &&str| l.trim_start_matches([' ', '\t']).is_empty();
    while lines.first().is_some_and(is_blank) {
        lines.remove(0);
    }
    while lines.last().is_some_and(is_blank) {
        lines.pop();
    }

    lines.join("\n")
}
