use std::borrow::Cow;

use crate::{
    ast::{
        Arguments, Definition, Directive, DirectiveDefinition, EnumValueDefinition, Field,
        FieldDefinition, Fragment, FragmentSpread, InlineFragment, InputValue,
        InputValueDefinition, Operation, OperationType, OperationTypeDefinition, OwnedDocument,
        SchemaDefinition, Selection, Type, TypeDefinition, TypeDefinitionKind, VariableDefinition,
        VariableDefinitions,
    },
    parser::{
        Lexer, OptionParseResult, ParseError, ParseResult, Parser, ScalarToken, SourcePosition,
        Spanning, Token, UnlocatedParseResult,
        value::{parse_value_literal, string_literal_value},
    },
    schema::model::DirectiveLocation,
};

/// Parses a document containing executable and/or type system definitions.
pub fn parse_document_source(s: &str) -> UnlocatedParseResult<OwnedDocument<'_>> {
    let mut lexer = Lexer::new(s);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    parse_document(&mut parser)
}

/// Parses a single constant value literal, e.g. a default value printed by an
/// introspection query.
pub fn parse_value_source(s: &str) -> ParseResult<InputValue> {
    let mut lexer = Lexer::new(s);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    let value = parse_value_literal(&mut parser, true)?;
    if parser.peek().item != Token::EndOfFile {
        return Err(parser.unexpected());
    }
    Ok(value)
}

/// Parses a single type literal, e.g. `[String!]`.
pub fn parse_type_source(s: &str) -> ParseResult<Type<'_>> {
    let mut lexer = Lexer::new(s);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    let ty = parse_type(&mut parser)?;
    if parser.peek().item != Token::EndOfFile {
        return Err(parser.unexpected());
    }
    Ok(ty)
}

fn parse_document<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<OwnedDocument<'a>> {
    let mut defs = Vec::new();

    loop {
        defs.push(parse_definition(parser)?);

        if parser.peek().item == Token::EndOfFile {
            return Ok(defs);
        }
    }
}

fn parse_definition<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Definition<'a>> {
    let start_pos = parser.peek().span.start;
    let description = parse_description(parser)?;

    match parser.peek().item {
        Token::CurlyOpen
        | Token::Name("query")
        | Token::Name("mutation")
        | Token::Name("subscription")
            if description.is_none() =>
        {
            Ok(Definition::Operation(parse_operation_definition(parser)?))
        }
        Token::Name("fragment") if description.is_none() => {
            Ok(Definition::Fragment(parse_fragment_definition(parser)?))
        }
        Token::Name("extend") if description.is_none() => {
            parser.next_token()?;
            parse_type_system_definition(parser, start_pos, None, true)
        }
        _ => parse_type_system_definition(parser, start_pos, description, false),
    }
}

fn parse_description(parser: &mut Parser<'_>) -> OptionParseResult<String> {
    match *parser.peek() {
        Spanning {
            item: Token::Scalar(ScalarToken::String(lit)),
            span,
        } => {
            parser.next_token()?;
            Ok(Some(Spanning::new(span, string_literal_value(lit))))
        }
        _ => Ok(None),
    }
}

fn parse_type_system_definition<'a>(
    parser: &mut Parser<'a>,
    start_pos: SourcePosition,
    description: Option<Spanning<String>>,
    extension: bool,
) -> UnlocatedParseResult<Definition<'a>> {
    let keyword = match parser.peek().item {
        Token::Name(keyword) => keyword,
        _ => return Err(parser.unexpected()),
    };

    match keyword {
        "schema" => {
            parser.next_token()?;
            let directives = parse_directives(parser)?;
            let operation_types = if extension && parser.peek().item != Token::CurlyOpen {
                Vec::new()
            } else {
                parser
                    .delimited_nonempty_list(
                        &Token::CurlyOpen,
                        parse_operation_type_definition,
                        &Token::CurlyClose,
                    )?
                    .item
            };

            Ok(Definition::Schema(Spanning::start_end(
                &start_pos,
                &parser.prev_end(),
                SchemaDefinition {
                    extension,
                    description,
                    directives: directives.map(|s| s.item),
                    operation_types,
                },
            )))
        }
        "directive" if !extension => Ok(Definition::Directive(parse_directive_definition(
            parser,
            start_pos,
            description,
        )?)),
        "scalar" | "type" | "interface" | "union" | "enum" | "input" => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let (kind, directives) = match keyword {
                "scalar" => (TypeDefinitionKind::Scalar, parse_directives(parser)?),
                "type" | "interface" => {
                    let interfaces = parse_implements_interfaces(parser)?;
                    let directives = parse_directives(parser)?;
                    let fields = parse_optional_fields_definition(parser)?;
                    let kind = if keyword == "type" {
                        TypeDefinitionKind::Object { interfaces, fields }
                    } else {
                        TypeDefinitionKind::Interface { interfaces, fields }
                    };
                    (kind, directives)
                }
                "union" => {
                    let directives = parse_directives(parser)?;
                    let members = parse_union_members(parser)?;
                    (TypeDefinitionKind::Union { members }, directives)
                }
                "enum" => {
                    let directives = parse_directives(parser)?;
                    let values = if parser.peek().item == Token::CurlyOpen {
                        parser
                            .delimited_nonempty_list(
                                &Token::CurlyOpen,
                                parse_enum_value_definition,
                                &Token::CurlyClose,
                            )?
                            .item
                    } else {
                        Vec::new()
                    };
                    (TypeDefinitionKind::Enum { values }, directives)
                }
                _ => {
                    let directives = parse_directives(parser)?;
                    let fields = if parser.peek().item == Token::CurlyOpen {
                        parser
                            .delimited_nonempty_list(
                                &Token::CurlyOpen,
                                parse_input_value_definition,
                                &Token::CurlyClose,
                            )?
                            .item
                    } else {
                        Vec::new()
                    };
                    (TypeDefinitionKind::InputObject { fields }, directives)
                }
            };

            Ok(Definition::Type(Spanning::start_end(
                &start_pos,
                &parser.prev_end(),
                TypeDefinition {
                    extension,
                    description,
                    name,
                    directives: directives.map(|s| s.item),
                    kind,
                },
            )))
        }
        _ => Err(parser.unexpected()),
    }
}

fn parse_operation_type_definition<'a>(
    parser: &mut Parser<'a>,
) -> ParseResult<OperationTypeDefinition<'a>> {
    let operation = parse_operation_type(parser)?;
    parser.expect(&Token::Colon)?;
    let named_type = parser.expect_name()?;
    let (start, end) = (operation.span.start, named_type.span.end);

    Ok(Spanning::start_end(
        &start,
        &end,
        OperationTypeDefinition {
            operation: operation.item,
            named_type,
        },
    ))
}

fn parse_implements_interfaces<'a>(
    parser: &mut Parser<'a>,
) -> UnlocatedParseResult<Vec<Spanning<&'a str>>> {
    let mut interfaces = Vec::new();
    if parser.skip_keyword("implements")?.is_none() {
        return Ok(interfaces);
    }

    if parser.peek().item == Token::Amp {
        parser.next_token()?;
    }
    interfaces.push(parser.expect_name()?);
    while parser.peek().item == Token::Amp {
        parser.next_token()?;
        interfaces.push(parser.expect_name()?);
    }

    Ok(interfaces)
}

fn parse_union_members<'a>(
    parser: &mut Parser<'a>,
) -> UnlocatedParseResult<Vec<Spanning<&'a str>>> {
    let mut members = Vec::new();
    if parser.peek().item != Token::Equals {
        return Ok(members);
    }
    parser.next_token()?;

    if parser.peek().item == Token::Pipe {
        parser.next_token()?;
    }
    members.push(parser.expect_name()?);
    while parser.peek().item == Token::Pipe {
        parser.next_token()?;
        members.push(parser.expect_name()?);
    }

    Ok(members)
}

fn parse_optional_fields_definition<'a>(
    parser: &mut Parser<'a>,
) -> UnlocatedParseResult<Vec<Spanning<FieldDefinition<'a>>>> {
    if parser.peek().item != Token::CurlyOpen {
        return Ok(Vec::new());
    }
    Ok(parser
        .delimited_nonempty_list(
            &Token::CurlyOpen,
            parse_field_definition,
            &Token::CurlyClose,
        )?
        .item)
}

fn parse_field_definition<'a>(parser: &mut Parser<'a>) -> ParseResult<FieldDefinition<'a>> {
    let start_pos = parser.peek().span.start;
    let description = parse_description(parser)?;
    let name = parser.expect_name()?;
    let arguments = parse_arguments_definition(parser)?;
    parser.expect(&Token::Colon)?;
    let field_type = parse_type(parser)?;
    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &parser.prev_end(),
        FieldDefinition {
            description,
            name,
            arguments,
            field_type,
            directives: directives.map(|s| s.item),
        },
    ))
}

fn parse_arguments_definition<'a>(
    parser: &mut Parser<'a>,
) -> UnlocatedParseResult<Vec<Spanning<InputValueDefinition<'a>>>> {
    if parser.peek().item != Token::ParenOpen {
        return Ok(Vec::new());
    }
    Ok(parser
        .delimited_nonempty_list(
            &Token::ParenOpen,
            parse_input_value_definition,
            &Token::ParenClose,
        )?
        .item)
}

fn parse_input_value_definition<'a>(
    parser: &mut Parser<'a>,
) -> ParseResult<InputValueDefinition<'a>> {
    let start_pos = parser.peek().span.start;
    let description = parse_description(parser)?;
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value_type = parse_type(parser)?;
    let default_value = if parser.peek().item == Token::Equals {
        parser.next_token()?;
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };
    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &parser.prev_end(),
        InputValueDefinition {
            description,
            name,
            value_type,
            default_value,
            directives: directives.map(|s| s.item),
        },
    ))
}

fn parse_enum_value_definition<'a>(
    parser: &mut Parser<'a>,
) -> ParseResult<EnumValueDefinition<'a>> {
    let start_pos = parser.peek().span.start;
    let description = parse_description(parser)?;
    let name = parser.expect_name()?;
    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &parser.prev_end(),
        EnumValueDefinition {
            description,
            name,
            directives: directives.map(|s| s.item),
        },
    ))
}

fn parse_directive_definition<'a>(
    parser: &mut Parser<'a>,
    start_pos: SourcePosition,
    description: Option<Spanning<String>>,
) -> ParseResult<DirectiveDefinition<'a>> {
    parser.expect(&Token::Name("directive"))?;
    parser.expect(&Token::At)?;
    let name = parser.expect_name()?;
    let arguments = parse_arguments_definition(parser)?;
    let repeatable = parser.skip_keyword("repeatable")?.is_some();
    parser.expect(&Token::Name("on"))?;

    if parser.peek().item == Token::Pipe {
        parser.next_token()?;
    }
    let mut locations = vec![parse_directive_location(parser)?];
    while parser.peek().item == Token::Pipe {
        parser.next_token()?;
        locations.push(parse_directive_location(parser)?);
    }

    Ok(Spanning::start_end(
        &start_pos,
        &parser.prev_end(),
        DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
        },
    ))
}

fn parse_directive_location(parser: &mut Parser<'_>) -> ParseResult<DirectiveLocation> {
    let name = parser.expect_name()?;
    match DirectiveLocation::from_name(name.item) {
        Some(loc) => Ok(Spanning::new(name.span, loc)),
        None => Err(name.map(|n| ParseError::UnexpectedToken(n.into()))),
    }
}

fn parse_operation_definition<'a>(parser: &mut Parser<'a>) -> ParseResult<Operation<'a>> {
    if parser.peek().item == Token::CurlyOpen {
        let selection_set = parse_selection_set(parser)?;

        Ok(Spanning::new(
            selection_set.span,
            Operation {
                operation_type: OperationType::Query,
                name: None,
                variable_definitions: None,
                directives: None,
                selection_set: selection_set.item,
            },
        ))
    } else {
        let start_pos = parser.peek().span.start;
        let operation_type = parse_operation_type(parser)?;
        let name = match parser.peek().item {
            Token::Name(_) => Some(parser.expect_name()?),
            _ => None,
        };
        let variable_definitions = parse_variable_definitions(parser)?;
        let directives = parse_directives(parser)?;
        let selection_set = parse_selection_set(parser)?;

        Ok(Spanning::start_end(
            &start_pos,
            &selection_set.span.end,
            Operation {
                operation_type: operation_type.item,
                name,
                variable_definitions,
                directives: directives.map(|s| s.item),
                selection_set: selection_set.item,
            },
        ))
    }
}

fn parse_fragment_definition<'a>(parser: &mut Parser<'a>) -> ParseResult<Fragment<'a>> {
    let start_pos = parser.expect(&Token::Name("fragment"))?.span.start;
    let name = parser.expect_name()?;
    if name.item == "on" {
        return Err(name.map(|_| ParseError::UnexpectedToken("on".into())));
    }

    parser.expect(&Token::Name("on"))?;
    let type_cond = parser.expect_name()?;

    let directives = parse_directives(parser)?;
    let selection_set = parse_selection_set(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &selection_set.span.end,
        Fragment {
            name,
            type_condition: type_cond,
            directives: directives.map(|s| s.item),
            selection_set: selection_set.item,
        },
    ))
}

fn parse_optional_selection_set<'a>(
    parser: &mut Parser<'a>,
) -> OptionParseResult<Vec<Selection<'a>>> {
    if parser.peek().item == Token::CurlyOpen {
        Ok(Some(parse_selection_set(parser)?))
    } else {
        Ok(None)
    }
}

fn parse_selection_set<'a>(parser: &mut Parser<'a>) -> ParseResult<Vec<Selection<'a>>> {
    parser.unlocated_delimited_nonempty_list(
        &Token::CurlyOpen,
        parse_selection,
        &Token::CurlyClose,
    )
}

fn parse_selection<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Selection<'a>> {
    match parser.peek().item {
        Token::Ellipsis => parse_fragment(parser),
        _ => parse_field(parser).map(Selection::Field),
    }
}

fn parse_fragment<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Selection<'a>> {
    let start_pos = parser.expect(&Token::Ellipsis)?.span.start;

    match parser.peek().item {
        Token::Name("on") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                &start_pos,
                &selection_set.span.end,
                InlineFragment {
                    type_condition: Some(name),
                    directives: directives.map(|s| s.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::CurlyOpen | Token::At => {
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                &start_pos,
                &selection_set.span.end,
                InlineFragment {
                    type_condition: None,
                    directives: directives.map(|s| s.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::Name(_) => {
            let frag_name = parser.expect_name()?;
            let directives = parse_directives(parser)?;

            Ok(Selection::FragmentSpread(Spanning::start_end(
                &start_pos,
                &directives
                    .as_ref()
                    .map_or(frag_name.span.end, |s| s.span.end),
                FragmentSpread {
                    name: frag_name,
                    directives: directives.map(|s| s.item),
                },
            )))
        }
        _ => Err(parser.unexpected()),
    }
}

fn parse_field<'a>(parser: &mut Parser<'a>) -> ParseResult<Field<'a>> {
    let first = parser.expect_name()?;

    let (alias, name) = if parser.skip(&Token::Colon)?.is_some() {
        (Some(first), parser.expect_name()?)
    } else {
        (None, first)
    };

    let arguments = parse_arguments(parser)?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_optional_selection_set(parser)?;

    let start = alias.as_ref().unwrap_or(&name).span.start;
    let end = selection_set
        .as_ref()
        .map(|s| s.span.end)
        .or_else(|| directives.as_ref().map(|s| s.span.end))
        .or_else(|| arguments.as_ref().map(|s| s.span.end))
        .unwrap_or(name.span.end);

    Ok(Spanning::start_end(
        &start,
        &end,
        Field {
            alias,
            name,
            arguments,
            directives: directives.map(|s| s.item),
            selection_set: selection_set.map(|s| s.item),
        },
    ))
}

fn parse_arguments<'a>(parser: &mut Parser<'a>) -> OptionParseResult<Arguments<'a>> {
    if parser.peek().item != Token::ParenOpen {
        Ok(None)
    } else {
        Ok(Some(
            parser
                .delimited_nonempty_list(&Token::ParenOpen, parse_argument, &Token::ParenClose)?
                .map(|args| Arguments {
                    items: args.into_iter().map(|s| s.item).collect(),
                }),
        ))
    }
}

fn parse_argument<'a>(
    parser: &mut Parser<'a>,
) -> ParseResult<(Spanning<&'a str>, Spanning<InputValue>)> {
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value = parse_value_literal(parser, false)?;
    let span = name.span.to(value.span);

    Ok(Spanning::new(span, (name, value)))
}

fn parse_operation_type(parser: &mut Parser<'_>) -> ParseResult<OperationType> {
    match parser.peek().item {
        Token::Name("query") => Ok(parser.next_token()?.map(|_| OperationType::Query)),
        Token::Name("mutation") => Ok(parser.next_token()?.map(|_| OperationType::Mutation)),
        Token::Name("subscription") => {
            Ok(parser.next_token()?.map(|_| OperationType::Subscription))
        }
        _ => Err(parser.unexpected()),
    }
}

fn parse_variable_definitions<'a>(
    parser: &mut Parser<'a>,
) -> OptionParseResult<VariableDefinitions<'a>> {
    if parser.peek().item != Token::ParenOpen {
        Ok(None)
    } else {
        Ok(Some(
            parser
                .delimited_nonempty_list(
                    &Token::ParenOpen,
                    parse_variable_definition,
                    &Token::ParenClose,
                )?
                .map(|defs| VariableDefinitions {
                    items: defs.into_iter().map(|s| s.item).collect(),
                }),
        ))
    }
}

fn parse_variable_definition<'a>(
    parser: &mut Parser<'a>,
) -> ParseResult<(Spanning<&'a str>, VariableDefinition<'a>)> {
    let start_pos = parser.expect(&Token::Dollar)?.span.start;
    let var_name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let var_type = parse_type(parser)?;

    let default_value = if parser.skip(&Token::Equals)?.is_some() {
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };

    let directives = parse_directives(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &default_value
            .as_ref()
            .map_or(var_type.span.end, |s| s.span.end),
        (
            Spanning::start_end(&start_pos, &var_name.span.end, var_name.item),
            VariableDefinition {
                var_type,
                default_value,
                directives: directives.map(|s| s.item),
            },
        ),
    ))
}

fn parse_directives<'a>(parser: &mut Parser<'a>) -> OptionParseResult<Vec<Spanning<Directive<'a>>>> {
    if parser.peek().item != Token::At {
        Ok(None)
    } else {
        let mut items = Vec::new();
        while parser.peek().item == Token::At {
            items.push(parse_directive(parser)?);
        }

        Ok(Spanning::spanning(items))
    }
}

fn parse_directive<'a>(parser: &mut Parser<'a>) -> ParseResult<Directive<'a>> {
    let start_pos = parser.expect(&Token::At)?.span.start;
    let name = parser.expect_name()?;
    let arguments = parse_arguments(parser)?;

    Ok(Spanning::start_end(
        &start_pos,
        &arguments.as_ref().map_or(name.span.end, |s| s.span.end),
        Directive { name, arguments },
    ))
}

/// Parses a type literal such as `[String!]!`.
pub fn parse_type<'a>(parser: &mut Parser<'a>) -> ParseResult<Type<'a>> {
    let parsed_type = if parser.peek().item == Token::BracketOpen {
        let start_pos = parser.next_token()?.span.start;
        let inner_type = parse_type(parser)?;
        let end_pos = parser.expect(&Token::BracketClose)?.span.end;
        Spanning::start_end(&start_pos, &end_pos, Type::List(Box::new(inner_type.item)))
    } else {
        parser.expect_name()?.map(|s| Type::Named(Cow::Borrowed(s)))
    };

    Ok(if parser.peek().item == Token::ExclamationMark {
        let end_pos = parser.next_token()?.span.end;
        Spanning::start_end(&parsed_type.span.start, &end_pos, parsed_type.item.wrap_non_null())
    } else {
        parsed_type
    })
}
