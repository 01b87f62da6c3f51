use crate::{
    ast::{
        Arguments, Definition, Directive, DirectiveDefinition, Document, EnumTypeDefinition,
        EnumValueDefinition, Field, FieldDefinition, Fragment, FragmentSpread, InlineFragment,
        InputObjectTypeDefinition, InputValue, InputValueDefinition, InterfaceTypeDefinition,
        ObjectTypeDefinition, Operation, OperationType, RootOperationTypeDefinition,
        ScalarTypeDefinition, SchemaDefinition, Selection, Type, TypeSystemDefinition,
        UnionTypeDefinition, VariableDefinition, VariableDefinitions,
    },
    parser::{
        value::parse_value_literal, Lexer, OptionParseResult, ParseError, ParseResult, Parser,
        SourcePosition, Spanning, Token, UnlocatedParseResult,
    },
};

#[doc(hidden)]
pub fn parse_document_source(s: &str) -> Result<Document, Spanning<ParseError>> {
    let mut lexer = Lexer::new(s);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    parse_document(&mut parser)
}

fn parse_document(parser: &mut Parser<'_>) -> Result<Document, Spanning<ParseError>> {
    let mut definitions = Vec::new();

    loop {
        definitions.push(parse_definition(parser)?);

        if parser.peek().item == Token::EndOfFile {
            return Ok(Document { definitions });
        }
    }
}

fn parse_definition(parser: &mut Parser<'_>) -> UnlocatedParseResult<Definition> {
    match &parser.peek().item {
        Token::CurlyOpen
        | Token::Name("query")
        | Token::Name("mutation")
        | Token::Name("subscription") => {
            Ok(Definition::Operation(parse_operation_definition(parser)?))
        }
        Token::Name("fragment") => Ok(Definition::Fragment(parse_fragment_definition(parser)?)),
        Token::Name(
            "schema" | "scalar" | "type" | "interface" | "union" | "enum" | "input" | "directive",
        )
        | Token::String(_)
        | Token::BlockString(_) => Ok(Definition::TypeSystem(parse_type_system_definition(
            parser,
        )?)),
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_operation_definition(parser: &mut Parser<'_>) -> ParseResult<Operation> {
    if parser.peek().item == Token::CurlyOpen {
        let selection_set = parse_selection_set(parser)?;

        Ok(Spanning::start_end(
            selection_set.span.start,
            selection_set.span.end,
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
            Token::Name(_) => Some(parser.expect_name()?.map(String::from)),
            _ => None,
        };
        let variable_definitions = parse_variable_definitions(parser)?;
        let directives = parse_directives(parser)?;
        let selection_set = parse_selection_set(parser)?;

        Ok(Spanning::start_end(
            start_pos,
            selection_set.span.end,
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

fn parse_fragment_definition(parser: &mut Parser<'_>) -> ParseResult<Fragment> {
    let Spanning {
        span: start_span, ..
    } = parser.expect(&Token::Name("fragment"))?;
    let name = parser.expect_name()?;
    if name.item == "on" {
        return Err(name.map(|_| ParseError::unexpected_token(Token::Name("on"))));
    }

    parser.expect(&Token::Name("on"))?;
    let type_cond = parser.expect_name()?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_selection_set(parser)?;

    Ok(Spanning::start_end(
        start_span.start,
        selection_set.span.end,
        Fragment {
            name: name.map(String::from),
            type_condition: type_cond.map(String::from),
            directives: directives.map(|s| s.item),
            selection_set: selection_set.item,
        },
    ))
}

fn parse_optional_selection_set(parser: &mut Parser<'_>) -> OptionParseResult<Vec<Selection>> {
    if parser.peek().item == Token::CurlyOpen {
        Ok(Some(parse_selection_set(parser)?))
    } else {
        Ok(None)
    }
}

fn parse_selection_set(parser: &mut Parser<'_>) -> ParseResult<Vec<Selection>> {
    parser.unlocated_delimited_nonempty_list(&Token::CurlyOpen, parse_selection, &Token::CurlyClose)
}

fn parse_selection(parser: &mut Parser<'_>) -> UnlocatedParseResult<Selection> {
    match parser.peek().item {
        Token::Ellipsis => parse_fragment(parser),
        _ => parse_field(parser).map(Selection::Field),
    }
}

fn parse_fragment(parser: &mut Parser<'_>) -> UnlocatedParseResult<Selection> {
    let Spanning {
        span: start_span, ..
    } = parser.expect(&Token::Ellipsis)?;

    match parser.peek().item {
        Token::Name("on") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                start_span.start,
                selection_set.span.end,
                InlineFragment {
                    type_condition: Some(name.map(String::from)),
                    directives: directives.map(|s| s.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::CurlyOpen => {
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                start_span.start,
                selection_set.span.end,
                InlineFragment {
                    type_condition: None,
                    directives: None,
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::Name(_) => {
            let frag_name = parser.expect_name()?;
            let directives = parse_directives(parser)?;

            Ok(Selection::FragmentSpread(Spanning::start_end(
                start_span.start,
                directives.as_ref().map_or(frag_name.span.end, |s| s.span.end),
                FragmentSpread {
                    name: frag_name.map(String::from),
                    directives: directives.map(|s| s.item),
                },
            )))
        }
        Token::At => {
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                start_span.start,
                selection_set.span.end,
                InlineFragment {
                    type_condition: None,
                    directives: directives.map(|s| s.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_field(parser: &mut Parser<'_>) -> ParseResult<Field> {
    let mut alias = Some(parser.expect_name()?);

    let name = if parser.skip(&Token::Colon)?.is_some() {
        parser.expect_name()?
    } else {
        alias.take().expect("alias was just set")
    };

    let arguments = parse_arguments(parser)?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_optional_selection_set(parser)?;

    Ok(Spanning::start_end(
        alias.as_ref().unwrap_or(&name).span.start,
        selection_set
            .as_ref()
            .map(|s| s.span.end)
            .or_else(|| directives.as_ref().map(|s| s.span.end))
            .or_else(|| arguments.as_ref().map(|s| s.span.end))
            .unwrap_or(name.span.end),
        Field {
            alias: alias.map(|s| s.map(String::from)),
            name: name.map(String::from),
            arguments,
            directives: directives.map(|s| s.item),
            selection_set: selection_set.map(|s| s.item),
        },
    ))
}

fn parse_arguments(parser: &mut Parser<'_>) -> OptionParseResult<Arguments> {
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

fn parse_argument(
    parser: &mut Parser<'_>,
) -> ParseResult<(Spanning<String>, Spanning<InputValue>)> {
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value = parse_value_literal(parser, false)?;

    Ok(Spanning::start_end(
        name.span.start,
        value.span.end,
        (name.map(String::from), value),
    ))
}

fn parse_operation_type(parser: &mut Parser<'_>) -> ParseResult<OperationType> {
    match parser.peek().item {
        Token::Name("query") => Ok(parser.next_token()?.map(|_| OperationType::Query)),
        Token::Name("mutation") => Ok(parser.next_token()?.map(|_| OperationType::Mutation)),
        Token::Name("subscription") => {
            Ok(parser.next_token()?.map(|_| OperationType::Subscription))
        }
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_variable_definitions(
    parser: &mut Parser<'_>,
) -> OptionParseResult<VariableDefinitions> {
    if parser.peek().item != Token::ParenOpen {
        Ok(None)
    } else {
        Ok(Some(
            parser
                .unlocated_delimited_nonempty_list(
                    &Token::ParenOpen,
                    parse_variable_definition,
                    &Token::ParenClose,
                )?
                .map(|items| VariableDefinitions { items }),
        ))
    }
}

fn parse_variable_definition(parser: &mut Parser<'_>) -> UnlocatedParseResult<VariableDefinition> {
    let Spanning {
        span: start_span, ..
    } = parser.expect(&Token::Dollar)?;
    let var_name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let var_type = parse_type(parser)?;

    let default_value = if parser.skip(&Token::Equals)?.is_some() {
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };

    let directives = parse_directives(parser)?;

    Ok(VariableDefinition {
        name: Spanning::start_end(start_span.start, var_name.span.end, var_name.item.into()),
        var_type,
        default_value,
        directives: directives.map(|s| s.item),
    })
}

fn parse_directives(
    parser: &mut Parser<'_>,
) -> OptionParseResult<Vec<Spanning<Directive>>> {
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

fn parse_directive(parser: &mut Parser<'_>) -> ParseResult<Directive> {
    let Spanning {
        span: start_span, ..
    } = parser.expect(&Token::At)?;
    let name = parser.expect_name()?;
    let arguments = parse_arguments(parser)?;

    Ok(Spanning::start_end(
        start_span.start,
        arguments.as_ref().map_or(name.span.end, |s| s.span.end),
        Directive {
            name: name.map(String::from),
            arguments,
        },
    ))
}

pub(crate) fn parse_type(parser: &mut Parser<'_>) -> ParseResult<Type> {
    let parsed_type = if let Some(Spanning {
        span: start_span, ..
    }) = parser.skip(&Token::BracketOpen)?
    {
        let inner_type = parse_type(parser)?;
        let Spanning { span: end_span, .. } = parser.expect(&Token::BracketClose)?;
        Spanning::start_end(
            start_span.start,
            end_span.end,
            Type::List(Box::new(inner_type.item)),
        )
    } else {
        parser.expect_name()?.map(|s| Type::Named(s.into()))
    };

    Ok(match parser.peek().item {
        Token::ExclamationMark => wrap_non_null(parser, parsed_type)?,
        _ => parsed_type,
    })
}

fn wrap_non_null(parser: &mut Parser<'_>, inner: Spanning<Type>) -> ParseResult<Type> {
    let Spanning { span: end_span, .. } = parser.expect(&Token::ExclamationMark)?;

    Ok(Spanning::start_end(
        inner.span.start,
        end_span.end,
        inner.item.wrap_non_null(),
    ))
}

//
// Type-system definitions.
//
// Only what SDL validation needs: definitions with descriptions, no
// extensions.
//

fn parse_type_system_definition(
    parser: &mut Parser<'_>,
) -> ParseResult<TypeSystemDefinition> {
    let description = parse_description(parser)?;
    let start_pos = description
        .as_ref()
        .map(|d| d.span.start)
        .unwrap_or(parser.peek().span.start);

    match &parser.peek().item {
        Token::Name("schema") => {
            let def = parse_schema_definition(parser, description)?;
            Ok(def.map(TypeSystemDefinition::Schema))
        }
        Token::Name("scalar") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let end = directives.as_ref().map_or(name.span.end, |d| d.span.end);
            Ok(Spanning::start_end(
                start_pos,
                end,
                TypeSystemDefinition::Scalar(ScalarTypeDefinition {
                    description,
                    name: name.map(String::from),
                    directives: directives.map(|d| d.item),
                }),
            ))
        }
        Token::Name("type") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let interfaces = parse_implements_interfaces(parser)?;
            let directives = parse_directives(parser)?;
            let fields = parse_fields_definition(parser)?;
            let end = fields
                .as_ref()
                .map(|f| f.span.end)
                .or_else(|| directives.as_ref().map(|d| d.span.end))
                .unwrap_or(name.span.end);
            Ok(Spanning::start_end(
                start_pos,
                end,
                TypeSystemDefinition::Object(ObjectTypeDefinition {
                    description,
                    name: name.map(String::from),
                    interfaces,
                    directives: directives.map(|d| d.item),
                    fields: fields.map(|f| f.item).unwrap_or_default(),
                }),
            ))
        }
        Token::Name("interface") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let interfaces = parse_implements_interfaces(parser)?;
            let directives = parse_directives(parser)?;
            let fields = parse_fields_definition(parser)?;
            let end = fields
                .as_ref()
                .map(|f| f.span.end)
                .or_else(|| directives.as_ref().map(|d| d.span.end))
                .unwrap_or(name.span.end);
            Ok(Spanning::start_end(
                start_pos,
                end,
                TypeSystemDefinition::Interface(InterfaceTypeDefinition {
                    description,
                    name: name.map(String::from),
                    interfaces,
                    directives: directives.map(|d| d.item),
                    fields: fields.map(|f| f.item).unwrap_or_default(),
                }),
            ))
        }
        Token::Name("union") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let members = parse_union_members(parser)?;
            let end = members
                .last()
                .map(|m| m.span.end)
                .or_else(|| directives.as_ref().map(|d| d.span.end))
                .unwrap_or(name.span.end);
            Ok(Spanning::start_end(
                start_pos,
                end,
                TypeSystemDefinition::Union(UnionTypeDefinition {
                    description,
                    name: name.map(String::from),
                    directives: directives.map(|d| d.item),
                    members,
                }),
            ))
        }
        Token::Name("enum") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let values = if parser.peek().item == Token::CurlyOpen {
                Some(parser.delimited_nonempty_list(
                    &Token::CurlyOpen,
                    parse_enum_value_definition,
                    &Token::CurlyClose,
                )?)
            } else {
                None
            };
            let end = values
                .as_ref()
                .map(|v| v.span.end)
                .or_else(|| directives.as_ref().map(|d| d.span.end))
                .unwrap_or(name.span.end);
            Ok(Spanning::start_end(
                start_pos,
                end,
                TypeSystemDefinition::Enum(EnumTypeDefinition {
                    description,
                    name: name.map(String::from),
                    directives: directives.map(|d| d.item),
                    values: values.map(|v| v.item).unwrap_or_default(),
                }),
            ))
        }
        Token::Name("input") => {
            parser.next_token()?;
            let name = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let fields = if parser.peek().item == Token::CurlyOpen {
                Some(parser.delimited_nonempty_list(
                    &Token::CurlyOpen,
                    parse_input_value_definition,
                    &Token::CurlyClose,
                )?)
            } else {
                None
            };
            let end = fields
                .as_ref()
                .map(|f| f.span.end)
                .or_else(|| directives.as_ref().map(|d| d.span.end))
                .unwrap_or(name.span.end);
            Ok(Spanning::start_end(
                start_pos,
                end,
                TypeSystemDefinition::InputObject(InputObjectTypeDefinition {
                    description,
                    name: name.map(String::from),
                    directives: directives.map(|d| d.item),
                    fields: fields.map(|f| f.item).unwrap_or_default(),
                }),
            ))
        }
        Token::Name("directive") => {
            let def = parse_directive_definition(parser, description, start_pos)?;
            Ok(def.map(TypeSystemDefinition::Directive))
        }
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_description(parser: &mut Parser<'_>) -> OptionParseResult<String> {
    match &parser.peek().item {
        Token::String(_) | Token::BlockString(_) => {
            let token = parser.next_token()?;
            Ok(Some(token.map(|t| match t {
                Token::String(s) | Token::BlockString(s) => s,
                _ => unreachable!("description token was checked above"),
            })))
        }
        _ => Ok(None),
    }
}

fn parse_schema_definition(
    parser: &mut Parser<'_>,
    description: Option<Spanning<String>>,
) -> ParseResult<SchemaDefinition> {
    let start_pos = description
        .as_ref()
        .map(|d| d.span.start)
        .unwrap_or(parser.peek().span.start);
    parser.expect(&Token::Name("schema"))?;
    let directives = parse_directives(parser)?;
    let operation_types = parser.delimited_nonempty_list(
        &Token::CurlyOpen,
        parse_root_operation_type_definition,
        &Token::CurlyClose,
    )?;

    Ok(Spanning::start_end(
        start_pos,
        operation_types.span.end,
        SchemaDefinition {
            description,
            directives: directives.map(|d| d.item),
            operation_types: operation_types.item,
        },
    ))
}

fn parse_root_operation_type_definition(
    parser: &mut Parser<'_>,
) -> ParseResult<RootOperationTypeDefinition> {
    let operation = parse_operation_type(parser)?;
    parser.expect(&Token::Colon)?;
    let named_type = parser.expect_name()?;

    Ok(Spanning::start_end(
        operation.span.start,
        named_type.span.end,
        RootOperationTypeDefinition {
            operation: operation.item,
            named_type: named_type.map(String::from),
        },
    ))
}

fn parse_implements_interfaces(
    parser: &mut Parser<'_>,
) -> Result<Vec<Spanning<String>>, Spanning<ParseError>> {
    let mut interfaces = Vec::new();

    if parser.peek().item == Token::Name("implements") {
        parser.next_token()?;
        if parser.peek().item == Token::Amp {
            parser.next_token()?;
        }
        interfaces.push(parser.expect_name()?.map(String::from));

        while parser.peek().item == Token::Amp {
            parser.next_token()?;
            interfaces.push(parser.expect_name()?.map(String::from));
        }
    }

    Ok(interfaces)
}

fn parse_fields_definition(
    parser: &mut Parser<'_>,
) -> OptionParseResult<Vec<Spanning<FieldDefinition>>> {
    if parser.peek().item != Token::CurlyOpen {
        return Ok(None);
    }
    Ok(Some(parser.delimited_nonempty_list(
        &Token::CurlyOpen,
        parse_field_definition,
        &Token::CurlyClose,
    )?))
}

fn parse_field_definition(parser: &mut Parser<'_>) -> ParseResult<FieldDefinition> {
    let description = parse_description(parser)?;
    let name = parser.expect_name()?;
    let start_pos = description
        .as_ref()
        .map(|d| d.span.start)
        .unwrap_or(name.span.start);

    let arguments = if parser.peek().item == Token::ParenOpen {
        parser
            .delimited_nonempty_list(
                &Token::ParenOpen,
                parse_input_value_definition,
                &Token::ParenClose,
            )?
            .item
    } else {
        Vec::new()
    };

    parser.expect(&Token::Colon)?;
    let field_type = parse_type(parser)?;
    let directives = parse_directives(parser)?;
    let end = directives
        .as_ref()
        .map_or(field_type.span.end, |d| d.span.end);

    Ok(Spanning::start_end(
        start_pos,
        end,
        FieldDefinition {
            description,
            name: name.map(String::from),
            arguments,
            field_type,
            directives: directives.map(|d| d.item),
        },
    ))
}

fn parse_input_value_definition(parser: &mut Parser<'_>) -> ParseResult<InputValueDefinition> {
    let description = parse_description(parser)?;
    let name = parser.expect_name()?;
    let start_pos = description
        .as_ref()
        .map(|d| d.span.start)
        .unwrap_or(name.span.start);

    parser.expect(&Token::Colon)?;
    let value_type = parse_type(parser)?;

    let default_value = if parser.skip(&Token::Equals)?.is_some() {
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };

    let directives = parse_directives(parser)?;
    let end = directives
        .as_ref()
        .map(|d| d.span.end)
        .or_else(|| default_value.as_ref().map(|v| v.span.end))
        .unwrap_or(value_type.span.end);

    Ok(Spanning::start_end(
        start_pos,
        end,
        InputValueDefinition {
            description,
            name: name.map(String::from),
            value_type,
            default_value,
            directives: directives.map(|d| d.item),
        },
    ))
}

fn parse_union_members(
    parser: &mut Parser<'_>,
) -> Result<Vec<Spanning<String>>, Spanning<ParseError>> {
    let mut members = Vec::new();

    if parser.peek().item == Token::Equals {
        parser.next_token()?;
        if parser.peek().item == Token::Pipe {
            parser.next_token()?;
        }
        members.push(parser.expect_name()?.map(String::from));

        while parser.peek().item == Token::Pipe {
            parser.next_token()?;
            members.push(parser.expect_name()?.map(String::from));
        }
    }

    Ok(members)
}

fn parse_enum_value_definition(parser: &mut Parser<'_>) -> ParseResult<EnumValueDefinition> {
    let description = parse_description(parser)?;
    let name = parser.expect_name()?;
    let start_pos = description
        .as_ref()
        .map(|d| d.span.start)
        .unwrap_or(name.span.start);
    let directives = parse_directives(parser)?;
    let end = directives.as_ref().map_or(name.span.end, |d| d.span.end);

    Ok(Spanning::start_end(
        start_pos,
        end,
        EnumValueDefinition {
            description,
            name: name.map(String::from),
            directives: directives.map(|d| d.item),
        },
    ))
}

fn parse_directive_definition(
    parser: &mut Parser<'_>,
    description: Option<Spanning<String>>,
    start_pos: SourcePosition,
) -> ParseResult<DirectiveDefinition> {
    parser.expect(&Token::Name("directive"))?;
    parser.expect(&Token::At)?;
    let name = parser.expect_name()?;

    let arguments = if parser.peek().item == Token::ParenOpen {
        parser
            .delimited_nonempty_list(
                &Token::ParenOpen,
                parse_input_value_definition,
                &Token::ParenClose,
            )?
            .item
    } else {
        Vec::new()
    };

    let repeatable = if parser.peek().item == Token::Name("repeatable") {
        parser.next_token()?;
        true
    } else {
        false
    };

    parser.expect(&Token::Name("on"))?;
    if parser.peek().item == Token::Pipe {
        parser.next_token()?;
    }
    let mut locations = vec![parser.expect_name()?.map(String::from)];
    while parser.peek().item == Token::Pipe {
        parser.next_token()?;
        locations.push(parser.expect_name()?.map(String::from));
    }

    Ok(Spanning::start_end(
        start_pos,
        locations.last().map(|l| l.span.end).unwrap_or(name.span.end),
        DirectiveDefinition {
            description,
            name: name.map(String::from),
            arguments,
            repeatable,
            locations,
        },
    ))
}
