//! Lexing and parsing of request documents.

mod document;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;
mod source;
mod utils;
mod value;

#[cfg(test)]
mod tests;

pub use self::{
    document::parse_document_source,
    lexer::{Lexer, LexerError, Token},
    parser::{OptionParseResult, ParseError, ParseResult, Parser, UnlocatedParseResult},
    source::{Source, SourceLocation},
    utils::{SourcePosition, Span, Spanning},
};

use crate::ast::{Document, InputValue, Type};

/// Parses a request document.
pub fn parse(source: &str) -> Result<Document, Spanning<ParseError>> {
    parse_document_source(source)
}

/// Parses an isolated input value production, e.g. `{a: [1, 2]}`.
///
/// Variable references are allowed inside the value.
pub fn parse_value(source: &str) -> Result<Spanning<InputValue>, Spanning<ParseError>> {
    let mut lexer = Lexer::new(source);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    let value = value::parse_value_literal(&mut parser, false)?;
    expect_eof(&parser)?;
    Ok(value)
}

/// Parses an isolated type reference production, e.g. `[User!]!`.
pub fn parse_type(source: &str) -> Result<Spanning<Type>, Spanning<ParseError>> {
    let mut lexer = Lexer::new(source);
    let mut parser = Parser::new(&mut lexer).map_err(|s| s.map(ParseError::LexerError))?;
    let ty = document::parse_type(&mut parser)?;
    expect_eof(&parser)?;
    Ok(ty)
}

fn expect_eof(parser: &Parser<'_>) -> Result<(), Spanning<ParseError>> {
    let next = parser.peek();
    if next.item == Token::EndOfFile {
        Ok(())
    } else {
        Err(Spanning::new(
            next.span,
            ParseError::unexpected_token(next.item.clone()),
        ))
    }
}
