//! Document parser and language utilities
#![expect(clippy::module_inception, reason = "mirrors the crate layout")]

mod document;
mod lexer;
mod parser;
mod utils;
mod value;

#[cfg(test)]
mod tests;

pub use self::{
    document::{parse_document_source, parse_type, parse_type_source, parse_value_source},
    lexer::{Lexer, LexerError, ScalarToken, StringLiteral, Token},
    parser::{OptionParseResult, ParseError, ParseResult, Parser, UnlocatedParseResult},
    utils::{SourcePosition, Span, Spanning},
};
