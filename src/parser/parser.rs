use compact_str::{CompactString, format_compact};
use derive_more::with_trait::{Display, Error, From};

use crate::parser::{Lexer, LexerError, SourcePosition, Spanning, Token};

/// Error while parsing a GraphQL document
#[derive(Clone, Debug, Display, Eq, Error, From, PartialEq)]
pub enum ParseError {
    /// An unexpected token occurred in the source
    #[display("Unexpected \"{_0}\"")]
    #[from(ignore)]
    UnexpectedToken(#[error(not(source))] CompactString),

    /// The input source abruptly ended
    #[display("Unexpected end of input")]
    #[from(ignore)]
    UnexpectedEndOfFile,

    /// An error during tokenization occurred
    LexerError(LexerError),

    /// A value literal that cannot be represented, e.g. an unparseable float.
    #[display("Invalid value literal \"{_0}\"")]
    #[from(ignore)]
    InvalidLiteral(#[error(not(source))] CompactString),
}

impl ParseError {
    /// Creates a [`ParseError::UnexpectedToken`] out of the provided [`Token`].
    #[must_use]
    pub fn unexpected_token(token: Token<'_>) -> Self {
        Self::UnexpectedToken(format_compact!("{token}"))
    }
}

#[doc(hidden)]
pub type ParseResult<T> = Result<Spanning<T>, Spanning<ParseError>>;

#[doc(hidden)]
pub type UnlocatedParseResult<T> = Result<T, Spanning<ParseError>>;

#[doc(hidden)]
pub type OptionParseResult<T> = Result<Option<Spanning<T>>, Spanning<ParseError>>;

/// Token cursor over a fully lexed source.
///
/// The token list always ends with [`Token::EndOfFile`], which is never
/// consumed.
#[doc(hidden)]
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Spanning<Token<'a>>>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    #[doc(hidden)]
    pub fn new(lexer: &mut Lexer<'a>) -> Result<Parser<'a>, Spanning<LexerError>> {
        let tokens = lexer.collect::<Result<Vec<_>, _>>()?;

        Ok(Parser { tokens, cursor: 0 })
    }

    #[doc(hidden)]
    pub fn peek(&self) -> &Spanning<Token<'a>> {
        &self.tokens[self.cursor]
    }

    #[doc(hidden)]
    pub fn next_token(&mut self) -> ParseResult<Token<'a>> {
        let token = *self.peek();
        if token.item == Token::EndOfFile {
            Err(Spanning::new(token.span, ParseError::UnexpectedEndOfFile))
        } else {
            self.cursor += 1;
            Ok(token)
        }
    }

    /// End position of the last consumed token.
    #[doc(hidden)]
    pub fn prev_end(&self) -> SourcePosition {
        self.cursor
            .checked_sub(1)
            .map_or(self.peek().span.start, |i| self.tokens[i].span.end)
    }

    /// Returns an error describing the next token as unexpected.
    #[doc(hidden)]
    pub fn unexpected(&mut self) -> Spanning<ParseError> {
        match self.next_token() {
            Ok(token) => token.map(ParseError::unexpected_token),
            Err(e) => e,
        }
    }

    #[doc(hidden)]
    pub fn expect(&mut self, expected: &Token) -> ParseResult<Token<'a>> {
        if &self.peek().item != expected {
            Err(self.unexpected())
        } else {
            self.next_token()
        }
    }

    #[doc(hidden)]
    pub fn skip(
        &mut self,
        expected: &Token,
    ) -> Result<Option<Spanning<Token<'a>>>, Spanning<ParseError>> {
        if &self.peek().item == expected {
            Ok(Some(self.next_token()?))
        } else if self.peek().item == Token::EndOfFile {
            Err(Spanning::zero_width(
                &self.peek().span.start,
                ParseError::UnexpectedEndOfFile,
            ))
        } else {
            Ok(None)
        }
    }

    /// Consumes the next token if it is the given keyword.
    #[doc(hidden)]
    pub fn skip_keyword(&mut self, keyword: &str) -> OptionParseResult<Token<'a>> {
        if self.peek().item == Token::Name(keyword) {
            Ok(Some(self.next_token()?))
        } else {
            Ok(None)
        }
    }

    /// Parses `opening item* closing`.
    #[doc(hidden)]
    pub fn delimited_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<Spanning<T>>>
    where
        F: Fn(&mut Parser<'a>) -> ParseResult<T>,
    {
        let start = self.expect(opening)?.span.start;
        let mut items = Vec::new();
        let end = loop {
            if let Some(close) = self.skip(closing)? {
                break close.end();
            }
            items.push(parser(self)?);
        };
        Ok(Spanning::start_end(&start, &end, items))
    }

    /// Parses `opening item+ closing`.
    #[doc(hidden)]
    pub fn delimited_nonempty_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<Spanning<T>>>
    where
        F: Fn(&mut Parser<'a>) -> ParseResult<T>,
    {
        self.nonempty_list(opening, parser, closing)
    }

    /// Like [`Parser::delimited_nonempty_list()`], for items which carry no
    /// span of their own.
    #[doc(hidden)]
    pub fn unlocated_delimited_nonempty_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<T>>
    where
        F: Fn(&mut Parser<'a>) -> UnlocatedParseResult<T>,
    {
        self.nonempty_list(opening, parser, closing)
    }

    fn nonempty_list<T>(
        &mut self,
        opening: &Token,
        parser: impl Fn(&mut Parser<'a>) -> Result<T, Spanning<ParseError>>,
        closing: &Token,
    ) -> ParseResult<Vec<T>> {
        let start = self.expect(opening)?.span.start;
        let mut items = vec![parser(self)?];
        let end = loop {
            if let Some(close) = self.skip(closing)? {
                break close.end();
            }
            items.push(parser(self)?);
        };
        Ok(Spanning::start_end(&start, &end, items))
    }

    #[doc(hidden)]
    pub fn expect_name(&mut self) -> ParseResult<&'a str> {
        match *self.peek() {
            Spanning {
                item: Token::Name(name),
                span,
            } => {
                self.cursor += 1;
                Ok(Spanning::new(span, name))
            }
            Spanning {
                item: Token::EndOfFile,
                span,
            } => Err(Spanning::new(span, ParseError::UnexpectedEndOfFile)),
            _ => Err(self.unexpected()),
        }
    }
}
