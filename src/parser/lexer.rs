use std::ops::Deref;

use derive_more::with_trait::{Display, Error};

use crate::parser::{SourcePosition, Spanning};

const BLOCK_QUOTE: &str = "\"\"\"";

/// Tokenizer over a GraphQL source text.
///
/// Yields tokens until (and including) a single [`Token::EndOfFile`]. Positions
/// count characters, not bytes.
#[doc(hidden)]
#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset of the next unread character.
    offset: usize,
    position: SourcePosition,
    done: bool,
}

/// Raw scalar value literal, as it was written in the source.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ScalarToken<'a> {
    String(StringLiteral<'a>),
    Float(&'a str),
    Int(&'a str),
}

/// Raw [String Value] literal, with its quotes included.
///
/// [String Value]: https://spec.graphql.org/October2021#sec-String-Value
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StringLiteral<'a> {
    /// Literal in single quotes `"`.
    Quoted(&'a str),

    /// Literal in triple quotes `"""`.
    Block(&'a str),
}

impl Deref for StringLiteral<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Quoted(s) | Self::Block(s) => s,
        }
    }
}

/// A single token in the input source
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Token<'a> {
    Name(&'a str),
    Scalar(ScalarToken<'a>),
    #[display("!")]
    ExclamationMark,
    #[display("$")]
    Dollar,
    #[display("&")]
    Amp,
    #[display("(")]
    ParenOpen,
    #[display(")")]
    ParenClose,
    #[display("[")]
    BracketOpen,
    #[display("]")]
    BracketClose,
    #[display("{{")]
    CurlyOpen,
    #[display("}}")]
    CurlyClose,
    #[display("...")]
    Ellipsis,
    #[display(":")]
    Colon,
    #[display("=")]
    Equals,
    #[display("@")]
    At,
    #[display("|")]
    Pipe,
    #[display("End of file")]
    EndOfFile,
}

/// Error when tokenizing the input source
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum LexerError {
    /// A character that occurs nowhere in the GraphQL language, such as `?`.
    #[display("Unknown character \"{_0}\"")]
    UnknownCharacter(#[error(not(source))] char),

    /// A known character at a position where it cannot appear.
    #[display("Unexpected character \"{_0}\"")]
    UnexpectedCharacter(#[error(not(source))] char),

    /// A quoted string literal without its closing `"`, or broken by a line
    /// break.
    #[display("Unterminated string literal")]
    UnterminatedString,

    /// A block string literal without its closing `"""`.
    #[display("Unterminated block string literal")]
    UnterminatedBlockString,

    /// A control character inside a string literal.
    #[display("Unknown character \"{_0}\" in string literal")]
    UnknownCharacterInString(#[error(not(source))] char),

    /// An escape sequence other than the ones GraphQL defines, e.g. `"\l"`.
    #[display("Unknown escape sequence \"{_0}\" in string")]
    UnknownEscapeSequence(#[error(not(source))] String),

    /// The source ended in the middle of a token, e.g. `"1."`.
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,

    /// An invalid number literal was found
    #[display("Invalid number literal")]
    InvalidNumber,
}

pub type LexerResult<'a> = Result<Spanning<Token<'a>>, Spanning<LexerError>>;

impl<'a> Lexer<'a> {
    #[doc(hidden)]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            position: SourcePosition::new_origin(),
            done: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn consumed_since(&self, from: usize) -> &'a str {
        &self.source[from..self.offset]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.position.advance_line();
        } else {
            self.position.advance_col();
        }
        Some(ch)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn error_here(&self, err: LexerError) -> Spanning<LexerError> {
        Spanning::zero_width(&self.position, err)
    }

    /// Whitespace, line terminators, commas, the BOM and comments.
    fn skip_ignored(&mut self) {
        loop {
            match self.peek() {
                Some('\t' | ' ' | '\n' | '\r' | ',' | '\u{feff}') => {
                    self.bump();
                }
                Some('#') => self.bump_while(|c| c != '\n' && c != '\r'),
                _ => break,
            }
        }
    }

    fn scan_punctuator(&mut self, token: Token<'a>) -> LexerResult<'a> {
        let start = self.position;
        self.bump();
        Ok(Spanning::single_width(&start, token))
    }

    fn scan_ellipsis(&mut self) -> LexerResult<'a> {
        let start = self.position;
        for _ in 0..3 {
            match self.bump() {
                Some('.') => {}
                Some(_) => {
                    return Err(Spanning::zero_width(
                        &start,
                        LexerError::UnexpectedCharacter('.'),
                    ));
                }
                None => return Err(self.error_here(LexerError::UnexpectedEndOfFile)),
            }
        }
        Ok(Spanning::start_end(&start, &self.position, Token::Ellipsis))
    }

    fn scan_name(&mut self) -> LexerResult<'a> {
        let (start, from) = (self.position, self.offset);
        self.bump();
        self.bump_while(is_name_cont);
        Ok(Spanning::start_end(
            &start,
            &self.position,
            Token::Name(self.consumed_since(from)),
        ))
    }

    fn scan_quoted_string(&mut self) -> LexerResult<'a> {
        let (start, from) = (self.position, self.offset);
        self.bump();

        loop {
            let at = self.position;
            match self.bump() {
                Some('"') => break,
                Some('\\') => self.scan_escape()?,
                Some('\n' | '\r') => {
                    return Err(Spanning::zero_width(&at, LexerError::UnterminatedString));
                }
                Some(c) if !is_source_char(c) => {
                    return Err(Spanning::zero_width(
                        &at,
                        LexerError::UnknownCharacterInString(c),
                    ));
                }
                Some(_) => {}
                None => return Err(self.error_here(LexerError::UnterminatedString)),
            }
        }

        let literal = StringLiteral::Quoted(self.consumed_since(from));
        Ok(Spanning::start_end(
            &start,
            &self.position,
            Token::Scalar(ScalarToken::String(literal)),
        ))
    }

    /// Checks the escape sequence following an already consumed `\`.
    fn scan_escape(&mut self) -> Result<(), Spanning<LexerError>> {
        let at = self.position;
        match self.bump() {
            Some('b' | 'f' | 'n' | 'r' | 't' | '\\' | '/' | '"') => Ok(()),
            Some('u') => self.scan_unicode_escape(at),
            Some(c) => Err(Spanning::zero_width(
                &at,
                LexerError::UnknownEscapeSequence(format!("\\{c}")),
            )),
            None => Err(self.error_here(LexerError::UnterminatedString)),
        }
    }

    fn scan_unicode_escape(&mut self, at: SourcePosition) -> Result<(), Spanning<LexerError>> {
        let from = self.offset;
        let len = self
            .rest()
            .chars()
            .take(4)
            .take_while(char::is_ascii_alphanumeric)
            .count();
        self.bump_n(len);

        if len < 4 && self.peek().is_none() {
            return Err(self.error_here(LexerError::UnterminatedString));
        }

        let escape = self.consumed_since(from);
        let invalid = || {
            Spanning::zero_width(
                &at,
                LexerError::UnknownEscapeSequence(format!("\\u{escape}")),
            )
        };
        if len < 4 {
            return Err(invalid());
        }
        u32::from_str_radix(escape, 16)
            .ok()
            .and_then(char::from_u32)
            .map(drop)
            .ok_or_else(invalid)
    }

    /// Scans a `"""` literal. Only `\"""` is an escape sequence inside of it.
    fn scan_block_string(&mut self) -> LexerResult<'a> {
        let (start, from) = (self.position, self.offset);
        self.bump_n(BLOCK_QUOTE.len());

        loop {
            let rest = self.rest();
            if rest.starts_with(BLOCK_QUOTE) {
                self.bump_n(BLOCK_QUOTE.len());
                break;
            }
            if rest.starts_with("\\\"\"\"") {
                self.bump_n(BLOCK_QUOTE.len() + 1);
                continue;
            }

            let at = self.position;
            match self.bump() {
                Some(c) if !is_source_char(c) => {
                    return Err(Spanning::zero_width(
                        &at,
                        LexerError::UnknownCharacterInString(c),
                    ));
                }
                Some(_) => {}
                None => return Err(self.error_here(LexerError::UnterminatedBlockString)),
            }
        }

        let literal = StringLiteral::Block(self.consumed_since(from));
        Ok(Spanning::start_end(
            &start,
            &self.position,
            Token::Scalar(ScalarToken::String(literal)),
        ))
    }

    fn expect_digit(&mut self) -> Result<char, Spanning<LexerError>> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                self.bump();
                Ok(c)
            }
            Some(c) => Err(self.error_here(LexerError::UnexpectedCharacter(c))),
            None => Err(self.error_here(LexerError::UnexpectedEndOfFile)),
        }
    }

    fn scan_digits(&mut self) -> Result<(), Spanning<LexerError>> {
        self.expect_digit()?;
        self.bump_while(|c| c.is_ascii_digit());
        Ok(())
    }

    fn scan_number(&mut self) -> LexerResult<'a> {
        let (start, from) = (self.position, self.offset);

        if self.peek() == Some('-') {
            self.bump();
        }
        if self.expect_digit()? == '0' {
            if let Some(c) = self.peek().filter(char::is_ascii_digit) {
                return Err(self.error_here(LexerError::UnexpectedCharacter(c)));
            }
        } else {
            self.bump_while(|c| c.is_ascii_digit());
        }

        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.scan_digits()?;
        }
        if let Some('e' | 'E') = self.peek() {
            is_float = true;
            self.bump();
            if let Some('+' | '-') = self.peek() {
                self.bump();
            }
            self.scan_digits()?;
        }

        if self.peek().is_some_and(|c| c == '.' || is_name_start(c)) {
            return Err(self.error_here(LexerError::InvalidNumber));
        }

        let number = self.consumed_since(from);
        let token = if is_float {
            ScalarToken::Float(number)
        } else {
            ScalarToken::Int(number)
        };
        Ok(Spanning::start_end(&start, &self.position, Token::Scalar(token)))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexerResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.skip_ignored();

        let Some(ch) = self.peek() else {
            self.done = true;
            return Some(Ok(Spanning::zero_width(&self.position, Token::EndOfFile)));
        };

        Some(match ch {
            '.' => self.scan_ellipsis(),
            '"' if self.rest().starts_with(BLOCK_QUOTE) => self.scan_block_string(),
            '"' => self.scan_quoted_string(),
            '-' | '0'..='9' => self.scan_number(),
            c if is_name_start(c) => self.scan_name(),
            c => match punctuator(c) {
                Some(token) => self.scan_punctuator(token),
                None => Err(self.error_here(LexerError::UnknownCharacter(c))),
            },
        })
    }
}

fn punctuator(c: char) -> Option<Token<'static>> {
    Some(match c {
        '!' => Token::ExclamationMark,
        '$' => Token::Dollar,
        '&' => Token::Amp,
        '(' => Token::ParenOpen,
        ')' => Token::ParenClose,
        '[' => Token::BracketOpen,
        ']' => Token::BracketClose,
        '{' => Token::CurlyOpen,
        '}' => Token::CurlyClose,
        ':' => Token::Colon,
        '=' => Token::Equals,
        '@' => Token::At,
        '|' => Token::Pipe,
        _ => return None,
    })
}

fn is_source_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || c >= ' '
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_cont(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}
