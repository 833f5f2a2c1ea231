//! Lexer/tokenizer for declaration source.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::satisfy,
    combinator::recognize,
    sequence::pair,
    IResult,
};

use mvgen_core::{ParseError, Span};

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Punct,
    Str,
    Char,
    Number,
}

/// A token with its source text and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text; verbatim identifiers have their `@` removed
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    pub fn is_ident(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }
}

/// Parse an identifier (starts with letter/underscore, followed by alphanumeric/underscore).
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse a numeric literal, including suffixes and hex/binary forms.
pub fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    ))(input)
}

/// Parse a punctuation token. `::` and `=>` are the only multi-character ones
/// the grammar cares about; `>>` stays two tokens so generic lists close cleanly.
pub fn punctuation(input: &str) -> IResult<&str, &str> {
    alt((
        tag("::"),
        tag("=>"),
        recognize(satisfy(|c: char| "{}[]()<>,;:.=?!~+-*/%&|^@#$".contains(c))),
    ))(input)
}

/// Whether only indentation precedes `offset` on its line.
fn only_whitespace_before(input: &str, offset: usize) -> bool {
    input[..offset]
        .chars()
        .rev()
        .take_while(|&c| c != '\n')
        .all(|c| c == ' ' || c == '\t' || c == '\r')
}

/// Cursor over the source that tracks line and column.
struct Cursor<'a> {
    input: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0, line: 1, column: 1 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn advance(&mut self, len: usize) {
        for c in self.input[self.offset..self.offset + len].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += len;
    }

    fn span(&self, start: usize, line: u32, column: u32) -> Span {
        Span { start, end: self.offset, line, column }
    }

    /// Skip whitespace, comments and preprocessor lines.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            if trimmed.len() != rest.len() {
                self.advance(rest.len() - trimmed.len());
                continue;
            }
            if rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.advance(len);
                continue;
            }
            if rest.starts_with("/*") {
                let Some(end) = rest[2..].find("*/") else {
                    return Err(ParseError::UnterminatedComment { line: self.line });
                };
                self.advance(end + 4);
                continue;
            }
            if rest.starts_with('#') && only_whitespace_before(self.input, self.offset) {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.advance(len);
                continue;
            }
            return Ok(());
        }
    }
}

/// Length of a string literal at the start of `input`, prefix included.
///
/// Handles regular (`"..."`), verbatim (`@"..."`) and interpolated (`$"..."`)
/// forms. Returns `None` if the literal is not terminated.
fn string_literal_len(input: &str) -> Option<usize> {
    let prefix_len = input.find('"')?;
    let prefix = &input[..prefix_len];
    let verbatim = prefix.contains('@');
    let body = &input[prefix_len + 1..];
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if !verbatim => {
                chars.next();
            }
            '"' if verbatim => {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                } else {
                    return Some(prefix_len + 1 + i + 1);
                }
            }
            '"' => return Some(prefix_len + 1 + i + 1),
            '\n' if !verbatim => return None,
            _ => {}
        }
    }
    None
}

/// Length of a character literal at the start of `input`.
fn char_literal_len(input: &str) -> Option<usize> {
    let body = &input[1..];
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\'' => return Some(i + 2),
            '\n' => return None,
            _ => {}
        }
    }
    None
}

fn is_string_start(rest: &str) -> bool {
    rest.starts_with('"')
        || rest.starts_with("@\"")
        || rest.starts_with("$\"")
        || rest.starts_with("$@\"")
        || rest.starts_with("@$\"")
}

/// Split source text into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut tokens = Vec::new();

    loop {
        cursor.skip_trivia()?;
        let rest = cursor.rest();
        if rest.is_empty() {
            break;
        }

        let start = cursor.offset;
        let (line, column) = (cursor.line, cursor.column);

        if is_string_start(rest) {
            let len = string_literal_len(rest).ok_or(ParseError::UnterminatedString { line })?;
            cursor.advance(len);
            tokens.push(Token {
                kind: TokenKind::Str,
                text: &input[start..cursor.offset],
                span: cursor.span(start, line, column),
            });
            continue;
        }

        if rest.starts_with('\'') {
            let len = char_literal_len(rest).ok_or(ParseError::UnterminatedString { line })?;
            cursor.advance(len);
            tokens.push(Token {
                kind: TokenKind::Char,
                text: &input[start..cursor.offset],
                span: cursor.span(start, line, column),
            });
            continue;
        }

        if let Some(after_at) = rest.strip_prefix('@') {
            if let Ok((_, ident)) = identifier(after_at) {
                cursor.advance(1 + ident.len());
                tokens.push(Token {
                    kind: TokenKind::Ident,
                    text: ident,
                    span: cursor.span(start, line, column),
                });
                continue;
            }
        }

        if let Ok((_, ident)) = identifier(rest) {
            cursor.advance(ident.len());
            tokens.push(Token {
                kind: TokenKind::Ident,
                text: ident,
                span: cursor.span(start, line, column),
            });
            continue;
        }

        if let Ok((_, num)) = number(rest) {
            cursor.advance(num.len());
            tokens.push(Token {
                kind: TokenKind::Number,
                text: num,
                span: cursor.span(start, line, column),
            });
            continue;
        }

        if let Ok((_, punct)) = punctuation(rest) {
            cursor.advance(punct.len());
            tokens.push(Token {
                kind: TokenKind::Punct,
                text: punct,
                span: cursor.span(start, line, column),
            });
            continue;
        }

        let found = rest.chars().next().ok_or(ParseError::UnexpectedEof)?;
        return Err(ParseError::InvalidCharacter { found, line, column });
    }

    Ok(tokens)
}
