//! CDL tokenizer.
//!
//! The lexer is a pull-based token stream: each call to `next` scans just
//! far enough to produce one token. The stream ends with exactly one
//! terminator, either [`TokenKind::Empty`] at end of input or the first
//! lexical error. Tokens already handed out are never affected by an
//! error found later.

use crate::error::{NcError, Result};
use crate::types::NcType;
use std::fmt;

/// Kind and payload of a CDL token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Name of a file, dimension, variable or attribute.
    Name(String),
    /// One of `byte char short int float double`.
    VarType(NcType),
    /// `netcdf`
    Netcdf,
    /// `dimensions`
    Dimensions,
    /// `variables`
    Variables,
    /// `data`
    Data,
    /// `UNLIMITED`
    Unlimited,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `=`
    Equal,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// Integer literal with an optional type suffix.
    Int { value: i64, suffix: Option<NcType> },
    /// Decimal literal with an optional type suffix.
    Decimal { value: f64, suffix: Option<NcType> },
    /// Double-quoted string, without the quotes.
    Str(String),
    /// End of input.
    Empty,
}

impl TokenKind {
    /// Source text of a keyword token.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            TokenKind::VarType(t) => Some(t.cdl_name()),
            TokenKind::Netcdf => Some("netcdf"),
            TokenKind::Dimensions => Some("dimensions"),
            TokenKind::Variables => Some("variables"),
            TokenKind::Data => Some("data"),
            TokenKind::Unlimited => Some("UNLIMITED"),
            _ => None,
        }
    }

    /// True for the keywords that open a section of a CDL program.
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            TokenKind::Dimensions | TokenKind::Variables | TokenKind::Data
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Name(name) => write!(f, "name `{name}`"),
            TokenKind::VarType(t) => write!(f, "type `{}`", t.cdl_name()),
            TokenKind::Netcdf => f.write_str("`netcdf`"),
            TokenKind::Dimensions => f.write_str("`dimensions`"),
            TokenKind::Variables => f.write_str("`variables`"),
            TokenKind::Data => f.write_str("`data`"),
            TokenKind::Unlimited => f.write_str("`UNLIMITED`"),
            TokenKind::LBrace => f.write_str("`{`"),
            TokenKind::RBrace => f.write_str("`}`"),
            TokenKind::LParen => f.write_str("`(`"),
            TokenKind::RParen => f.write_str("`)`"),
            TokenKind::Equal => f.write_str("`=`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Semicolon => f.write_str("`;`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::Int { value, .. } => write!(f, "integer `{value}`"),
            TokenKind::Decimal { value, .. } => write!(f, "decimal `{value}`"),
            TokenKind::Str(s) => write!(f, "string \"{s}\""),
            TokenKind::Empty => f.write_str("end of input"),
        }
    }
}

/// A token and the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
}

/// Scanner over CDL source text.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            done: false,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>, line: usize, column: usize) -> NcError {
        NcError::Lexical {
            message: message.into(),
            line,
            column,
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else if ch == '/' {
                let (line, column) = (self.line, self.column);
                self.next_char();
                if self.peek_char() != Some('/') {
                    return Err(self.error("unexpected char `/`", line, column));
                }
                while let Some(ch) = self.next_char() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn read_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | '+' | '@') {
                self.next_char();
            } else {
                break;
            }
        }

        let word = &self.input[start..self.pos];
        if let Some(kind) = non_finite(word) {
            return kind;
        }
        if let Some(t) = NcType::from_cdl_name(word) {
            return TokenKind::VarType(t);
        }
        match word {
            "netcdf" => TokenKind::Netcdf,
            "dimensions" => TokenKind::Dimensions,
            "variables" => TokenKind::Variables,
            "data" => TokenKind::Data,
            "UNLIMITED" => TokenKind::Unlimited,
            _ => TokenKind::Name(word.to_string()),
        }
    }

    fn read_number(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        let start = self.pos;
        let mut is_decimal = false;

        if self.peek_char() == Some('-') {
            self.next_char();
        }

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.next_char();
            } else if ch == '.' {
                if is_decimal {
                    return Err(self.error("unexpected dot", self.line, self.column));
                }
                is_decimal = true;
                self.next_char();
            } else {
                break;
            }
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_decimal = true;
            self.next_char();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.next_char();
            }
            if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("malformed exponent", line, column));
            }
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.next_char();
            }
        }

        let text = &self.input[start..self.pos];
        let suffix = match (self.peek_char(), is_decimal) {
            (Some('b' | 'B'), false) => Some(NcType::Byte),
            (Some('s' | 'S'), false) => Some(NcType::Short),
            (Some('l' | 'L'), false) => Some(NcType::Int),
            (Some('f' | 'F'), _) => Some(NcType::Float),
            (Some('d' | 'D'), _) => Some(NcType::Double),
            _ => None,
        };
        if suffix.is_some() {
            self.next_char();
        }
        if self
            .peek_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            return Err(self.error(format!("malformed number `{text}`"), line, column));
        }

        let as_decimal = is_decimal || matches!(suffix, Some(NcType::Float | NcType::Double));
        if as_decimal {
            let value = text
                .parse::<f64>()
                .map_err(|_| self.error(format!("malformed number `{text}`"), line, column))?;
            Ok(TokenKind::Decimal { value, suffix })
        } else {
            let value = text
                .parse::<i64>()
                .map_err(|_| self.error(format!("integer `{text}` out of range"), line, column))?;
            Ok(TokenKind::Int { value, suffix })
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        self.next_char(); // opening quote
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch == '"' {
                let text = self.input[start..self.pos].to_string();
                self.next_char();
                return Ok(TokenKind::Str(text));
            }
            self.next_char();
        }
        Err(self.error("unclosed string", line, column))
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        let (line, column) = (self.line, self.column);
        let token = |kind| Token { kind, line, column };

        let ch = match self.peek_char() {
            Some(c) => c,
            None => return Ok(token(TokenKind::Empty)),
        };

        let kind = match ch {
            '"' => self.read_string(line, column)?,
            '-' if self.input[self.pos + 1..].starts_with("Infinity") => {
                self.next_char();
                match self.read_identifier() {
                    TokenKind::Decimal { value, suffix } => TokenKind::Decimal {
                        value: -value,
                        suffix,
                    },
                    _ => return Err(self.error("unexpected char `-`", line, column)),
                }
            }
            '-' | '0'..='9' => {
                if ch == '-' && !self.input[self.pos + 1..].starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(self.error("unexpected char `-`", line, column));
                }
                self.read_number(line, column)?
            }
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            _ => {
                let kind = match ch {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '=' => TokenKind::Equal,
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    other => {
                        return Err(self.error(format!("unexpected char `{other}`"), line, column))
                    }
                };
                self.next_char();
                kind
            }
        };
        Ok(token(kind))
    }
}

/// `NaN` and `Infinity`, with an optional `f` or `d` suffix.
fn non_finite(word: &str) -> Option<TokenKind> {
    let (body, suffix) = match word.strip_suffix('f') {
        Some(body) => (body, Some(NcType::Float)),
        None => match word.strip_suffix('d') {
            Some(body) => (body, Some(NcType::Double)),
            None => (word, None),
        },
    };
    let value = match body {
        "NaN" => f64::NAN,
        "Infinity" => f64::INFINITY,
        _ => return None,
    };
    Some(TokenKind::Decimal { value, suffix })
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_token();
        match &item {
            Ok(Token {
                kind: TokenKind::Empty,
                ..
            })
            | Err(_) => self.done = true,
            Ok(_) => {}
        }
        Some(item)
    }
}
