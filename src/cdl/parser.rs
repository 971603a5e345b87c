//! Recursive-descent parser from CDL tokens to an [`NcFile`].

use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{NcError, Result};
use crate::model::{AttrValue, Attribute, NcFile, Variable};
use crate::types::NcType;

/// Where a parsed attribute goes.
enum Target {
    Global,
    Variable(String),
}

/// A literal of an attribute value list, before a common type is chosen.
#[derive(Debug)]
enum Literal {
    Int(i64, Option<NcType>),
    Decimal(f64, Option<NcType>),
    Str(String),
}

/// CDL parser over any token stream.
#[derive(Debug)]
pub struct Parser<I> {
    tokens: I,
    peeked: Option<Token>,
    last: Token,
}

impl<'a> Parser<Lexer<'a>> {
    /// Parser reading tokens straight from `source`.
    pub fn from_source(source: &'a str) -> Self {
        Self::new(Lexer::new(source))
    }
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token>>,
{
    /// Create a parser consuming `tokens`.
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            peeked: None,
            last: Token {
                kind: TokenKind::Empty,
                line: 1,
                column: 1,
            },
        }
    }

    /// Parse a complete `netcdf name { ... }` program.
    pub fn parse(mut self) -> Result<NcFile> {
        let mut file = NcFile::new();

        self.expect(|k| matches!(k, TokenKind::Netcdf), "`netcdf`")?;
        self.expect_name("file name")?;
        self.expect(|k| matches!(k, TokenKind::LBrace), "`{`")?;

        loop {
            match &self.peek()?.kind {
                TokenKind::Dimensions => self.parse_dimensions(&mut file)?,
                TokenKind::Variables => self.parse_variables(&mut file)?,
                TokenKind::Data => self.skip_data()?,
                _ => break,
            }
        }

        self.expect(|k| matches!(k, TokenKind::RBrace), "`}`")?;
        self.expect(|k| matches!(k, TokenKind::Empty), "end of input")?;

        tracing::debug!(
            dimensions = file.dimensions.len(),
            variables = file.vars.len(),
            attributes = file.attrs.len(),
            "parsed CDL"
        );
        Ok(file)
    }

    fn next_token(&mut self) -> Result<Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            // A drained stream keeps answering with its terminator.
            None => self.tokens.next().transpose()?.unwrap_or_else(|| Token {
                kind: TokenKind::Empty,
                ..self.last.clone()
            }),
        };
        self.last = token.clone();
        Ok(token)
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            let token = self.next_token()?;
            self.peeked = Some(token);
        }
        Ok(self.peeked.as_ref().unwrap_or(&self.last))
    }

    fn syntax_error(expected: &str, found: &Token) -> NcError {
        NcError::Syntax {
            expected: expected.to_string(),
            found: found.kind.to_string(),
            line: found.line,
            column: found.column,
        }
    }

    fn expect(&mut self, accept: impl Fn(&TokenKind) -> bool, expected: &str) -> Result<Token> {
        let token = self.next_token()?;
        if accept(&token.kind) {
            Ok(token)
        } else {
            Err(Self::syntax_error(expected, &token))
        }
    }

    fn expect_name(&mut self, expected: &str) -> Result<String> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Name(name) => Ok(name),
            _ => Err(Self::syntax_error(expected, &token)),
        }
    }

    /// Attribute names follow a `:`, so keywords are plain names there.
    fn expect_attribute_name(&mut self) -> Result<String> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Name(name) => Ok(name),
            ref kind => kind
                .keyword()
                .map(str::to_string)
                .ok_or_else(|| Self::syntax_error("attribute name", &token)),
        }
    }

        /// True when the next token ends the current section.
    fn at_section_end(&mut self) -> Result<bool> {
        let kind = &self.peek()?.kind;
        Ok(kind.is_section() || matches!(kind, TokenKind::RBrace | TokenKind::Empty))
    }

    fn parse_dimensions(&mut self, file: &mut NcFile) -> Result<()> {
        self.next_token()?;
        self.expect(|k| matches!(k, TokenKind::Colon), "`:`")?;

        while !self.at_section_end()? {
            loop {
                let name = self.expect_name("dimension name")?;
                self.expect(|k| matches!(k, TokenKind::Equal), "`=`")?;
                let len = self.dimension_length()?;
                file.add_dimension(name, len);

                let sep = self.expect(
                    |k| matches!(k, TokenKind::Comma | TokenKind::Semicolon),
                    "`,` or `;`",
                )?;
                if sep.kind == TokenKind::Semicolon {
                    break;
                }
            }
        }
        Ok(())
    }

    fn dimension_length(&mut self) -> Result<u32> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Unlimited => Ok(0),
            TokenKind::Int { value, .. } => u32::try_from(value)
                .map_err(|_| NcError::UnsupportedValue(format!("dimension length {value}"))),
            _ => Err(Self::syntax_error("dimension length", &token)),
        }
    }

    fn parse_variables(&mut self, file: &mut NcFile) -> Result<()> {
        self.next_token()?;
        self.expect(|k| matches!(k, TokenKind::Colon), "`:`")?;

        while !self.at_section_end()? {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::VarType(nc_type) => self.parse_declaration(file, nc_type)?,
                TokenKind::Name(name) => {
                    self.expect(|k| matches!(k, TokenKind::Colon), "`:`")?;
                    if !file.vars.contains_key(&name) {
                        return Err(NcError::unknown_variable(name));
                    }
                    self.parse_attribute(file, Target::Variable(name))?;
                }
                TokenKind::Colon => self.parse_attribute(file, Target::Global)?,
                _ => {
                    return Err(Self::syntax_error(
                        "variable declaration or attribute",
                        &token,
                    ))
                }
            }
        }
        Ok(())
    }

    fn parse_declaration(&mut self, file: &mut NcFile, nc_type: NcType) -> Result<()> {
        let name = self.expect_name("variable name")?;

        let mut dim_names = Vec::new();
        let open = self.expect(
            |k| matches!(k, TokenKind::LParen | TokenKind::Semicolon),
            "dimension list",
        )?;
        if open.kind == TokenKind::LParen {
            loop {
                dim_names.push(self.expect_name("dimension name")?);
                let sep = self.expect(
                    |k| matches!(k, TokenKind::Comma | TokenKind::RParen),
                    "`,` or `)`",
                )?;
                if sep.kind == TokenKind::RParen {
                    break;
                }
            }
            self.expect(|k| matches!(k, TokenKind::Semicolon), "`;`")?;
        }

        let dim_ids = file.dimension_ids(&dim_names)?;
        let mut var = Variable::new(name, nc_type, dim_ids);
        var.size = var.encoded_size(&file.dimensions)?;
        file.add_variable(var);
        Ok(())
    }

    fn parse_attribute(&mut self, file: &mut NcFile, target: Target) -> Result<()> {
        let name = self.expect_attribute_name()?;
        self.expect(|k| matches!(k, TokenKind::Equal), "`=`")?;

        let mut literals = Vec::new();
        loop {
            let token = self.next_token()?;
            literals.push(match token.kind {
                TokenKind::Int { value, suffix } => Literal::Int(value, suffix),
                TokenKind::Decimal { value, suffix } => Literal::Decimal(value, suffix),
                TokenKind::Str(s) => Literal::Str(s),
                _ => return Err(Self::syntax_error("attribute value", &token)),
            });
            let sep = self.expect(
                |k| matches!(k, TokenKind::Comma | TokenKind::Semicolon),
                "`,` or `;`",
            )?;
            if sep.kind == TokenKind::Semicolon {
                break;
            }
        }

        let attr = Attribute::new(name, attr_value(literals)?);
        match target {
            Target::Global => file.set_attr(attr),
            Target::Variable(var) => {
                if let Some(var) = file.vars.get_mut(&var) {
                    var.set_attr(attr);
                }
            }
        }
        Ok(())
    }

    /// Skip the body of a `data:` section. Values are not decoded.
    fn skip_data(&mut self) -> Result<()> {
        self.next_token()?;
        self.expect(|k| matches!(k, TokenKind::Colon), "`:`")?;
        while !matches!(self.peek()?.kind, TokenKind::RBrace | TokenKind::Empty) {
            self.next_token()?;
        }
        Ok(())
    }
}

/// Choose one attribute type for a list of literals and convert them.
///
/// Strings concatenate into a char attribute. For numbers, an explicit
/// suffix wins; otherwise any decimal makes the list `float` and an
/// all-integer list is `short`.
fn attr_value(literals: Vec<Literal>) -> Result<AttrValue> {
    if literals.iter().all(|l| matches!(l, Literal::Str(_))) {
        let text = literals
            .into_iter()
            .filter_map(|l| match l {
                Literal::Str(s) => Some(s),
                _ => None,
            })
            .collect::<String>();
        return Ok(AttrValue::Char(text));
    }

    let mut explicit: Option<NcType> = None;
    let mut has_decimal = false;
    for literal in &literals {
        let suffix = match literal {
            Literal::Str(s) => {
                return Err(NcError::UnsupportedValue(format!(
                    "string \"{s}\" in a numeric list"
                )))
            }
            Literal::Int(_, suffix) => *suffix,
            Literal::Decimal(_, suffix) => {
                has_decimal = true;
                *suffix
            }
        };
        match (explicit, suffix) {
            (Some(a), Some(b)) if a != b => {
                return Err(NcError::UnsupportedValue(format!(
                    "mixed {} and {} values",
                    a.cdl_name(),
                    b.cdl_name()
                )))
            }
            (None, Some(b)) => explicit = Some(b),
            _ => {}
        }
    }

    let nc_type = explicit.unwrap_or(if has_decimal {
        NcType::Float
    } else {
        NcType::Short
    });

    match nc_type {
        NcType::Byte => integers(&literals, nc_type).map(AttrValue::Byte),
        NcType::Short => integers(&literals, nc_type).map(AttrValue::Short),
        NcType::Int => integers(&literals, nc_type).map(AttrValue::Int),
        NcType::Float => Ok(AttrValue::Float(
            decimals(&literals).map(|v| v as f32).collect(),
        )),
        NcType::Double => Ok(AttrValue::Double(decimals(&literals).collect())),
        NcType::Char => Err(NcError::UnsupportedValue("numeric char value".into())),
    }
}

fn integers<T: TryFrom<i64>>(literals: &[Literal], nc_type: NcType) -> Result<Vec<T>> {
    literals
        .iter()
        .map(|literal| match literal {
            Literal::Int(value, _) => T::try_from(*value).map_err(|_| {
                NcError::UnsupportedValue(format!(
                    "{value} does not fit a {} value",
                    nc_type.cdl_name()
                ))
            }),
            other => Err(NcError::UnsupportedValue(format!(
                "{other:?} is not a {} value",
                nc_type.cdl_name()
            ))),
        })
        .collect()
}

fn decimals(literals: &[Literal]) -> impl Iterator<Item = f64> + '_ {
    literals.iter().filter_map(|literal| match literal {
        Literal::Int(value, _) => Some(*value as f64),
        Literal::Decimal(value, _) => Some(*value),
        Literal::Str(_) => None,
    })
}
