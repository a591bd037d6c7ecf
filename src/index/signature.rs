//! Parser for type signatures written in Java source syntax.
//!
//! ```text
//! type      := wildcard | base ("[" "]")*
//! wildcard  := "?" (("extends" | "super") type)?
//! base      := "void" | primitive | name ("<" type ("," type)* ">")?
//! name      := ident ("." ident)*
//! parameter := ident ("extends" type ("&" type)*)?
//! ```
//!
//! Bare names are always parsed as classes; the index binds names that match a
//! declared type parameter to type variables afterwards.

use crate::error::{Error, Result};
use crate::index::types::{Primitive, Type, TypeParameter};

/// Parses a complete type signature
pub fn parse_type(signature: &str) -> Result<Type> {
    let mut parser = SignatureParser::new(signature);
    let ty = parser.parse_type()?;
    parser.expect_end()?;
    Ok(ty)
}

/// Parses a type parameter declaration such as `T extends java.lang.Number`
pub fn parse_type_parameter(declaration: &str) -> Result<TypeParameter> {
    let mut parser = SignatureParser::new(declaration);
    let identifier = parser.ident()?;
    let mut bounds = Vec::new();

    if parser.keyword("extends") {
        bounds.push(parser.parse_type()?);
        while parser.eat('&') {
            bounds.push(parser.parse_type()?);
        }
    }

    parser.expect_end()?;
    Ok(TypeParameter { identifier, bounds })
}

struct SignatureParser<'s> {
    source: &'s str,
    chars: Vec<char>,
    pos: usize,
}

impl<'s> SignatureParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::InvalidSignature {
            signature: self.source.to_string(),
            message: format!("{} at offset {}", message.into(), self.pos),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", expected)))
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected `{}`", c))),
        }
    }

    /// Consumes the keyword when it is the next whole word
    fn keyword(&mut self, word: &str) -> bool {
        self.skip_whitespace();
        let end = self.pos + word.chars().count();
        if end > self.chars.len() {
            return false;
        }
        let candidate: String = self.chars[self.pos..end].iter().collect();
        let terminated = self
            .chars
            .get(end)
            .map_or(true, |c| !is_identifier_char(*c));
        if candidate == word && terminated {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<String> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.chars.len() && is_identifier_char(self.chars[self.pos]) {
            self.pos += 1;
        }
        if start == self.pos || self.chars[start].is_ascii_digit() {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn qualified_name(&mut self) -> Result<String> {
        let mut name = self.ident()?;
        while self.peek() == Some('.') {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.ident()?);
        }
        Ok(name)
    }

    fn parse_type(&mut self) -> Result<Type> {
        if self.eat('?') {
            return self.parse_wildcard();
        }

        let mut ty = self.parse_base()?;

        while self.eat('[') {
            self.expect(']')?;
            ty = Type::array_of(ty);
        }

        Ok(ty)
    }

    fn parse_wildcard(&mut self) -> Result<Type> {
        if self.keyword("extends") {
            let bound = self.parse_type()?;
            return Ok(Type::Wildcard {
                extends: Some(Box::new(bound)),
                super_bound: None,
            });
        }
        if self.keyword("super") {
            let bound = self.parse_type()?;
            return Ok(Type::Wildcard {
                extends: None,
                super_bound: Some(Box::new(bound)),
            });
        }
        Ok(Type::Wildcard {
            extends: None,
            super_bound: None,
        })
    }

    fn parse_base(&mut self) -> Result<Type> {
        let name = self.qualified_name()?;

        if name == "void" {
            return Ok(Type::Void);
        }
        if let Some(primitive) = Primitive::from_keyword(&name) {
            return Ok(Type::Primitive(primitive));
        }

        if !self.eat('<') {
            return Ok(Type::Class(name));
        }

        let mut arguments = vec![self.parse_type()?];
        while self.eat(',') {
            arguments.push(self.parse_type()?);
        }
        self.expect('>')?;

        Ok(Type::Parameterized { name, arguments })
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
