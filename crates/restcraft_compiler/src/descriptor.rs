//! Type descriptors as they appear in interface descriptions.
//!
//! A descriptor is a fully-qualified type name plus its ordered generic
//! arguments, parsed from text such as
//! `java.util.Map<java.lang.String, org.acme.Cat>`. Wildcards are reduced to
//! their bound (`? extends Animal` becomes `Animal`, a bare `?` becomes
//! `java.lang.Object`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const VOID: &str = "void";
const OBJECT: &str = "java.lang.Object";

/// Errors raised while parsing descriptor text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("expected a type name at offset {position} in `{input}`")]
    EmptyName { input: String, position: usize },

    #[error("unbalanced `<`/`>` at offset {position} in `{input}`")]
    Unbalanced { input: String, position: usize },

    #[error("unexpected trailing input at offset {position} in `{input}`")]
    TrailingInput { input: String, position: usize },
}

/// A (possibly generic) type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeDescriptor {
    name: String,
    arguments: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Non-generic descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Generic descriptor with ordered arguments
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// The `void` descriptor
    pub fn void() -> Self {
        Self::new(VOID)
    }

    pub fn parse(input: &str) -> Result<Self, DescriptorError> {
        let mut parser = Parser { input, pos: 0 };
        let descriptor = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != input.len() {
            return Err(DescriptorError::TrailingInput {
                input: input.to_string(),
                position: parser.pos,
            });
        }
        Ok(descriptor)
    }

    /// Fully-qualified name without generic arguments
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.arguments
    }

    /// Last `.`-separated segment of the name
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_void(&self) -> bool {
        self.name == VOID || self.name == "java.lang.Void" || self.name == "Void"
    }

    /// Fully-qualified rendering, arguments included
    pub fn qualified(&self) -> String {
        self.render(|d| d.name())
    }

    fn render<'a>(&'a self, name: fn(&'a Self) -> &'a str) -> String {
        let mut out = name(self).to_string();
        if !self.arguments.is_empty() {
            out.push('<');
            let args: Vec<String> = self.arguments.iter().map(|a| a.render(name)).collect();
            out.push_str(&args.join(", "));
            out.push('>');
        }
        out
    }
}

/// Last `.`-separated segment of a fully-qualified name
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Self::simple_name))
    }
}

impl FromStr for TypeDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeDescriptor> for String {
    fn from(value: TypeDescriptor) -> Self {
        value.qualified()
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump(c);
        }
    }

    fn identifier(&mut self) -> &str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '$') {
                self.bump(c);
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor, DescriptorError> {
        self.skip_whitespace();
        if self.peek() == Some('?') {
            return self.parse_wildcard();
        }

        let start = self.pos;
        let name = self.identifier().to_string();
        if name.is_empty() {
            return Err(DescriptorError::EmptyName {
                input: self.input.to_string(),
                position: start,
            });
        }

        self.skip_whitespace();
        let mut arguments = Vec::new();
        if self.peek() == Some('<') {
            self.bump('<');
            loop {
                arguments.push(self.parse_type()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.bump(','),
                    Some('>') => {
                        self.bump('>');
                        break;
                    }
                    _ => {
                        return Err(DescriptorError::Unbalanced {
                            input: self.input.to_string(),
                            position: self.pos,
                        });
                    }
                }
            }
        }
        Ok(TypeDescriptor::generic(name, arguments))
    }

    fn parse_wildcard(&mut self) -> Result<TypeDescriptor, DescriptorError> {
        self.bump('?');
        self.skip_whitespace();
        let checkpoint = self.pos;
        match self.identifier() {
            "extends" | "super" => self.parse_type(),
            _ => {
                self.pos = checkpoint;
                Ok(TypeDescriptor::new(OBJECT))
            }
        }
    }
}
