//! Interface descriptions handed to the compiler

use serde::{Deserialize, Serialize};

use crate::descriptor::{TypeDescriptor, simple_name};
use crate::index::TypeCatalog;

/// Routing metadata attached to an operation. Every present field overrides
/// its default independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HTTP method; only GET, POST, PUT and DELETE compile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_descriptor: TypeDescriptor,
}

/// One callable unit of a legacy interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default = "TypeDescriptor::void")]
    pub returns: TypeDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteMetadata>,
}

impl Operation {
    /// Operation without parameters returning `void`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: TypeDescriptor::void(),
            route: None,
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, type_descriptor: TypeDescriptor) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_descriptor,
        });
        self
    }

    #[must_use]
    pub fn returning(mut self, returns: TypeDescriptor) -> Self {
        self.returns = returns;
        self
    }

    #[must_use]
    pub fn routed(mut self, route: RouteMetadata) -> Self {
        self.route = Some(route);
        self
    }
}

/// A legacy interface: a fully-qualified name and its ordered operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescription {
    pub name: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl InterfaceDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Whether `name` designates this interface, by qualified or simple name
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.simple_name() == name
    }
}

/// A complete compiler input: interfaces plus the types they reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSource {
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescription>,
    #[serde(default)]
    pub types: TypeCatalog,
}
