//! Error types for the contract compiler.

use std::path::PathBuf;

use restcraft_core::route::HttpMethod;
use thiserror::Error;

use crate::descriptor::DescriptorError;

/// Errors that abort the compilation of one interface.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A map-typed value was declared directly as an operation parameter
    #[error(
        "operation `{operation}`: parameter `{parameter}` has map type `{type_name}`, which cannot be exposed as a request parameter"
    )]
    UnsupportedMapParameter {
        operation: String,
        parameter: String,
        type_name: String,
    },

    /// Two distinct origins want the same component schema name
    #[error("schema name `{name}` is claimed by both `{existing}` and `{incoming}`")]
    SchemaNameCollision {
        name: String,
        existing: String,
        incoming: String,
    },

    /// Routing metadata names a method outside GET, POST, PUT and DELETE
    #[error("operation `{operation}`: unsupported HTTP method `{method}`")]
    UnsupportedMethod { operation: String, method: String },

    /// Two operations of one interface resolve to the same path and method
    #[error("operation `{operation}`: route {method} {path} is already taken")]
    DuplicateRoute {
        operation: String,
        method: HttpMethod,
        path: String,
    },

    /// Malformed type descriptor text
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Errors raised while loading compiler options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        CompileError::UnsupportedMapParameter {
            operation: "getAnimals".into(),
            parameter: "byName".into(),
            type_name: "Map<String, Cat>".into(),
        },
        "operation `getAnimals`: parameter `byName` has map type `Map<String, Cat>`, which cannot be exposed as a request parameter"
    )]
    #[case(
        CompileError::SchemaNameCollision {
            name: "Cat".into(),
            existing: "org.acme.Cat".into(),
            incoming: "org.other.Cat".into(),
        },
        "schema name `Cat` is claimed by both `org.acme.Cat` and `org.other.Cat`"
    )]
    #[case(
        CompileError::UnsupportedMethod { operation: "patchCat".into(), method: "PATCH".into() },
        "operation `patchCat`: unsupported HTTP method `PATCH`"
    )]
    #[case(
        CompileError::DuplicateRoute {
            operation: "listCats".into(),
            method: HttpMethod::Get,
            path: "/cats".into(),
        },
        "operation `listCats`: route GET /cats is already taken"
    )]
    fn test_error_display(#[case] error: CompileError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_descriptor_error_is_transparent() {
        let inner = DescriptorError::EmptyName {
            input: "<".into(),
            position: 0,
        };
        let message = inner.to_string();
        let error: CompileError = inner.into();
        assert_eq!(error.to_string(), message);
    }
}
