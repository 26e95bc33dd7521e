//! Compiler options, loadable from a `restcraft.toml` file

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Document version used when none is configured
pub const DEFAULT_VERSION: &str = "1.0.0";

/// What to do when two distinct origins want the same component schema name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail the compilation
    #[default]
    Error,
    /// Fall back to the fully-qualified name (types) or a numeric suffix (synthetic schemas)
    Qualify,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Qualify => f.write_str("qualify"),
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "qualify" => Ok(Self::Qualify),
            other => Err(format!(
                "unknown collision policy `{other}` (expected `error` or `qualify`)"
            )),
        }
    }
}

/// Options for one compiler run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    /// `info.version` of every generated document
    pub version: String,
    pub collision_policy: CollisionPolicy,
    /// Turn skipped map parameters and duplicate routes into errors
    pub strict: bool,
    /// Compile only the interface with this (qualified or simple) name
    pub only: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            collision_policy: CollisionPolicy::default(),
            strict: false,
            only: None,
        }
    }
}

impl CompilerOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(text)?)
    }

    /// Read options from a TOML file
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
