//! Component schema registry for one compilation pass.
//!
//! Names are claimed before a schema is built so that recursive types and
//! repeated references resolve to a `$ref` without rebuilding. Each name
//! belongs to exactly one [`SchemaOrigin`]; a second origin asking for a taken
//! name is a collision settled by the [`CollisionPolicy`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use restcraft_core::Schema;
use tracing::info;

use crate::error::{CompileError, CompileResult};
use crate::options::CollisionPolicy;

/// Where a component schema comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaOrigin {
    /// A declared type, by fully-qualified name
    Type(String),
    /// A schema synthesized by the compiler, by signature
    Synthetic(String),
}

impl fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Synthetic(signature) => write!(f, "synthetic {signature}"),
        }
    }
}

/// Outcome of [`SchemaRegistry::claim`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The origin already owns this name; its schema is built or being built
    Existing(String),
    /// The name was reserved for the origin and must be filled with [`SchemaRegistry::define`]
    New(String),
}

#[derive(Debug)]
struct Entry {
    origin: SchemaOrigin,
    /// `None` while the schema is still being built
    schema: Option<Schema>,
}

#[derive(Debug)]
pub struct SchemaRegistry {
    policy: CollisionPolicy,
    entries: BTreeMap<String, Entry>,
    names: HashMap<SchemaOrigin, String>,
}

impl SchemaRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            entries: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    /// Name already owned by `origin`
    pub fn name_of(&self, origin: &SchemaOrigin) -> Option<&str> {
        self.names.get(origin).map(String::as_str)
    }

    /// Reserve `preferred` (or a policy-derived alternative) for `origin`.
    pub fn claim(&mut self, preferred: &str, origin: SchemaOrigin) -> CompileResult<Claim> {
        if let Some(name) = self.names.get(&origin) {
            return Ok(Claim::Existing(name.clone()));
        }

        let name = match self.entries.get(preferred) {
            None => preferred.to_string(),
            Some(entry) => match self.policy {
                CollisionPolicy::Error => {
                    return Err(CompileError::SchemaNameCollision {
                        name: preferred.to_string(),
                        existing: entry.origin.to_string(),
                        incoming: origin.to_string(),
                    });
                }
                CollisionPolicy::Qualify => {
                    let renamed = self.qualified_name(preferred, &origin);
                    info!(
                        schema = preferred,
                        renamed = %renamed,
                        origin = %origin,
                        "schema name already taken, registering under a qualified name"
                    );
                    renamed
                }
            },
        };

        self.entries.insert(
            name.clone(),
            Entry {
                origin: origin.clone(),
                schema: None,
            },
        );
        self.names.insert(origin, name.clone());
        Ok(Claim::New(name))
    }

    fn qualified_name(&self, preferred: &str, origin: &SchemaOrigin) -> String {
        let base = match origin {
            SchemaOrigin::Type(qualified) if !self.entries.contains_key(qualified) => {
                return qualified.clone();
            }
            SchemaOrigin::Type(qualified) => qualified.as_str(),
            SchemaOrigin::Synthetic(_) => preferred,
        };
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.entries.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Store the schema for a claimed name
    pub fn define(&mut self, name: &str, schema: Schema) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.schema = Some(schema);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name)?.schema.as_ref()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.entries.get_mut(name)?.schema.as_mut()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All schemas sorted by name. A name claimed but never defined yields an
    /// empty object.
    pub fn into_schemas(self) -> BTreeMap<String, Schema> {
        self.entries
            .into_iter()
            .map(|(name, entry)| (name, entry.schema.unwrap_or_else(Schema::object)))
            .collect()
    }
}
