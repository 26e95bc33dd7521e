//! Type index: the compiler's only view of the declared types.
//!
//! Member introspection and subtype discovery both go through [`TypeIndex`].
//! [`TypeCatalog`] is the in-memory implementation loaded from interface
//! description files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::{TypeDescriptor, simple_name};

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    AbstractClass,
    Interface,
    Enum,
}

/// One declared field of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub type_descriptor: TypeDescriptor,
    /// Transient state, never serialized
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub transient: bool,
    /// Compiler-generated member
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl Member {
    pub fn new(name: impl Into<String>, type_descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            type_descriptor,
            transient: false,
            synthetic: false,
        }
    }

    /// Whether the member is part of the serialized shape
    pub fn is_serialized(&self) -> bool {
        !self.transient && !self.synthetic
    }
}

/// A declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Fully-qualified name
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Fully-qualified names of the direct supertypes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    /// Enum constants, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            supertypes: Vec::new(),
            members: Vec::new(),
            constants: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_constants<I, S>(mut self, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constants.extend(constants.into_iter().map(Into::into));
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Members that contribute properties, in declaration order
    pub fn serialized_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_serialized())
    }
}

/// Lookup seam between the compiler and whatever knows the declared types.
pub trait TypeIndex {
    /// Definition of a type by fully-qualified name
    fn lookup(&self, name: &str) -> Option<&TypeDefinition>;

    /// Fully-qualified names of the direct subtypes of `name`, in declaration order
    fn subtypes_of(&self, name: &str) -> Vec<String>;
}

/// In-memory [`TypeIndex`] over an ordered list of definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDefinition>", into = "Vec<TypeDefinition>")]
pub struct TypeCatalog {
    definitions: Vec<TypeDefinition>,
    by_name: HashMap<String, usize>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any previous one with the same name
    pub fn insert(&mut self, definition: TypeDefinition) {
        match self.by_name.get(&definition.name) {
            Some(&slot) => self.definitions[slot] = definition,
            None => {
                self.by_name
                    .insert(definition.name.clone(), self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Unqualified names resolve when exactly one definition carries that simple name
    fn lookup_simple(&self, name: &str) -> Option<&TypeDefinition> {
        let mut matches = self.definitions.iter().filter(|d| d.simple_name() == name);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }
}

impl TypeIndex for TypeCatalog {
    fn lookup(&self, name: &str) -> Option<&TypeDefinition> {
        match self.by_name.get(name) {
            Some(&slot) => self.definitions.get(slot),
            None if !name.contains('.') => self.lookup_simple(name),
            None => None,
        }
    }

    fn subtypes_of(&self, name: &str) -> Vec<String> {
        self.definitions
            .iter()
            .filter(|d| d.supertypes.iter().any(|s| s == name))
            .map(|d| d.name.clone())
            .collect()
    }
}

impl From<Vec<TypeDefinition>> for TypeCatalog {
    fn from(definitions: Vec<TypeDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }
}

impl From<TypeCatalog> for Vec<TypeDefinition> {
    fn from(catalog: TypeCatalog) -> Self {
        catalog.definitions
    }
}

impl FromIterator<TypeDefinition> for TypeCatalog {
    fn from_iter<T: IntoIterator<Item = TypeDefinition>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ty(text: &str) -> TypeDescriptor {
        TypeDescriptor::parse(text).unwrap()
    }

    fn catalog() -> TypeCatalog {
        [
            TypeDefinition::new("org.acme.Human", TypeKind::Class)
                .with_member(Member::new("name", ty("java.lang.String"))),
            TypeDefinition::new("org.acme.Man", TypeKind::Class).with_supertype("org.acme.Human"),
            TypeDefinition::new("org.acme.Woman", TypeKind::Class)
                .with_supertype("org.acme.Human"),
            TypeDefinition::new("org.acme.Cat", TypeKind::Class),
            TypeDefinition::new("org.other.Cat", TypeKind::Class),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_subtypes_in_declaration_order() {
        assert_eq!(
            catalog().subtypes_of("org.acme.Human"),
            vec!["org.acme.Man".to_string(), "org.acme.Woman".to_string()]
        );
        assert!(catalog().subtypes_of("org.acme.Man").is_empty());
    }

    #[rstest]
    #[case("org.acme.Human", Some("org.acme.Human"))]
    #[case("Human", Some("org.acme.Human"))]
    #[case("Cat", None)]
    #[case("org.other.Cat", Some("org.other.Cat"))]
    #[case("org.acme.Dog", None)]
    fn test_lookup(#[case] name: &str, #[case] expected: Option<&str>) {
        let catalog = catalog();
        assert_eq!(catalog.lookup(name).map(|d| d.name.as_str()), expected);
    }

    #[test]
    fn test_serialized_members_skip_transient_and_synthetic() {
        let mut cached = Member::new("cache", ty("java.lang.String"));
        cached.transient = true;
        let mut generated = Member::new("this$0", ty("org.acme.Outer"));
        generated.synthetic = true;

        let definition = TypeDefinition::new("org.acme.Cat", TypeKind::Class)
            .with_member(Member::new("name", ty("java.lang.String")))
            .with_member(cached)
            .with_member(generated)
            .with_member(Member::new("pattes", ty("java.lang.Integer")));

        let names: Vec<_> = definition
            .serialized_members()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "pattes"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut catalog = catalog();
        let before = catalog.len();
        catalog.insert(TypeDefinition::new("org.acme.Cat", TypeKind::Enum));

        assert_eq!(catalog.len(), before);
        assert!(catalog.lookup("org.acme.Cat").unwrap().is_enum());
    }

    #[test]
    fn test_deserialize_from_yaml_list() {
        let yaml = r"
- name: org.acme.Color
  kind: enum
  constants: [RED, GREEN]
- name: org.acme.Cat
  members:
    - name: color
      type: org.acme.Color
    - name: lives
      type: int
      transient: true
";
        let catalog: TypeCatalog = serde_yaml::from_str(yaml).unwrap();

        let color = catalog.lookup("org.acme.Color").unwrap();
        assert_eq!(color.constants, vec!["RED", "GREEN"]);
        let cat = catalog.lookup("org.acme.Cat").unwrap();
        assert_eq!(cat.kind, TypeKind::Class);
        assert_eq!(cat.serialized_members().count(), 1);
    }
}
