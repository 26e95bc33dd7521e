//! Polymorphic hierarchies.
//!
//! A declared type with subtypes registers as `oneOf` over its direct
//! subtypes. When the base is a concrete type (not an interface), every
//! object-shaped descendant, direct or not, also gets:
//!
//! - a required string property `type_<lowercased base simple name>`;
//! - `allOf` entries holding an inline object of the base's own members, if
//!   it has any. Inline because the base's registered schema is the `oneOf`
//!   itself.
//!
//! The base carries a discriminator on its property. A descendant carries the
//! discriminator of its nearest concrete base.

use std::collections::{HashMap, HashSet, VecDeque};

use restcraft_core::schema::Discriminator;
use restcraft_core::{Schema, SchemaRef};
use tracing::{debug, warn};

use super::{ResolutionContext, object};
use crate::descriptor::TypeDescriptor;
use crate::error::CompileResult;
use crate::index::TypeIndex;
use crate::naming::discriminator_property;
use crate::registry::{Claim, SchemaOrigin, SchemaRegistry};

/// A base type and its discovered subtypes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyInfo {
    /// Fully-qualified base name
    pub base: String,
    /// Base is an interface rather than a concrete type
    pub is_interface: bool,
    /// Fully-qualified direct subtype names, in index order
    pub subtypes: Vec<String>,
}

/// What a concrete base adds to one of its descendant schemas
#[derive(Debug, Clone)]
struct Attachment {
    /// Descendant type, by fully-qualified name
    target: SchemaOrigin,
    property: String,
    inherited: Option<Schema>,
    /// Target is a direct subtype of the base
    direct: bool,
}

impl Attachment {
    fn apply(&self, schema: &mut Schema) {
        // a polymorphic descendant is a oneOf of its own
        if !schema.is_plain_object() {
            return;
        }
        schema.insert_property(self.property.as_str(), SchemaRef::inline(Schema::string()));
        schema.require(&self.property);
        if self.direct || schema.discriminator.is_none() {
            schema.discriminator = Some(Discriminator::on(self.property.as_str()));
        }
        if let Some(inherited) = &self.inherited {
            schema
                .all_of
                .get_or_insert_with(Vec::new)
                .push(SchemaRef::inline(inherited.clone()));
        }
    }

    /// Apply to the target if its schema is built. Returns `false` otherwise.
    fn try_apply(&self, registry: &mut SchemaRegistry) -> bool {
        let Some(name) = registry.name_of(&self.target).map(str::to_string) else {
            return false;
        };
        match registry.get_mut(&name) {
            Some(schema) => {
                self.apply(schema);
                true
            }
            None => false,
        }
    }
}

/// Subtype lookups of one pass, plus attachments waiting on descendants that
/// were still being built when their base completed.
#[derive(Debug, Default)]
pub(super) struct HierarchyCache {
    subtypes: HashMap<String, Vec<String>>,
    deferred: Vec<Attachment>,
}

impl HierarchyCache {
    pub(super) fn subtypes_of(&mut self, index: &dyn TypeIndex, base: &str) -> Vec<String> {
        if let Some(cached) = self.subtypes.get(base) {
            return cached.clone();
        }
        let found = index.subtypes_of(base);
        debug!(base, subtypes = found.len(), "subtype lookup");
        self.subtypes.insert(base.to_string(), found.clone());
        found
    }

    /// Apply the attachments that could not be applied in place
    pub(super) fn finish(&mut self, registry: &mut SchemaRegistry) {
        for attachment in self.deferred.drain(..) {
            if !attachment.try_apply(registry) {
                debug!(
                    descendant = %attachment.target,
                    "descendant never registered, attachment dropped"
                );
            }
        }
    }
}

/// Resolve a declared (non-scalar, non-container) type to a component `$ref`,
/// or to an inline schema for enums.
pub(super) fn resolve_named(
    ctx: &mut ResolutionContext<'_>,
    ty: &TypeDescriptor,
    depth: usize,
) -> CompileResult<SchemaRef> {
    let index = ctx.index();
    let Some(definition) = index.lookup(ty.name()) else {
        return object::resolve_unknown(ctx, ty);
    };
    if !ty.arguments().is_empty() {
        warn!(
            type_name = %ty.qualified(),
            "type arguments of a declared type are ignored"
        );
    }
    if definition.is_enum() {
        return Ok(SchemaRef::inline(object::enum_schema(definition)));
    }

    let origin = SchemaOrigin::Type(definition.name.clone());
    let name = match ctx.registry_mut().claim(definition.simple_name(), origin)? {
        Claim::Existing(name) => return Ok(SchemaRef::component(&name)),
        Claim::New(name) => name,
    };

    let subtypes = ctx.subtypes_of(&definition.name);
    if subtypes.is_empty() {
        let schema = object::object_schema(ctx, definition, depth)?;
        ctx.registry_mut().define(&name, schema);
        return Ok(SchemaRef::component(&name));
    }

    let info = HierarchyInfo {
        base: definition.name.clone(),
        is_interface: definition.is_interface(),
        subtypes,
    };
    debug!(
        base = %info.base,
        subtypes = ?info.subtypes,
        interface = info.is_interface,
        "resolving polymorphic type"
    );

    let mut one_of = Vec::with_capacity(info.subtypes.len());
    for subtype in &info.subtypes {
        one_of.push(resolve_named(ctx, &TypeDescriptor::new(subtype.as_str()), depth + 1)?);
    }

    let mut base = Schema {
        description: Some(info.base.clone()),
        ..Schema::default()
    };
    if !info.is_interface {
        let property = discriminator_property(definition.simple_name());
        let inherited = if definition.serialized_members().next().is_some() {
            Some(object::member_object(ctx, definition, depth)?)
        } else {
            None
        };
        for descendant in descendants(ctx, &info) {
            let attachment = Attachment {
                direct: info.subtypes.contains(&descendant),
                target: SchemaOrigin::Type(descendant),
                property: property.clone(),
                inherited: inherited.clone(),
            };
            attach(ctx, attachment);
        }
        base.discriminator = Some(Discriminator::on(property));
    }
    base.one_of = Some(one_of);

    ctx.registry_mut().define(&name, base);
    Ok(SchemaRef::component(&name))
}

/// Every subtype reachable from the base, breadth-first, each once
fn descendants(ctx: &mut ResolutionContext<'_>, info: &HierarchyInfo) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut queue: VecDeque<String> = info.subtypes.iter().cloned().collect();
    while let Some(name) = queue.pop_front() {
        if name == info.base || !seen.insert(name.clone()) {
            continue;
        }
        queue.extend(ctx.subtypes_of(&name));
        found.push(name);
    }
    found
}

fn attach(ctx: &mut ResolutionContext<'_>, attachment: Attachment) {
    if !attachment.try_apply(ctx.registry_mut()) {
        ctx.hierarchy.deferred.push(attachment);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::super::fixtures::{animals, member, ty};
    use super::*;
    use crate::index::{TypeCatalog, TypeDefinition, TypeKind};
    use crate::options::CollisionPolicy;
    use restcraft_core::SchemaType;

    fn component_names(schema: &Schema) -> Vec<&str> {
        schema
            .one_of
            .as_ref()
            .unwrap()
            .iter()
            .filter_map(SchemaRef::component_name)
            .collect()
    }

    #[test]
    fn test_concrete_base_gets_one_of_and_discriminator() {
        let catalog = animals();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        let reference = ctx.resolve_root(&ty("org.acme.dto.Human")).unwrap();
        assert_eq!(reference.component_name(), Some("Human"));

        let human = ctx.registry().get("Human").unwrap();
        assert_eq!(component_names(human), vec!["Man", "Woman"]);
        assert_eq!(human.description.as_deref(), Some("org.acme.dto.Human"));
        assert_eq!(
            human.discriminator.as_ref().map(|d| d.property_name.as_str()),
            Some("type_human")
        );

        for subtype in ["Man", "Woman"] {
            let schema = ctx.registry().get(subtype).unwrap();
            let properties = schema.properties.as_ref().unwrap();
            assert_eq!(
                properties["type_human"],
                SchemaRef::inline(Schema::string())
            );
            assert_eq!(schema.required, Some(vec!["type_human".to_string()]));
            assert_eq!(
                schema.discriminator.as_ref().map(|d| d.property_name.as_str()),
                Some("type_human")
            );
        }
    }

    #[test]
    fn test_subtypes_inherit_base_members_inline() {
        let catalog = animals();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.dto.Human")).unwrap();

        let man = ctx.registry().get("Man").unwrap();
        let all_of = man.all_of.as_ref().unwrap();
        assert_eq!(all_of.len(), 1);
        let inherited = all_of[0].as_inline().unwrap();
        assert_eq!(inherited.schema_type, Some(SchemaType::Object));
        assert_eq!(
            inherited.properties.as_ref().unwrap()["name"],
            SchemaRef::inline(Schema::string())
        );
        assert!(inherited.description.is_none());
        assert!(man.properties.as_ref().unwrap().contains_key("beard"));
    }

    #[test]
    fn test_interface_base_has_no_discriminator() {
        let catalog = animals();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.dto.Animal")).unwrap();

        let animal = ctx.registry().get("Animal").unwrap();
        assert_eq!(component_names(animal), vec!["Dog", "Bird"]);
        assert!(animal.discriminator.is_none());
        let dog = ctx.registry().get("Dog").unwrap();
        assert!(dog.discriminator.is_none());
        assert!(dog.all_of.is_none());
        assert_eq!(dog.property_count(), 1);
    }

    #[test]
    fn test_subtype_resolved_first_still_gets_discriminator() {
        let catalog = animals();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.dto.Man")).unwrap();
        assert!(ctx.registry().get("Man").unwrap().discriminator.is_none());

        ctx.resolve_root(&ty("org.acme.dto.Human")).unwrap();
        let man = ctx.registry().get("Man").unwrap();
        assert!(man.discriminator.is_some());
        assert!(man.properties.as_ref().unwrap().contains_key("type_human"));
    }

    #[test]
    fn test_subtype_referring_back_to_base() {
        let catalog: TypeCatalog = [
            TypeDefinition::new("org.acme.Shape", TypeKind::AbstractClass),
            TypeDefinition::new("org.acme.Group", TypeKind::Class)
                .with_supertype("org.acme.Shape")
                .with_member(member("parent", "org.acme.Shape")),
        ]
        .into_iter()
        .collect();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.Group")).unwrap();
        let registry = ctx.into_registry();

        let group = registry.get("Group").unwrap();
        assert_eq!(
            group.properties.as_ref().unwrap()["parent"].component_name(),
            Some("Shape")
        );
        assert_eq!(group.required, Some(vec!["type_shape".to_string()]));
        assert!(group.all_of.is_none());
        assert_eq!(component_names(registry.get("Shape").unwrap()), vec!["Group"]);
    }

    #[test]
    fn test_polymorphic_subtype_keeps_its_own_one_of() {
        let catalog: TypeCatalog = [
            TypeDefinition::new("org.acme.Vehicle", TypeKind::Class),
            TypeDefinition::new("org.acme.Car", TypeKind::Class).with_supertype("org.acme.Vehicle"),
            TypeDefinition::new("org.acme.Cabrio", TypeKind::Class)
                .with_supertype("org.acme.Car"),
        ]
        .into_iter()
        .collect();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.Vehicle")).unwrap();

        let car = ctx.registry().get("Car").unwrap();
        assert_eq!(component_names(car), vec!["Cabrio"]);
        assert_eq!(
            car.discriminator.as_ref().map(|d| d.property_name.as_str()),
            Some("type_car")
        );
        assert!(car.properties.is_none());

        let cabrio = ctx.registry().get("Cabrio").unwrap();
        assert_eq!(
            cabrio.discriminator.as_ref().map(|d| d.property_name.as_str()),
            Some("type_car")
        );
    }

    #[test]
    fn test_outer_discriminator_reaches_indirect_subtypes() {
        let catalog: TypeCatalog = [
            TypeDefinition::new("org.acme.Vehicle", TypeKind::Class)
                .with_member(member("wheels", "int")),
            TypeDefinition::new("org.acme.Car", TypeKind::Class)
                .with_supertype("org.acme.Vehicle")
                .with_member(member("doors", "int")),
            TypeDefinition::new("org.acme.Cabrio", TypeKind::Class)
                .with_supertype("org.acme.Car")
                .with_member(member("roof", "java.lang.String")),
        ]
        .into_iter()
        .collect();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.Vehicle")).unwrap();
        let registry = ctx.into_registry();

        let vehicle = registry.get("Vehicle").unwrap();
        assert_eq!(
            vehicle.discriminator.as_ref().map(|d| d.property_name.as_str()),
            Some("type_vehicle")
        );

        let cabrio = registry.get("Cabrio").unwrap();
        let properties = cabrio.properties.as_ref().unwrap();
        assert!(properties.contains_key("type_car"));
        assert!(properties.contains_key("type_vehicle"));
        assert_eq!(
            cabrio.required,
            Some(vec!["type_car".to_string(), "type_vehicle".to_string()])
        );
        assert_eq!(
            cabrio.discriminator.as_ref().map(|d| d.property_name.as_str()),
            Some("type_car")
        );

        let inherited: Vec<_> = cabrio
            .all_of
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| {
                s.as_inline()
                    .unwrap()
                    .properties
                    .as_ref()
                    .unwrap()
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(inherited, vec![vec!["doors".to_string()], vec!["wheels".to_string()]]);

        let car = registry.get("Car").unwrap();
        assert!(car.properties.is_none());
        assert!(car.all_of.is_none());
    }

    #[test]
    fn test_indirect_subtype_built_after_its_base() {
        // Cabrio refers back to Vehicle, so Vehicle completes while Cabrio is pending
        let catalog: TypeCatalog = [
            TypeDefinition::new("org.acme.Vehicle", TypeKind::Class),
            TypeDefinition::new("org.acme.Car", TypeKind::Class).with_supertype("org.acme.Vehicle"),
            TypeDefinition::new("org.acme.Cabrio", TypeKind::Class)
                .with_supertype("org.acme.Car")
                .with_member(member("towing", "org.acme.Vehicle")),
        ]
        .into_iter()
        .collect();
        let mut ctx = ResolutionContext::new(&catalog, CollisionPolicy::Error);

        ctx.resolve_root(&ty("org.acme.Cabrio")).unwrap();
        let registry = ctx.into_registry();

        let cabrio = registry.get("Cabrio").unwrap();
        let properties = cabrio.properties.as_ref().unwrap();
        assert!(properties.contains_key("type_car"));
        assert!(properties.contains_key("type_vehicle"));
        assert_eq!(
            cabrio.discriminator.as_ref().map(|d| d.property_name.as_str()),
            Some("type_car")
        );
    }

    struct CountingIndex {
        catalog: TypeCatalog,
        lookups: Cell<usize>,
    }

    impl TypeIndex for CountingIndex {
        fn lookup(&self, name: &str) -> Option<&TypeDefinition> {
            self.catalog.lookup(name)
        }

        fn subtypes_of(&self, name: &str) -> Vec<String> {
            self.lookups.set(self.lookups.get() + 1);
            self.catalog.subtypes_of(name)
        }
    }

    #[test]
    fn test_subtype_lookup_is_memoized() {
        let index = CountingIndex {
            catalog: animals(),
            lookups: Cell::new(0),
        };
        let mut cache = HierarchyCache::default();

        let first = cache.subtypes_of(&index, "org.acme.dto.Human");
        let second = cache.subtypes_of(&index, "org.acme.dto.Human");
        cache.subtypes_of(&index, "org.acme.dto.Animal");

        assert_eq!(first, second);
        assert_eq!(index.lookups.get(), 2);
    }
}
