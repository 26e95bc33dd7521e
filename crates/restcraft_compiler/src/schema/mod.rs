//! Type to schema resolution.
//!
//! This module converts type descriptors into `OpenAPI` schema positions,
//! registering named component schemas along the way.
//!
//! # Module Structure
//!
//! - `classifier` - primitive and well-known scalar types
//! - `container` - sequence, set and map wrappers
//! - `object` - declared classes and enums, unknown-type fallback
//! - `hierarchy` - subtype discovery, `oneOf` and discriminator composition
//!
//! Every resolution runs inside a [`ResolutionContext`], which owns the
//! [`SchemaRegistry`] and the subtype cache of one compilation pass.

mod classifier;
mod container;
mod hierarchy;
mod object;

use restcraft_core::{Schema, SchemaRef, SchemaType};
use tracing::{debug, warn};

use crate::descriptor::TypeDescriptor;
use crate::error::CompileResult;
use crate::index::TypeIndex;
use crate::options::CollisionPolicy;
use crate::registry::SchemaRegistry;

pub use classifier::{Classification, classify, is_string};
pub use container::ContainerFamily;
pub use hierarchy::HierarchyInfo;

/// Maximum nesting of type levels followed during one resolution.
/// Deeper positions resolve to a plain object.
pub const MAX_RESOLUTION_DEPTH: usize = 32;

/// State of one compilation pass: the type index, the registry being
/// filled, and memoized subtype lookups.
pub struct ResolutionContext<'a> {
    index: &'a dyn TypeIndex,
    registry: SchemaRegistry,
    hierarchy: hierarchy::HierarchyCache,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(index: &'a dyn TypeIndex, policy: CollisionPolicy) -> Self {
        Self {
            index,
            registry: SchemaRegistry::new(policy),
            hierarchy: hierarchy::HierarchyCache::default(),
        }
    }

    /// Resolve the outermost type of a resolution chain (depth 1)
    pub fn resolve_root(&mut self, ty: &TypeDescriptor) -> CompileResult<SchemaRef> {
        self.resolve(ty, 1)
    }

    /// Resolve `ty` found `depth` levels into a resolution chain.
    pub(crate) fn resolve(&mut self, ty: &TypeDescriptor, depth: usize) -> CompileResult<SchemaRef> {
        if depth > MAX_RESOLUTION_DEPTH {
            warn!(
                type_name = %ty.qualified(),
                depth,
                "type nesting too deep, resolving as plain object"
            );
            return Ok(free_form_object());
        }

        match classify(ty) {
            Classification::Scalar(schema) => return Ok(SchemaRef::inline(schema)),
            Classification::Void => {
                debug!(depth, "void in a value position, resolving as plain object");
                return Ok(free_form_object());
            }
            Classification::Composite => {}
        }

        if matches!(ty.name(), "java.lang.Object" | "Object") {
            return Ok(free_form_object());
        }

        if is_optional(ty) {
            return match ty.arguments() {
                [inner] => self.resolve(inner, depth + 1),
                _ => {
                    warn!(
                        type_name = %ty.qualified(),
                        "optional without a single type argument, resolving as plain object"
                    );
                    Ok(free_form_object())
                }
            };
        }

        match ContainerFamily::of(ty) {
            Some(ContainerFamily::Map) => container::resolve_map(self, ty, depth),
            Some(family) => container::resolve_collection(self, ty, family, depth),
            None => hierarchy::resolve_named(self, ty, depth),
        }
    }

    pub(crate) fn index(&self) -> &'a dyn TypeIndex {
        self.index
    }

    /// Direct subtypes of `base`, looked up once per pass
    pub(crate) fn subtypes_of(&mut self, base: &str) -> Vec<String> {
        self.hierarchy.subtypes_of(self.index, base)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Finish the pass and hand over the registry
    pub fn into_registry(mut self) -> SchemaRegistry {
        self.hierarchy.finish(&mut self.registry);
        self.registry
    }
}

fn is_optional(ty: &TypeDescriptor) -> bool {
    matches!(ty.name(), "Optional" | "java.util.Optional")
}

/// The type wrapped by any number of `Optional` layers
pub fn strip_optional(ty: &TypeDescriptor) -> &TypeDescriptor {
    let mut ty = ty;
    while is_optional(ty)
        && let [inner] = ty.arguments()
    {
        ty = inner;
    }
    ty
}

fn free_form_object() -> SchemaRef {
    SchemaRef::inline(Schema::new(SchemaType::Object))
}
