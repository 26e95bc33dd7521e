//! Declared classes and enums.

use restcraft_core::{Schema, SchemaRef};
use tracing::warn;

use super::ResolutionContext;
use crate::descriptor::TypeDescriptor;
use crate::error::CompileResult;
use crate::index::TypeDefinition;
use crate::registry::{Claim, SchemaOrigin};

/// Inline `string` schema listing the enum constants in declaration order
pub(super) fn enum_schema(definition: &TypeDefinition) -> Schema {
    Schema {
        r#enum: Some(definition.constants.clone()),
        ..Schema::string()
    }
}

/// Object schema of the serialized members, described by the qualified name
pub(super) fn object_schema(
    ctx: &mut ResolutionContext<'_>,
    definition: &TypeDefinition,
    depth: usize,
) -> CompileResult<Schema> {
    let mut schema = member_object(ctx, definition, depth)?;
    schema.description = Some(definition.name.clone());
    Ok(schema)
}

/// Object schema of the serialized members only
pub(super) fn member_object(
    ctx: &mut ResolutionContext<'_>,
    definition: &TypeDefinition,
    depth: usize,
) -> CompileResult<Schema> {
    let mut schema = Schema::object();
    for member in definition.serialized_members() {
        let property = ctx.resolve(&member.type_descriptor, depth + 1)?;
        schema.insert_property(member.name.as_str(), property);
    }
    Ok(schema)
}

/// Register an empty object for a type the index does not know.
pub(super) fn resolve_unknown(
    ctx: &mut ResolutionContext<'_>,
    ty: &TypeDescriptor,
) -> CompileResult<SchemaRef> {
    let origin = SchemaOrigin::Type(ty.name().to_string());
    match ctx.registry_mut().claim(ty.simple_name(), origin)? {
        Claim::Existing(name) => Ok(SchemaRef::component(&name)),
        Claim::New(name) => {
            warn!(
                type_name = ty.name(),
                "type not found in the type index, registering an empty object"
            );
            ctx.registry_mut()
                .define(&name, Schema::object().with_description(ty.name()));
            Ok(SchemaRef::component(&name))
        }
    }
}
