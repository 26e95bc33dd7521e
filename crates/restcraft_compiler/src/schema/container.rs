//! Sequence, set and map wrappers.

use restcraft_core::{Schema, SchemaRef, SchemaType};
use tracing::warn;

use super::{ResolutionContext, classifier::is_string, free_form_object};
use crate::descriptor::TypeDescriptor;
use crate::error::CompileResult;
use crate::registry::{Claim, SchemaOrigin};

const SEQUENCES: &[&str] = &[
    "List",
    "Collection",
    "Iterable",
    "ArrayList",
    "LinkedList",
    "Vector",
    "Stack",
    "Queue",
    "Deque",
    "ArrayDeque",
];

const SETS: &[&str] = &[
    "Set",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "SortedSet",
    "NavigableSet",
    "EnumSet",
];

const MAPS: &[&str] = &[
    "Map",
    "HashMap",
    "LinkedHashMap",
    "TreeMap",
    "Hashtable",
    "ConcurrentHashMap",
    "ConcurrentMap",
    "ConcurrentSkipListMap",
    "EnumMap",
    "SortedMap",
    "NavigableMap",
];

/// Prefix of the component synthesized for maps with non-text keys
pub const COMPOSITE_MAP_PREFIX: &str = "CompositeMapResponse";

/// Generic wrapper families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFamily {
    Sequence,
    Set,
    Map,
}

impl ContainerFamily {
    /// Family of a descriptor, by case-insensitive simple name
    pub fn of(ty: &TypeDescriptor) -> Option<Self> {
        let simple = ty.simple_name();
        let matches = |names: &[&str]| names.iter().any(|n| n.eq_ignore_ascii_case(simple));
        if matches(SEQUENCES) {
            Some(Self::Sequence)
        } else if matches(SETS) {
            Some(Self::Set)
        } else if matches(MAPS) {
            Some(Self::Map)
        } else {
            None
        }
    }

    /// Sequence or set
    pub fn is_collection(self) -> bool {
        matches!(self, Self::Sequence | Self::Set)
    }
}

/// `array` of the element schema; `uniqueItems` for sets.
pub(super) fn resolve_collection(
    ctx: &mut ResolutionContext<'_>,
    ty: &TypeDescriptor,
    family: ContainerFamily,
    depth: usize,
) -> CompileResult<SchemaRef> {
    let items = match ty.arguments().first() {
        Some(element) => ctx.resolve(element, depth + 1)?,
        None => {
            warn!(
                type_name = %ty.qualified(),
                "collection without element type, resolving items as object"
            );
            free_form_object()
        }
    };

    let mut schema = Schema::array(items);
    if family == ContainerFamily::Set {
        schema.unique_items = Some(true);
    }
    Ok(SchemaRef::inline(schema))
}

/// Text-keyed maps become open objects; any other key synthesizes a
/// `CompositeMapResponse<depth>` component holding parallel key and value arrays.
pub(super) fn resolve_map(
    ctx: &mut ResolutionContext<'_>,
    ty: &TypeDescriptor,
    depth: usize,
) -> CompileResult<SchemaRef> {
    let [key, value] = ty.arguments() else {
        warn!(
            type_name = %ty.qualified(),
            "map without key and value types, resolving values as object"
        );
        return Ok(SchemaRef::inline(Schema::map_of(free_form_object())));
    };

    if is_string(key) {
        let values = ctx.resolve(value, depth + 1)?;
        return Ok(SchemaRef::inline(Schema::map_of(values)));
    }

    let preferred = format!("{COMPOSITE_MAP_PREFIX}{depth}");
    let origin = SchemaOrigin::Synthetic(format!("map {}", ty.qualified()));
    let name = match ctx.registry_mut().claim(&preferred, origin)? {
        Claim::Existing(name) => return Ok(SchemaRef::component(&name)),
        Claim::New(name) => name,
    };

    let keys = ctx.resolve(key, depth + 1)?;
    let values = ctx.resolve(value, depth + 1)?;
    let mut composite =
        Schema::object().with_description(format!("wrapper for Map [{key}, {value}]"));
    composite.insert_property("first", SchemaRef::inline(Schema::array(keys)));
    composite.insert_property("last", SchemaRef::inline(Schema::array(values)));
    ctx.registry_mut().define(&name, composite);

    Ok(SchemaRef::component(&name))
}
