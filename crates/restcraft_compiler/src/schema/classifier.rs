//! Scalar classification of primitive and well-known types.

use restcraft_core::Schema;

use crate::descriptor::TypeDescriptor;

/// Packages whose types may be written by simple name
const WELL_KNOWN_PACKAGES: &[&str] = &[
    "java.lang",
    "java.util",
    "java.time",
    "java.sql",
    "java.math",
    "java.util.concurrent.atomic",
];

/// What a descriptor means before any container or object handling
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No value ("no content")
    Void,
    /// A scalar schema with no children
    Scalar(Schema),
    /// Not scalar; left to the container and object resolvers
    Composite,
}

/// Map a type name to its scalar schema. Pure; never fails.
pub fn classify(ty: &TypeDescriptor) -> Classification {
    if ty.is_void() {
        return Classification::Void;
    }

    let name = ty.name();
    let schema = match name {
        "int" => Schema::integer().with_format("int32"),
        "long" => Schema::integer().with_format("int64"),
        "short" | "byte" => Schema::integer(),
        "float" | "double" => Schema::number().with_format("double"),
        "boolean" => Schema::boolean(),
        "char" => Schema::string(),
        _ => match well_known_simple_name(name).and_then(well_known_scalar) {
            Some(schema) => schema,
            None => return Classification::Composite,
        },
    };
    Classification::Scalar(schema)
}

/// Whether the descriptor is exactly the text type (a text map key)
pub fn is_string(ty: &TypeDescriptor) -> bool {
    matches!(ty.name(), "String" | "java.lang.String")
}

fn well_known_simple_name(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        None => Some(name),
        Some((package, simple)) if WELL_KNOWN_PACKAGES.contains(&package) => Some(simple),
        Some(_) => None,
    }
}

fn well_known_scalar(simple: &str) -> Option<Schema> {
    let schema = match simple {
        "String" | "Character" | "CharSequence" => Schema::string(),
        "Boolean" => Schema::boolean(),
        "Date" | "LocalDate" => Schema::string().with_format("date"),
        "LocalTime" | "LocalDateTime" | "OffsetDateTime" | "ZonedDateTime" | "Instant"
        | "Timestamp" | "Calendar" => Schema::string().with_format("date-time"),
        "Integer" => Schema::integer().with_format("int32"),
        "Long" => Schema::integer().with_format("int64"),
        "Short" | "Byte" | "BigInteger" | "AtomicInteger" | "AtomicLong" => Schema::integer(),
        "Float" | "Double" | "BigDecimal" => Schema::number().with_format("double"),
        _ => return None,
    };
    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use restcraft_core::SchemaType;
    use rstest::rstest;

    fn classify_str(text: &str) -> Classification {
        classify(&TypeDescriptor::parse(text).unwrap())
    }

    #[rstest]
    #[case("java.lang.String", SchemaType::String, None)]
    #[case("String", SchemaType::String, None)]
    #[case("char", SchemaType::String, None)]
    #[case("java.lang.Character", SchemaType::String, None)]
    #[case("boolean", SchemaType::Boolean, None)]
    #[case("java.lang.Boolean", SchemaType::Boolean, None)]
    #[case("java.util.Date", SchemaType::String, Some("date"))]
    #[case("java.sql.Date", SchemaType::String, Some("date"))]
    #[case("java.time.LocalDate", SchemaType::String, Some("date"))]
    #[case("java.time.LocalDateTime", SchemaType::String, Some("date-time"))]
    #[case("java.time.Instant", SchemaType::String, Some("date-time"))]
    #[case("java.sql.Timestamp", SchemaType::String, Some("date-time"))]
    #[case("int", SchemaType::Integer, Some("int32"))]
    #[case("java.lang.Integer", SchemaType::Integer, Some("int32"))]
    #[case("long", SchemaType::Integer, Some("int64"))]
    #[case("Long", SchemaType::Integer, Some("int64"))]
    #[case("short", SchemaType::Integer, None)]
    #[case("java.math.BigInteger", SchemaType::Integer, None)]
    #[case("java.util.concurrent.atomic.AtomicLong", SchemaType::Integer, None)]
    #[case("float", SchemaType::Number, Some("double"))]
    #[case("java.lang.Double", SchemaType::Number, Some("double"))]
    #[case("java.math.BigDecimal", SchemaType::Number, Some("double"))]
    fn test_scalar_mapping(
        #[case] input: &str,
        #[case] expected_type: SchemaType,
        #[case] expected_format: Option<&str>,
    ) {
        let Classification::Scalar(schema) = classify_str(input) else {
            panic!("{input} should classify as scalar");
        };
        assert_eq!(schema.schema_type, Some(expected_type));
        assert_eq!(schema.format.as_deref(), expected_format);
        assert!(schema.properties.is_none());
        assert!(schema.items.is_none());
    }

    #[rstest]
    #[case("void")]
    #[case("java.lang.Void")]
    fn test_void(#[case] input: &str) {
        assert_eq!(classify_str(input), Classification::Void);
    }

    #[rstest]
    #[case("org.acme.Cat")]
    #[case("org.acme.Date")]
    #[case("java.util.List<java.lang.String>")]
    #[case("java.lang.Object")]
    fn test_composite(#[case] input: &str) {
        assert_eq!(classify_str(input), Classification::Composite);
    }

    #[test]
    fn test_is_string_only_matches_text() {
        assert!(is_string(&TypeDescriptor::new("java.lang.String")));
        assert!(!is_string(&TypeDescriptor::new("java.lang.Character")));
        assert!(!is_string(&TypeDescriptor::new("org.acme.String")));
    }
}
