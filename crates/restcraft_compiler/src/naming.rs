//! Identifier case conversions used for operation ids and synthesized names

/// Kebab-case an operation name: a hyphen goes before every upper-case letter
/// that starts a capitalized word, then everything is lower-cased.
///
/// Runs of capitals stay glued (`getXMLData` becomes `getxml-data`).
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
        if i > 0 && ch.is_uppercase() && next_is_lower {
            result.push('-');
        }
        result.extend(ch.to_lowercase());
    }
    result
}

/// Upper-case the first character
pub fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Discriminator property carried by the subtypes of a concrete base
pub fn discriminator_property(base_simple_name: &str) -> String {
    format!("type_{}", base_simple_name.to_lowercase())
}
