//! Backing-field and accessor naming conventions.
//!
//! Two field prefixes are recognized when deriving a property name (`_` then
//! `m_`), but only `_` is produced when going back to a field name. Legacy
//! `m_` fields therefore do not round-trip.

pub const FIELD_PREFIX_UNDERSCORE: &str = "_";
pub const FIELD_PREFIX_M_UNDERSCORE: &str = "m_";

/// Public accessor name for a field-style identifier.
///
/// `_foo` and `m_foo` both become `Foo`; any other name only has its
/// first character upper-cased.
pub fn to_property_name(field_name: &str) -> String {
    if let Some(rest) = field_name.strip_prefix(FIELD_PREFIX_UNDERSCORE) {
        return to_title_case(rest);
    }

    if let Some(rest) = field_name.strip_prefix(FIELD_PREFIX_M_UNDERSCORE) {
        return to_title_case(rest);
    }

    to_title_case(field_name)
}

/// Backing-field name for an accessor: `_` plus the name with a lower-cased first character.
pub fn to_field_name(property_name: &str) -> String {
    format!("{FIELD_PREFIX_UNDERSCORE}{}", to_lower_case(property_name))
}

/// Upper-case the first character.
pub fn to_title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character.
pub fn to_lower_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_property_names() {
        assert_eq!(to_property_name("_foo"), "Foo");
        assert_eq!(to_property_name("m_foo"), "Foo");
        assert_eq!(to_property_name("foo"), "Foo");
        assert_eq!(to_property_name("SetText"), "SetText");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(to_field_name("Foo"), "_foo");
        assert_eq!(to_field_name("foo"), "_foo");
    }

    #[test]
    fn test_underscore_round_trips() {
        assert_eq!(to_field_name(&to_property_name("_foo")), "_foo");
    }

    #[test]
    fn test_m_prefix_does_not_round_trip() {
        // Deliberate: `m_` is read but never written.
        assert_eq!(to_field_name(&to_property_name("m_foo")), "_foo");
        assert_ne!(to_field_name(&to_property_name("m_foo")), "m_foo");
    }

    #[test]
    fn test_underscore_checked_before_m_prefix() {
        assert_eq!(to_property_name("_m_value"), "M_value");
    }

    proptest! {
        #[test]
        fn prop_underscore_round_trip(name in "[a-z][a-zA-Z0-9]{0,12}") {
            let field = format!("_{name}");
            prop_assert_eq!(to_field_name(&to_property_name(&field)), field);
        }

        #[test]
        fn prop_property_name_starts_upper(name in "(_|m_)?[a-z][a-zA-Z0-9]{0,12}") {
            let property = to_property_name(&name);
            prop_assert!(property.chars().next().map_or(false, |c| c.is_ascii_uppercase()));
        }
    }
}
