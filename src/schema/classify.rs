//! Field classification
//!
//! Interface hints are checked first, in table order. The storage type is
//! only looked up when no widget rule matches, so an `alias` bound to
//! `list-o2m` classifies as `relation-o2m`.

use super::types::{FieldDescriptor, SimplifiedType};

/// Interface hints that map straight to a type tag
struct InterfaceRule {
    hints: &'static [&'static str],
    simplified: SimplifiedType,
}

/// First matching rule wins
const INTERFACE_RULES: &[InterfaceRule] = &[
    InterfaceRule {
        hints: &["file", "file-image", "files"],
        simplified: SimplifiedType::File,
    },
    InterfaceRule {
        hints: &["select-dropdown-m2o", "many-to-one"],
        simplified: SimplifiedType::RelationM2o,
    },
    InterfaceRule {
        hints: &["list-o2m", "list-o2m-tree-view", "one-to-many"],
        simplified: SimplifiedType::RelationO2m,
    },
    InterfaceRule {
        hints: &["list-m2m", "list-m2a", "many-to-many"],
        simplified: SimplifiedType::RelationM2m,
    },
];

/// Storage type lookup; anything missing is a string
const STORAGE_TYPES: &[(&str, SimplifiedType)] = &[
    ("string", SimplifiedType::String),
    ("text", SimplifiedType::String),
    ("uuid", SimplifiedType::String),
    ("hash", SimplifiedType::String),
    ("integer", SimplifiedType::Integer),
    ("bigInteger", SimplifiedType::Integer),
    ("float", SimplifiedType::Float),
    ("decimal", SimplifiedType::Float),
    ("boolean", SimplifiedType::Boolean),
    ("timestamp", SimplifiedType::Datetime),
    ("dateTime", SimplifiedType::Datetime),
    ("date", SimplifiedType::Date),
    ("time", SimplifiedType::Time),
    ("json", SimplifiedType::Object),
    ("geometry", SimplifiedType::Object),
    ("csv", SimplifiedType::Array),
    ("alias", SimplifiedType::Relation),
];

/// Classify a field from its metadata
pub fn classify(descriptor: &FieldDescriptor) -> SimplifiedType {
    descriptor
        .interface
        .as_deref()
        .and_then(classify_interface)
        .unwrap_or_else(|| classify_storage(&descriptor.storage_type))
}

/// Type implied by a widget, if the widget is one the rules know
pub fn classify_interface(interface: &str) -> Option<SimplifiedType> {
    INTERFACE_RULES
        .iter()
        .find(|rule| rule.hints.contains(&interface))
        .map(|rule| rule.simplified)
}

/// Type implied by a storage type
pub fn classify_storage(storage_type: &str) -> SimplifiedType {
    STORAGE_TYPES
        .iter()
        .find(|(name, _)| *name == storage_type)
        .map_or(SimplifiedType::String, |(_, simplified)| *simplified)
}
