//! Schema types

use crate::types::{is_system_name, JsonValue, PRIMARY_KEY_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

/// Simplified type tag assigned to every field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimplifiedType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "datetime")]
    Datetime,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "file")]
    File,
    /// Alias field with no relation widget bound
    #[serde(rename = "relation")]
    Relation,
    #[serde(rename = "relation-m2o")]
    RelationM2o,
    #[serde(rename = "relation-o2m")]
    RelationO2m,
    #[serde(rename = "relation-m2m")]
    RelationM2m,
}

impl SimplifiedType {
    /// Tag as it appears in the exported schema
    pub fn as_str(self) -> &'static str {
        match self {
            SimplifiedType::String => "string",
            SimplifiedType::Integer => "integer",
            SimplifiedType::Float => "float",
            SimplifiedType::Boolean => "boolean",
            SimplifiedType::Date => "date",
            SimplifiedType::Time => "time",
            SimplifiedType::Datetime => "datetime",
            SimplifiedType::Object => "object",
            SimplifiedType::Array => "array",
            SimplifiedType::File => "file",
            SimplifiedType::Relation => "relation",
            SimplifiedType::RelationM2o => "relation-m2o",
            SimplifiedType::RelationO2m => "relation-o2m",
            SimplifiedType::RelationM2m => "relation-m2m",
        }
    }

    /// Any of the relation tags
    pub fn is_relation(self) -> bool {
        self.as_str().starts_with("relation")
    }

    /// Integer or float
    pub fn is_numeric(self) -> bool {
        matches!(self, SimplifiedType::Integer | SimplifiedType::Float)
    }
}

impl std::fmt::Display for SimplifiedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Strategy that produced a field's examples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExampleSource {
    /// Literal choices configured on the field's widget
    ChoicesOptions,
    /// Synthetic range text built from numeric bounds
    Constraints,
    /// Canonical values (booleans)
    Standard,
    /// Display values sampled from the related collection
    RelationData,
    /// Values sampled from the field's own records
    DatabaseValues,
    /// Type-specific placeholder
    Default,
}

impl std::fmt::Display for ExampleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExampleSource::ChoicesOptions => "choices-options",
            ExampleSource::Constraints => "constraints",
            ExampleSource::Standard => "standard",
            ExampleSource::RelationData => "relation-data",
            ExampleSource::DatabaseValues => "database-values",
            ExampleSource::Default => "default",
        };
        f.pad(name)
    }
}

/// Numeric bounds declared on a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
}

impl Constraints {
    /// Create constraints from optional bounds
    pub fn new(min: Option<Number>, max: Option<Number>) -> Self {
        Self { min, max }
    }

    /// Either bound is set
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Render as `Range: {min} to {max}`, unset bounds as `unlimited`
    pub fn describe_range(&self) -> String {
        let bound = |b: &Option<Number>| {
            b.as_ref()
                .map_or_else(|| "unlimited".to_string(), Number::to_string)
        };
        format!("Range: {} to {}", bound(&self.min), bound(&self.max))
    }
}

/// Raw metadata for a single field, as reported by the data source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its collection
    pub name: String,

    /// Backend storage type (string, integer, timestamp, alias, ...)
    #[serde(rename = "type")]
    pub storage_type: String,

    /// UI widget bound to the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,

    /// Numeric bounds
    #[serde(default)]
    pub constraints: Constraints,

    /// Allowed literal values, in configured order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<JsonValue>,

    /// Target collection when the field is a relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_collection: Option<String>,

    /// Primary key flag
    #[serde(default)]
    pub primary_key: bool,
}

impl FieldDescriptor {
    /// Create a descriptor with a name and storage type
    pub fn new(name: impl Into<String>, storage_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_type: storage_type.into(),
            ..Self::default()
        }
    }

    /// Set the interface hint
    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Set the static choices
    #[must_use]
    pub fn with_choices(mut self, choices: Vec<JsonValue>) -> Self {
        self.choices = choices;
        self
    }

    /// Set the numeric bounds
    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the related collection
    #[must_use]
    pub fn with_related(mut self, collection: impl Into<String>) -> Self {
        self.related_collection = Some(collection.into());
        self
    }

    /// Mark as primary key
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Whether this field belongs in an exported collection schema
    pub fn is_exported(&self) -> bool {
        !(self.primary_key || self.name == PRIMARY_KEY_FIELD || is_system_name(&self.name))
    }
}

/// Exported description of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Simplified type tag
    #[serde(rename = "type")]
    pub simplified: SimplifiedType,

    /// Scalar examples in discovery order, no duplicates
    pub examples: Vec<JsonValue>,

    /// Strategy that produced the examples
    pub source: ExampleSource,
}

impl FieldSchema {
    /// Create a field schema
    pub fn new(simplified: SimplifiedType, examples: Vec<JsonValue>, source: ExampleSource) -> Self {
        Self {
            simplified,
            examples,
            source,
        }
    }
}

/// Field name → field schema
pub type CollectionSchema = BTreeMap<String, FieldSchema>;

/// Collection name → collection schema
pub type ExportedSchema = BTreeMap<String, CollectionSchema>;
