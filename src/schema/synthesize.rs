//! Example synthesis
//!
//! Strategies run in a fixed order and the first one that yields at least one
//! value wins. Fetch failures inside the sampling strategies are logged and
//! treated as "no examples", so one bad field never aborts an export.

use super::types::{ExampleSource, FieldDescriptor, FieldSchema, SimplifiedType};
use crate::error::{Error, Result};
use crate::source::DataSource;
use crate::types::{JsonValue, PRIMARY_KEY_FIELD};
use tracing::{debug, warn};

/// Order in which strategies are attempted before falling back to the default
pub const STRATEGY_CHAIN: [ExampleSource; 5] = [
    ExampleSource::ChoicesOptions,
    ExampleSource::Constraints,
    ExampleSource::Standard,
    ExampleSource::RelationData,
    ExampleSource::DatabaseValues,
];

/// Synthesizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesizerConfig {
    /// Maximum number of examples per field (at least 1)
    pub sample_size: usize,
    /// Query the data source for relation and record samples
    pub live_sampling: bool,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            sample_size: 5,
            live_sampling: true,
        }
    }
}

/// Produces the examples for classified fields
pub struct ExampleSynthesizer<'a, D: DataSource + ?Sized> {
    source: &'a D,
    config: SynthesizerConfig,
}

impl<'a, D: DataSource + ?Sized> ExampleSynthesizer<'a, D> {
    /// Create a synthesizer reading samples from `source`
    pub fn new(source: &'a D, config: SynthesizerConfig) -> Self {
        Self { source, config }
    }

    /// Build the field schema for a classified field
    pub async fn synthesize(
        &self,
        collection: &str,
        descriptor: &FieldDescriptor,
        simplified: SimplifiedType,
    ) -> FieldSchema {
        for strategy in STRATEGY_CHAIN {
            if let Some(examples) = self
                .attempt(strategy, collection, descriptor, simplified)
                .await
            {
                debug!(
                    "{}.{}: {} example(s) from {}",
                    collection,
                    descriptor.name,
                    examples.len(),
                    strategy
                );
                return FieldSchema::new(simplified, examples, strategy);
            }
        }

        FieldSchema::new(
            simplified,
            vec![default_example(descriptor, simplified)],
            ExampleSource::Default,
        )
    }

    /// Run one strategy; `None` means move on to the next one
    async fn attempt(
        &self,
        strategy: ExampleSource,
        collection: &str,
        descriptor: &FieldDescriptor,
        simplified: SimplifiedType,
    ) -> Option<Vec<JsonValue>> {
        let examples = match strategy {
            ExampleSource::ChoicesOptions => {
                collect_examples(descriptor.choices.iter().cloned(), self.sample_size())
            }
            ExampleSource::Constraints => {
                if !simplified.is_numeric() || !descriptor.constraints.is_set() {
                    return None;
                }
                vec![JsonValue::String(descriptor.constraints.describe_range())]
            }
            ExampleSource::Standard => {
                if simplified != SimplifiedType::Boolean {
                    return None;
                }
                vec![JsonValue::Bool(true), JsonValue::Bool(false)]
            }
            ExampleSource::RelationData => {
                if !simplified.is_relation() || !self.config.live_sampling {
                    return None;
                }
                self.sample_relation(collection, descriptor).await?
            }
            ExampleSource::DatabaseValues => {
                if simplified.is_relation() || !self.config.live_sampling {
                    return None;
                }
                self.sample_records(collection, descriptor).await?
            }
            ExampleSource::Default => return None,
        };

        (!examples.is_empty()).then_some(examples)
    }

    /// Display values of the related collection
    async fn sample_relation(
        &self,
        collection: &str,
        descriptor: &FieldDescriptor,
    ) -> Option<Vec<JsonValue>> {
        let related = match related_collection(collection, descriptor) {
            Ok(related) => related,
            Err(e) => {
                debug!("{}", e);
                return None;
            }
        };

        let display_field = self.display_field(related).await;

        match self
            .source
            .sample_field_values(related, &display_field, self.sample_size())
            .await
        {
            Ok(values) => Some(collect_examples(values, self.sample_size())),
            Err(e) => {
                warn!(
                    "Failed to sample {}.{} for relation {}.{}: {}",
                    related, display_field, collection, descriptor.name, e
                );
                None
            }
        }
    }

    /// Values of the field itself, one level of list nesting flattened
    async fn sample_records(
        &self,
        collection: &str,
        descriptor: &FieldDescriptor,
    ) -> Option<Vec<JsonValue>> {
        match self
            .source
            .sample_field_values(collection, &descriptor.name, self.sample_size())
            .await
        {
            Ok(values) => Some(collect_examples(flatten_once(values), self.sample_size())),
            Err(e) => {
                warn!(
                    "Failed to sample values for {}.{}: {}",
                    collection, descriptor.name, e
                );
                None
            }
        }
    }

    /// Explicit display field, else the first string/text field, else the key.
    ///
    /// A failed lookup moves on to the next rule.
    async fn display_field(&self, collection: &str) -> String {
        match self.source.display_field(collection).await {
            Ok(Some(field)) => return field,
            Ok(None) => {}
            Err(e) => warn!(
                "Failed to read display field of '{}', using its field list: {}",
                collection, e
            ),
        }

        let fields = match self.source.list_fields(collection).await {
            Ok(fields) => fields,
            Err(e) => {
                warn!(
                    "Failed to list fields of '{}', sampling '{}': {}",
                    collection, PRIMARY_KEY_FIELD, e
                );
                return PRIMARY_KEY_FIELD.to_string();
            }
        };

        if let Some(field) = fields
            .iter()
            .find(|f| matches!(f.storage_type.as_str(), "string" | "text"))
        {
            return field.name.clone();
        }

        fields
            .iter()
            .find(|f| f.primary_key)
            .map_or_else(|| PRIMARY_KEY_FIELD.to_string(), |f| f.name.clone())
    }

    fn sample_size(&self) -> usize {
        self.config.sample_size.max(1)
    }
}

fn related_collection<'d>(collection: &str, descriptor: &'d FieldDescriptor) -> Result<&'d str> {
    descriptor
        .related_collection
        .as_deref()
        .filter(|related| !related.is_empty())
        .ok_or_else(|| {
            Error::unresolvable_relation(
                collection,
                &descriptor.name,
                "no related collection declared",
            )
        })
}

fn flatten_once(values: Vec<JsonValue>) -> impl Iterator<Item = JsonValue> {
    values.into_iter().flat_map(|value| match value {
        JsonValue::Array(items) => items,
        other => vec![other],
    })
}

/// Keep scalar candidates the first time they are seen, up to `limit`.
///
/// Nulls, lists and objects are dropped rather than compared.
pub fn collect_examples<I>(candidates: I, limit: usize) -> Vec<JsonValue>
where
    I: IntoIterator<Item = JsonValue>,
{
    let mut examples = Vec::new();
    for value in candidates {
        if examples.len() >= limit {
            break;
        }
        if matches!(
            value,
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_)
        ) {
            continue;
        }
        if !examples.contains(&value) {
            examples.push(value);
        }
    }
    examples
}

/// Placeholder used when no strategy produced anything
pub fn default_example(descriptor: &FieldDescriptor, simplified: SimplifiedType) -> JsonValue {
    let text = match simplified {
        SimplifiedType::Datetime => "YYYY-MM-DD HH:mm:ss".to_string(),
        SimplifiedType::Date => "YYYY-MM-DD".to_string(),
        SimplifiedType::Time => "HH:mm:ss".to_string(),
        SimplifiedType::File => "File reference".to_string(),
        SimplifiedType::Relation
        | SimplifiedType::RelationM2o
        | SimplifiedType::RelationO2m
        | SimplifiedType::RelationM2m => {
            relation_marker(simplified, descriptor.related_collection.as_deref())
        }
        other => format!("No examples available for {other}"),
    };
    JsonValue::String(text)
}

fn relation_marker(simplified: SimplifiedType, related: Option<&str>) -> String {
    let kind = match simplified {
        SimplifiedType::RelationM2o => "Many-to-one relation",
        SimplifiedType::RelationO2m => "One-to-many relation",
        SimplifiedType::RelationM2m => "Many-to-many relation",
        _ => "Relation",
    };
    match related {
        Some(collection) if !collection.is_empty() => format!("{kind} to {collection}"),
        _ => format!("{kind} (target collection unknown)"),
    }
}
