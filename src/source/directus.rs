//! Directus REST data source

use super::DataSource;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::schema::{Constraints, FieldDescriptor};
use crate::types::{is_system_name, JsonValue};
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Number;
use std::sync::LazyLock;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// `{{ field }}` placeholders in a display template
static TEMPLATE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("display template pattern is valid")
});

/// Every Directus response wraps its payload in `data`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    collection: String,
    #[serde(default)]
    meta: Option<RawCollectionMeta>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCollectionMeta {
    #[serde(default)]
    display_template: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    field: String,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    meta: Option<RawFieldMeta>,
    #[serde(default)]
    schema: Option<RawFieldSchema>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFieldMeta {
    #[serde(default)]
    interface: Option<String>,
    #[serde(default)]
    options: Option<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFieldSchema {
    #[serde(default)]
    is_primary_key: bool,
    #[serde(default)]
    foreign_key_table: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRelation {
    collection: String,
    field: String,
    #[serde(default)]
    related_collection: Option<String>,
    #[serde(default)]
    meta: Option<RawRelationMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawRelationMeta {
    #[serde(default)]
    one_field: Option<String>,
    #[serde(default)]
    junction_field: Option<String>,
}

/// Data source backed by a Directus instance
#[derive(Debug)]
pub struct DirectusSource {
    client: HttpClient,
    relations: OnceCell<Vec<RawRelation>>,
}

impl DirectusSource {
    /// Wrap an already configured HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            relations: OnceCell::new(),
        }
    }

    /// Connect to `base_url` with default HTTP settings
    pub fn connect(base_url: &str, auth: AuthConfig) -> Result<Self> {
        let config = HttpClientConfig::builder().base_url(base_url).build();
        Ok(Self::new(HttpClient::with_auth(config, auth)?))
    }

    /// Check that the server answers at all
    pub async fn ping(&self) -> Result<()> {
        self.client.get("/server/ping").await?;
        Ok(())
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        let body: JsonValue = self.client.get_json_with_config(path, config).await?;
        let envelope: Envelope<T> = serde_json::from_value(body)
            .map_err(|e| Error::decode(format!("Unexpected response from {path}: {e}")))?;
        Ok(envelope.data)
    }

    /// All relations, fetched once per source.
    ///
    /// A failed fetch is cached as an empty list, leaving relation targets to
    /// the foreign-key fallback for the rest of the run.
    async fn relations(&self) -> &[RawRelation] {
        self.relations
            .get_or_init(|| async {
                match self.get_data("/relations", RequestConfig::new()).await {
                    Ok(relations) => relations,
                    Err(e) => {
                        warn!(
                            "Could not load relations, relation targets limited to foreign keys: {}",
                            e
                        );
                        Vec::new()
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl DataSource for DirectusSource {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections: Vec<RawCollection> =
            self.get_data("/collections", RequestConfig::new()).await?;

        Ok(collections
            .into_iter()
            .map(|c| c.collection)
            .filter(|name| !is_system_name(name))
            .collect())
    }

    async fn list_fields(&self, collection: &str) -> Result<Vec<FieldDescriptor>> {
        let fields: Vec<RawField> = self
            .get_data(&format!("/fields/{collection}"), RequestConfig::new())
            .await?;

        let relations = self.relations().await;

        Ok(fields
            .into_iter()
            .map(|raw| to_descriptor(collection, raw, relations))
            .collect())
    }

    async fn sample_field_values(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> Result<Vec<JsonValue>> {
        let config = RequestConfig::new()
            .query("fields", field)
            .query("limit", limit.to_string());
        let data: JsonValue = self
            .get_data(&format!("/items/{collection}"), config)
            .await?;

        // Singleton collections return one object instead of a list
        let records = match data {
            JsonValue::Array(records) => records,
            JsonValue::Null => Vec::new(),
            record => vec![record],
        };

        debug!(
            "Sampled {} record(s) of {}.{}",
            records.len(),
            collection,
            field
        );

        Ok(records
            .into_iter()
            .take(limit)
            .map(|record| record.get(field).cloned().unwrap_or(JsonValue::Null))
            .collect())
    }

    async fn display_field(&self, collection: &str) -> Result<Option<String>> {
        let info: RawCollection = self
            .get_data(&format!("/collections/{collection}"), RequestConfig::new())
            .await?;

        Ok(info
            .meta
            .and_then(|meta| meta.display_template)
            .and_then(|template| template_field(&template)))
    }
}

/// First top-level field referenced by a display template
fn template_field(template: &str) -> Option<String> {
    TEMPLATE_FIELD
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|field| !field.contains('.'))
}

fn to_descriptor(collection: &str, raw: RawField, relations: &[RawRelation]) -> FieldDescriptor {
    let meta = raw.meta.unwrap_or_default();
    let schema = raw.schema.unwrap_or_default();
    let options = meta.options.unwrap_or(JsonValue::Null);

    let related_collection =
        resolve_related(collection, &raw.field, relations).or(schema.foreign_key_table);

    FieldDescriptor {
        storage_type: raw.field_type.unwrap_or_else(|| "unknown".to_string()),
        interface: meta.interface,
        constraints: Constraints::new(
            bound(&options, &["min", "minValue"]),
            bound(&options, &["max", "maxValue"]),
        ),
        choices: choices(&options),
        related_collection,
        primary_key: schema.is_primary_key,
        name: raw.field,
    }
}

/// Target collection of a relational field.
///
/// Many-to-one: the relation stored on this field. One-to-many: the relation
/// whose `one_field` is this field, pointing at the many side, or through the
/// junction to its other side for many-to-many.
fn resolve_related(collection: &str, field: &str, relations: &[RawRelation]) -> Option<String> {
    if let Some(related) = relations
        .iter()
        .find(|r| r.collection == collection && r.field == field)
        .and_then(|r| r.related_collection.clone())
    {
        return Some(related);
    }

    let reverse = relations.iter().find(|r| {
        r.related_collection.as_deref() == Some(collection)
            && r.meta.as_ref().and_then(|m| m.one_field.as_deref()) == Some(field)
    })?;

    if let Some(junction_field) = reverse.meta.as_ref().and_then(|m| m.junction_field.as_deref()) {
        return relations
            .iter()
            .find(|r| r.collection == reverse.collection && r.field == junction_field)
            .and_then(|r| r.related_collection.clone());
    }

    Some(reverse.collection.clone())
}

/// Choice values from widget options (`{"text", "value"}` objects or bare values)
fn choices(options: &JsonValue) -> Vec<JsonValue> {
    options
        .get("choices")
        .and_then(JsonValue::as_array)
        .map(|choices| {
            choices
                .iter()
                .filter_map(|choice| match choice {
                    JsonValue::Object(map) => map.get("value").cloned(),
                    other => Some(other.clone()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First numeric bound found under any of `keys`
fn bound(options: &JsonValue, keys: &[&str]) -> Option<Number> {
    keys.iter()
        .filter_map(|key| options.get(*key))
        .find_map(|value| match value {
            JsonValue::Number(n) => Some(n.clone()),
            JsonValue::String(s) => s.trim().parse::<Number>().ok(),
            _ => None,
        })
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use serde_json::json;

    fn relation(collection: &str, field: &str, related: &str, meta: JsonValue) -> RawRelation {
        serde_json::from_value(json!({
            "collection": collection,
            "field": field,
            "related_collection": related,
            "meta": meta,
        }))
        .unwrap()
    }

    #[test]
    fn test_template_field() {
        assert_eq!(template_field("{{name}}"), Some("name".to_string()));
        assert_eq!(
            template_field("{{ brand.name }} {{ model }}"),
            Some("model".to_string())
        );
        assert_eq!(template_field("plain text"), None);
    }

    #[test]
    fn test_choices_objects_and_scalars() {
        let options = json!({
            "choices": [
                {"text": "Diesel", "value": "diesel"},
                {"text": "No value"},
                "hybrid",
                3
            ]
        });
        assert_eq!(choices(&options), vec![json!("diesel"), json!("hybrid"), json!(3)]);
        assert!(choices(&JsonValue::Null).is_empty());
    }

    #[test]
    fn test_bound_parsing() {
        let options = json!({"min": 1900, "maxValue": "2.5"});
        assert_eq!(bound(&options, &["min", "minValue"]), Some(Number::from(1900)));
        assert_eq!(
            bound(&options, &["max", "maxValue"]).map(|n| n.to_string()),
            Some("2.5".to_string())
        );
        assert_eq!(bound(&json!({"min": null}), &["min"]), None);
    }

    #[test]
    fn test_resolve_related() {
        let relations = vec![
            relation("vehicles", "brand", "brands", json!({"one_field": "vehicles"})),
            relation(
                "vehicles_features",
                "vehicles_id",
                "vehicles",
                json!({"one_field": "features", "junction_field": "features_id"}),
            ),
            relation(
                "vehicles_features",
                "features_id",
                "features",
                json!({"one_field": null, "junction_field": "vehicles_id"}),
            ),
        ];

        assert_eq!(
            resolve_related("vehicles", "brand", &relations),
            Some("brands".to_string())
        );
        assert_eq!(
            resolve_related("brands", "vehicles", &relations),
            Some("vehicles".to_string())
        );
        assert_eq!(
            resolve_related("vehicles", "features", &relations),
            Some("features".to_string())
        );
        assert_eq!(resolve_related("vehicles", "price", &relations), None);
    }
}
