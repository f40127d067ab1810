//! In-memory data source
//!
//! Serves collections from a snapshot file (YAML or JSON) or from fixtures
//! built in code. Failures can be injected per field or per collection.

use super::DataSource;
use crate::error::{Error, Result};
use crate::schema::FieldDescriptor;
use crate::types::{is_system_name, JsonValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// One collection of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionFixture {
    /// Explicit display field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,

    /// Field metadata, in backend order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Records (JSON objects)
    #[serde(default)]
    pub records: Vec<JsonValue>,
}

impl CollectionFixture {
    /// Create an empty fixture
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Add a record
    #[must_use]
    pub fn record(mut self, record: JsonValue) -> Self {
        self.records.push(record);
        self
    }

    /// Set the display field
    #[must_use]
    pub fn display_field(mut self, field: impl Into<String>) -> Self {
        self.display_field = Some(field.into());
        self
    }
}

/// Data source that never leaves the process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySource {
    /// Collections by name
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionFixture>,

    #[serde(skip)]
    failing_samples: BTreeSet<(String, String)>,

    #[serde(skip)]
    failing_collections: BTreeSet<String>,

    #[serde(skip)]
    failing_display: BTreeSet<String>,

    #[serde(skip)]
    offline: bool,
}

impl InMemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read snapshot '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_str(&content)
    }

    /// Parse a snapshot from YAML or JSON text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse snapshot: {e}")))
    }

    /// Add a collection
    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>, fixture: CollectionFixture) -> Self {
        self.collections.insert(name.into(), fixture);
        self
    }

    /// Make sampling of one field fail
    #[must_use]
    pub fn fail_sampling(mut self, collection: impl Into<String>, field: impl Into<String>) -> Self {
        self.failing_samples
            .insert((collection.into(), field.into()));
        self
    }

    /// Make field listing of one collection fail
    #[must_use]
    pub fn fail_fields(mut self, collection: impl Into<String>) -> Self {
        self.failing_collections.insert(collection.into());
        self
    }

    /// Make the display field lookup of one collection fail
    #[must_use]
    pub fn fail_display_field(mut self, collection: impl Into<String>) -> Self {
        self.failing_display.insert(collection.into());
        self
    }

    /// Make every call fail
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn unavailable(&self, what: &str) -> Error {
        Error::http_status(503, format!("{what} unavailable"))
    }

    fn collection(&self, name: &str) -> Result<&CollectionFixture> {
        self.collections
            .get(name)
            .ok_or_else(|| Error::CollectionNotFound {
                collection: name.to_string(),
            })
    }
}

#[async_trait]
impl DataSource for InMemorySource {
    async fn list_collections(&self) -> Result<Vec<String>> {
        if self.offline {
            return Err(self.unavailable("collections"));
        }
        Ok(self
            .collections
            .keys()
            .filter(|name| !is_system_name(name))
            .cloned()
            .collect())
    }

    async fn list_fields(&self, collection: &str) -> Result<Vec<FieldDescriptor>> {
        if self.offline || self.failing_collections.contains(collection) {
            return Err(self.unavailable(&format!("fields of '{collection}'")));
        }
        Ok(self.collection(collection)?.fields.clone())
    }

    async fn sample_field_values(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> Result<Vec<JsonValue>> {
        if self.offline
            || self
                .failing_samples
                .contains(&(collection.to_string(), field.to_string()))
        {
            return Err(self.unavailable(&format!("items of '{collection}'")));
        }
        Ok(self
            .collection(collection)?
            .records
            .iter()
            .take(limit)
            .map(|record| record.get(field).cloned().unwrap_or(JsonValue::Null))
            .collect())
    }

    async fn display_field(&self, collection: &str) -> Result<Option<String>> {
        if self.offline || self.failing_display.contains(collection) {
            return Err(self.unavailable(&format!("collection '{collection}'")));
        }
        Ok(self.collection(collection)?.display_field.clone())
    }
}
