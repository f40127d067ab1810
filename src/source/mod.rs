//! Data sources
//!
//! The exporter never talks HTTP itself; it goes through a `DataSource`.
//!
//! - `DirectusSource` reads a live backend over its REST API
//! - `InMemorySource` serves a snapshot file or test fixture

mod directus;
mod memory;

pub use directus::DirectusSource;
pub use memory::{CollectionFixture, InMemorySource};

use crate::error::Result;
use crate::schema::FieldDescriptor;
use crate::types::JsonValue;
use async_trait::async_trait;

/// Read access to the backend's structure and records
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Names of the user collections (backend-internal ones excluded)
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Field metadata of a collection, in backend order
    async fn list_fields(&self, collection: &str) -> Result<Vec<FieldDescriptor>>;

    /// Up to `limit` raw values of `field` from arbitrary records.
    ///
    /// Values may be null or composite.
    async fn sample_field_values(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> Result<Vec<JsonValue>>;

    /// Field the backend marks as the collection's display field, if any
    async fn display_field(&self, _collection: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Box<T> {
    async fn list_collections(&self) -> Result<Vec<String>> {
        (**self).list_collections().await
    }

    async fn list_fields(&self, collection: &str) -> Result<Vec<FieldDescriptor>> {
        (**self).list_fields(collection).await
    }

    async fn sample_field_values(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> Result<Vec<JsonValue>> {
        (**self).sample_field_values(collection, field, limit).await
    }

    async fn display_field(&self, collection: &str) -> Result<Option<String>> {
        (**self).display_field(collection).await
    }
}
