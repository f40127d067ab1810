//! Schema export
//!
//! Walks every user collection of a data source, classifies each field and
//! synthesizes its examples, strictly in order: collections one at a time,
//! fields one at a time.
//!
//! Failing to list collections or fields aborts the export. Failing to
//! sample a single field only degrades that field's examples.

mod writer;

pub use writer::{to_json_pretty, write_schema};

use crate::error::Result;
use crate::schema::{
    classify, CollectionSchema, ExampleSource, ExampleSynthesizer, ExportedSchema,
    SynthesizerConfig,
};
use crate::source::DataSource;
use crate::types::is_system_name;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Export settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Example settings handed to the synthesizer
    pub synthesizer: SynthesizerConfig,
    /// Only export these collections (empty = all)
    pub collections: Vec<String>,
}

impl ExportConfig {
    /// Config with the given sample size
    pub fn with_sample_size(sample_size: usize) -> Self {
        Self {
            synthesizer: SynthesizerConfig {
                sample_size,
                ..SynthesizerConfig::default()
            },
            ..Self::default()
        }
    }

    fn includes(&self, collection: &str) -> bool {
        self.collections.is_empty() || self.collections.iter().any(|c| c == collection)
    }
}

/// Counters for the last export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Collections exported
    pub collections: usize,
    /// Fields exported
    pub fields: usize,
    /// Fields per example source
    pub by_source: BTreeMap<ExampleSource, usize>,
    /// Wall time
    pub duration: Duration,
}

impl ExportSummary {
    fn record(&mut self, schema: &CollectionSchema) {
        self.collections += 1;
        self.fields += schema.len();
        for field in schema.values() {
            *self.by_source.entry(field.source).or_insert(0) += 1;
        }
    }
}

/// Drives classification and synthesis over a data source
pub struct SchemaExporter<D: DataSource> {
    source: D,
    config: ExportConfig,
    summary: ExportSummary,
}

impl<D: DataSource> SchemaExporter<D> {
    /// Create an exporter
    pub fn new(source: D, config: ExportConfig) -> Self {
        Self {
            source,
            config,
            summary: ExportSummary::default(),
        }
    }

    /// Counters for the last `export()` run
    pub fn summary(&self) -> &ExportSummary {
        &self.summary
    }

    /// Export every selected user collection
    pub async fn export(&mut self) -> Result<ExportedSchema> {
        let start = Instant::now();
        let mut summary = ExportSummary::default();
        let mut schema = ExportedSchema::new();

        let collections = self.source.list_collections().await?;
        for collection in collections {
            if is_system_name(&collection) || !self.config.includes(&collection) {
                debug!("Skipping collection: {}", collection);
                continue;
            }

            info!("Processing collection: {}", collection);
            let collection_schema = self.collection_schema(&collection).await?;
            summary.record(&collection_schema);
            schema.insert(collection, collection_schema);
        }

        summary.duration = start.elapsed();
        info!(
            "Exported {} collection(s), {} field(s) in {:?}",
            summary.collections, summary.fields, summary.duration
        );
        self.summary = summary;

        Ok(schema)
    }

    /// Export one collection
    pub async fn collection_schema(&self, collection: &str) -> Result<CollectionSchema> {
        let fields = self.source.list_fields(collection).await?;
        let synthesizer = ExampleSynthesizer::new(&self.source, self.config.synthesizer);

        let mut schema = CollectionSchema::new();
        for descriptor in fields.iter().filter(|f| f.is_exported()) {
            let simplified = classify(descriptor);
            let field_schema = synthesizer
                .synthesize(collection, descriptor, simplified)
                .await;
            schema.insert(descriptor.name.clone(), field_schema);
        }

        Ok(schema)
    }
}

#[cfg(test)]
mod tests;
