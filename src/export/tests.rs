//! Exporter tests

use super::*;
use crate::error::Error;
use crate::schema::{Constraints, FieldDescriptor, FieldSchema, SimplifiedType};
use crate::source::{CollectionFixture, InMemorySource};
use pretty_assertions::assert_eq;
use serde_json::{json, Number};

fn vehicles_source() -> InMemorySource {
    InMemorySource::new().with_collection(
        "vehicles",
        CollectionFixture::new()
            .field(FieldDescriptor::new("id", "integer").primary())
            .field(
                FieldDescriptor::new("make", "string")
                    .with_choices(vec![json!("BMW"), json!("Toyota")]),
            )
            .field(
                FieldDescriptor::new("year", "integer")
                    .with_constraints(Constraints::new(Some(Number::from(1900)), None)),
            ),
    )
}

#[tokio::test]
async fn test_export_vehicles() {
    let mut exporter = SchemaExporter::new(vehicles_source(), ExportConfig::with_sample_size(5));
    let schema = exporter.export().await.unwrap();

    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "vehicles": {
                "make": {"type": "string", "examples": ["BMW", "Toyota"], "source": "choices-options"},
                "year": {"type": "integer", "examples": ["Range: 1900 to unlimited"], "source": "constraints"}
            }
        })
    );

    let summary = exporter.summary();
    assert_eq!(summary.collections, 1);
    assert_eq!(summary.fields, 2);
    assert_eq!(summary.by_source.get(&ExampleSource::ChoicesOptions), Some(&1));
    assert_eq!(summary.by_source.get(&ExampleSource::Constraints), Some(&1));
}

#[tokio::test]
async fn test_export_skips_system_collections_and_fields() {
    let source = vehicles_source()
        .with_collection(
            "directus_users",
            CollectionFixture::new().field(FieldDescriptor::new("email", "string")),
        )
        .with_collection(
            "brands",
            CollectionFixture::new()
                .field(FieldDescriptor::new("id", "integer"))
                .field(FieldDescriptor::new("directus_sort", "integer"))
                .field(FieldDescriptor::new("name", "string"))
                .record(json!({"id": 1, "name": "Audi"})),
        );

    let mut exporter = SchemaExporter::new(source, ExportConfig::default());
    let schema = exporter.export().await.unwrap();

    assert_eq!(
        schema.keys().collect::<Vec<_>>(),
        vec!["brands", "vehicles"]
    );
    let brands = &schema["brands"];
    assert_eq!(brands.keys().collect::<Vec<_>>(), vec!["name"]);
    assert_eq!(
        brands["name"],
        FieldSchema::new(
            SimplifiedType::String,
            vec![json!("Audi")],
            ExampleSource::DatabaseValues
        )
    );
}

#[tokio::test]
async fn test_export_collection_filter() {
    let source = vehicles_source().with_collection("brands", CollectionFixture::new());
    let config = ExportConfig {
        collections: vec!["brands".to_string()],
        ..ExportConfig::default()
    };

    let mut exporter = SchemaExporter::new(source, config);
    let schema = exporter.export().await.unwrap();
    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["brands"]);
    assert!(schema["brands"].is_empty());
}

#[tokio::test]
async fn test_sampling_failure_does_not_abort() {
    let source = vehicles_source()
        .with_collection(
            "brands",
            CollectionFixture::new()
                .field(FieldDescriptor::new("name", "string"))
                .field(FieldDescriptor::new("founded", "date"))
                .record(json!({"name": "Audi", "founded": "1909-07-16"})),
        )
        .fail_sampling("brands", "founded");

    let mut exporter = SchemaExporter::new(source, ExportConfig::default());
    let schema = exporter.export().await.unwrap();

    assert_eq!(schema["brands"]["name"].examples, vec![json!("Audi")]);
    assert_eq!(schema["brands"]["founded"].source, ExampleSource::Default);
    assert_eq!(schema["brands"]["founded"].examples, vec![json!("YYYY-MM-DD")]);
}

#[tokio::test]
async fn test_field_listing_failure_aborts() {
    let source = vehicles_source().fail_fields("vehicles");
    let mut exporter = SchemaExporter::new(source, ExportConfig::default());

    let err = exporter.export().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_collection_listing_failure_aborts() {
    let mut exporter = SchemaExporter::new(InMemorySource::new().offline(), ExportConfig::default());
    assert!(matches!(
        exporter.export().await.unwrap_err(),
        Error::HttpStatus { status: 503, .. }
    ));
}

#[tokio::test]
async fn test_write_schema() {
    let mut exporter = SchemaExporter::new(vehicles_source(), ExportConfig::default());
    let schema = exporter.export().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simplified_schema.json");
    write_schema(&path, &schema).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("{\n  \"vehicles\": {\n    \"make\": {\n      \"type\": \"string\","));
    assert!(written.ends_with("}\n"));
    assert!(!dir.path().join("simplified_schema.tmp").exists());

    let parsed: ExportedSchema = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, schema);
}
