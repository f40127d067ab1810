//! Integration tests using a mock Directus server
//!
//! Tests the full flow: REST metadata → classification → examples → JSON file

use directus_schema_export::auth::AuthConfig;
use directus_schema_export::export::{write_schema, ExportConfig, SchemaExporter};
use directus_schema_export::http::{HttpClient, HttpClientConfig};
use directus_schema_export::source::DirectusSource;
use directus_schema_export::Error;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_items(server: &MockServer, collection: &str, field: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/items/{collection}")))
        .and(query_param("fields", field))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

fn field(name: &str, field_type: &str, meta: Value, schema: Value) -> Value {
    json!({"field": name, "type": field_type, "meta": meta, "schema": schema})
}

/// A small car catalogue: vehicles → brands (m2o), vehicles ↔ features (m2m)
async fn car_catalogue() -> MockServer {
    let server = MockServer::start().await;

    mount(
        &server,
        "/collections",
        json!({"data": [
            {"collection": "directus_users"},
            {"collection": "vehicles"},
            {"collection": "brands"}
        ]}),
    )
    .await;

    mount(
        &server,
        "/fields/vehicles",
        json!({"data": [
            field("id", "integer", json!({"interface": "input"}), json!({"is_primary_key": true})),
            field("make", "string", json!({
                "interface": "select-dropdown",
                "options": {"choices": [
                    {"text": "BMW", "value": "BMW"},
                    {"text": "Toyota", "value": "Toyota"}
                ]}
            }), json!({})),
            field("year", "integer", json!({"interface": "input", "options": {"min": 1900}}), json!({})),
            field("brand", "integer", json!({"interface": "select-dropdown-m2o"}), json!({})),
            field("price", "decimal", json!({"interface": "input"}), json!({})),
            field("used", "boolean", json!({"interface": "boolean"}), json!({})),
            field("registered", "timestamp", json!({"interface": "datetime"}), json!({})),
            field("photo", "uuid", json!({"interface": "file-image"}), json!({"foreign_key_table": "directus_files"})),
            field("features", "alias", json!({"interface": "list-m2m", "special": ["m2m"]}), Value::Null)
        ]}),
    )
    .await;

    mount(
        &server,
        "/fields/brands",
        json!({"data": [
            field("id", "integer", json!(null), json!({"is_primary_key": true})),
            field("name", "string", json!({"interface": "input"}), json!({}))
        ]}),
    )
    .await;

    mount(
        &server,
        "/relations",
        json!({"data": [
            {"collection": "vehicles", "field": "brand", "related_collection": "brands", "meta": {"one_field": null}},
            {"collection": "vehicles_features", "field": "vehicles_id", "related_collection": "vehicles",
             "meta": {"one_field": "features", "junction_field": "features_id"}},
            {"collection": "vehicles_features", "field": "features_id", "related_collection": "features",
             "meta": {"one_field": null, "junction_field": "vehicles_id"}}
        ]}),
    )
    .await;

    mount(
        &server,
        "/collections/brands",
        json!({"data": {"collection": "brands", "meta": {"display_template": "{{name}}"}}}),
    )
    .await;

    mount_items(
        &server,
        "brands",
        "name",
        json!([{"name": "BMW"}, {"name": "Audi"}, {"name": "BMW"}]),
    )
    .await;
    mount_items(
        &server,
        "vehicles",
        "price",
        json!([{"price": 19999.5}, {"price": null}, {"price": 25000}]),
    )
    .await;
    mount_items(&server, "vehicles", "photo", json!([{"photo": "a1b2"}])).await;

    Mock::given(method("GET"))
        .and(path("/items/vehicles"))
        .and(query_param("fields", "registered"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    server
}

fn expected_catalogue() -> Value {
    json!({
        "brands": {
            "name": {"type": "string", "examples": ["BMW", "Audi"], "source": "database-values"}
        },
        "vehicles": {
            "brand": {"type": "relation-m2o", "examples": ["BMW", "Audi"], "source": "relation-data"},
            "features": {"type": "relation-m2m", "examples": ["Many-to-many relation to features"], "source": "default"},
            "make": {"type": "string", "examples": ["BMW", "Toyota"], "source": "choices-options"},
            "photo": {"type": "file", "examples": ["a1b2"], "source": "database-values"},
            "price": {"type": "float", "examples": [19999.5, 25000], "source": "database-values"},
            "registered": {"type": "datetime", "examples": ["YYYY-MM-DD HH:mm:ss"], "source": "default"},
            "used": {"type": "boolean", "examples": [true, false], "source": "standard"},
            "year": {"type": "integer", "examples": ["Range: 1900 to unlimited"], "source": "constraints"}
        }
    })
}

#[tokio::test]
async fn test_export_car_catalogue() {
    let server = car_catalogue().await;
    let source = DirectusSource::connect(&server.uri(), AuthConfig::None).unwrap();

    let mut exporter = SchemaExporter::new(source, ExportConfig::with_sample_size(5));
    let schema = exporter.export().await.unwrap();

    assert_eq!(serde_json::to_value(&schema).unwrap(), expected_catalogue());
    assert_eq!(exporter.summary().collections, 2);
    assert_eq!(exporter.summary().fields, 9);
}

#[tokio::test]
async fn test_export_is_repeatable_and_written_to_disk() {
    let server = car_catalogue().await;
    let source = DirectusSource::connect(&server.uri(), AuthConfig::None).unwrap();
    let mut exporter = SchemaExporter::new(source, ExportConfig::with_sample_size(5));

    let first = exporter.export().await.unwrap();
    let second = exporter.export().await.unwrap();
    assert_eq!(first, second);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    write_schema(&path, &first).await.unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, expected_catalogue());
}

#[tokio::test]
async fn test_relation_sampled_when_display_template_forbidden() {
    let server = MockServer::start().await;

    mount(&server, "/collections", json!({"data": [{"collection": "vehicles"}]})).await;
    mount(
        &server,
        "/fields/vehicles",
        json!({"data": [
            field("brand", "integer", json!({"interface": "select-dropdown-m2o"}), json!({}))
        ]}),
    )
    .await;
    mount(
        &server,
        "/fields/brands",
        json!({"data": [
            field("id", "integer", json!(null), json!({"is_primary_key": true})),
            field("name", "string", json!({"interface": "input"}), json!({}))
        ]}),
    )
    .await;
    mount(
        &server,
        "/relations",
        json!({"data": [{"collection": "vehicles", "field": "brand", "related_collection": "brands"}]}),
    )
    .await;
    mount_items(&server, "brands", "name", json!([{"name": "BMW"}, {"name": "Audi"}])).await;

    Mock::given(method("GET"))
        .and(path("/collections/brands"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{"message": "You don't have permission to access this."}]
        })))
        .mount(&server)
        .await;

    let source = DirectusSource::connect(&server.uri(), AuthConfig::None).unwrap();
    let mut exporter = SchemaExporter::new(source, ExportConfig::with_sample_size(5));
    let schema = exporter.export().await.unwrap();

    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "vehicles": {
                "brand": {"type": "relation-m2o", "examples": ["BMW", "Audi"], "source": "relation-data"}
            }
        })
    );
}

#[tokio::test]
async fn test_export_with_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"access_token": "session", "expires": 900_000, "refresh_token": "r"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collections"))
        .and(header("Authorization", "Bearer session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"collection": "settings"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fields/settings"))
        .and(header("Authorization", "Bearer session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"field": "launched", "type": "date", "meta": {"interface": "datetime"}}]
        })))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let client = HttpClient::with_auth(
        config,
        AuthConfig::Login {
            login_url: format!("{}/auth/login", server.uri()),
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        },
    )
    .unwrap();

    let mut exporter = SchemaExporter::new(DirectusSource::new(client), ExportConfig::default());
    let schema = exporter.export().await.unwrap();

    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "settings": {
                "launched": {"type": "date", "examples": ["YYYY-MM-DD"], "source": "default"}
            }
        })
    );
}

#[tokio::test]
async fn test_export_aborts_on_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"message": "Invalid user credentials."}]
        })))
        .mount(&server)
        .await;

    let source = DirectusSource::connect(
        &server.uri(),
        AuthConfig::Bearer {
            token: "wrong".to_string(),
        },
    )
    .unwrap();
    let mut exporter = SchemaExporter::new(source, ExportConfig::default());

    let err = exporter.export().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
}

#[tokio::test]
async fn test_export_without_live_sampling() {
    let server = car_catalogue().await;
    let source = DirectusSource::connect(&server.uri(), AuthConfig::None).unwrap();

    let mut config = ExportConfig::with_sample_size(5);
    config.synthesizer.live_sampling = false;
    config.collections = vec!["vehicles".to_string()];

    let mut exporter = SchemaExporter::new(source, config);
    let schema = exporter.export().await.unwrap();
    let vehicles = &schema["vehicles"];

    assert_eq!(vehicles["brand"].examples, vec![json!("Many-to-one relation to brands")]);
    assert_eq!(vehicles["price"].examples, vec![json!("No examples available for float")]);
    assert_eq!(vehicles["photo"].examples, vec![json!("File reference")]);
    assert_eq!(vehicles["make"].examples, vec![json!("BMW"), json!("Toyota")]);
    assert!(!schema.contains_key("brands"));
}
