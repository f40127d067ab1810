//! # Directus Schema Export
//!
//! Introspects the collections and fields of a Directus backend and produces
//! a compact, portable schema: one simplified type tag per field plus a short
//! list of representative example values.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use directus_schema_export::auth::AuthConfig;
//! use directus_schema_export::export::{write_schema, ExportConfig, SchemaExporter};
//! use directus_schema_export::source::DirectusSource;
//!
//! #[tokio::main]
//! async fn main() -> directus_schema_export::Result<()> {
//!     let source = DirectusSource::connect(
//!         "http://localhost:8055",
//!         AuthConfig::Bearer { token: "...".into() },
//!     )?;
//!
//!     let mut exporter = SchemaExporter::new(source, ExportConfig::with_sample_size(5));
//!     let schema = exporter.export().await?;
//!     write_schema("simplified_schema.json", &schema).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SchemaExporter                        │
//! │     list_collections → list_fields → classify → synthesize   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────────┬────────────┴─────────┬──────────────────────┐
//! │   Classifier   │      Synthesizer     │      DataSource      │
//! ├────────────────┼──────────────────────┼──────────────────────┤
//! │ Interface hint │ Choices              │ DirectusSource (HTTP)│
//! │ Storage type   │ Constraints          │ InMemorySource       │
//! │                │ Boolean              │                      │
//! │                │ Relation sample      │                      │
//! │                │ Live sample          │                      │
//! │                │ Default              │                      │
//! └────────────────┴──────────────────────┴──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and naming conventions
pub mod types;

/// Exporter configuration
pub mod config;

/// Authentication
pub mod auth;

/// HTTP client
pub mod http;

/// Field classification and example synthesis
pub mod schema;

/// Data sources (live backend, snapshots)
pub mod source;

/// Collection walk and schema file output
pub mod export;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use export::{ExportConfig, SchemaExporter};
pub use schema::{classify, ExportedSchema, FieldDescriptor, FieldSchema, SimplifiedType};
pub use source::DataSource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
