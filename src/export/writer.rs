//! Schema file writer

use crate::error::{Error, Result};
use crate::schema::ExportedSchema;
use std::path::Path;

/// Render the schema as 2-space indented JSON
pub fn to_json_pretty(schema: &ExportedSchema) -> Result<String> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Write the schema to `path` as UTF-8 JSON
pub async fn write_schema(path: impl AsRef<Path>, schema: &ExportedSchema) -> Result<()> {
    let path = path.as_ref();
    let mut contents = to_json_pretty(schema)?;
    contents.push('\n');

    // Write to temp file first, then rename for atomicity
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &contents)
        .await
        .map_err(|e| Error::output(format!("Failed to write schema file: {e}")))?;

    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| Error::output(format!("Failed to rename schema file: {e}")))?;

    Ok(())
}
