//! Common types used throughout the exporter
//!
//! Shared type aliases and naming conventions used across multiple modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Backend Naming Conventions
// ============================================================================

/// Prefix shared by backend-internal collections and fields
pub const SYSTEM_PREFIX: &str = "directus_";

/// Conventional name of the primary identifier field
pub const PRIMARY_KEY_FIELD: &str = "id";

/// Check whether a collection or field name belongs to the backend itself
pub fn is_system_name(name: &str) -> bool {
    name.starts_with(SYSTEM_PREFIX)
}
