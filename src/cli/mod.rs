//! CLI module
//!
//! Command-line interface for exporting a backend's schema.
//!
//! # Commands
//!
//! - `export` - Write the simplified schema with examples (default)
//! - `collections` - List exportable collection names
//! - `fields` - Show how one collection's fields are classified
//! - `check` - Test connection and credentials

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
