//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Directus simplified schema export tool
#[derive(Parser, Debug)]
#[command(name = "directus-schema-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(short, long, global = true, env = "DIRECTUS_URL")]
    pub url: Option<String>,

    /// Static access token
    #[arg(short, long, global = true, env = "DIRECTUS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Login email (when no token is given)
    #[arg(long, global = true, env = "DIRECTUS_EMAIL")]
    pub email: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "DIRECTUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Read collections from a snapshot file instead of a live backend
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export the simplified schema with example values
    Export {
        /// Examples requested per field
        #[arg(short = 'n', long)]
        sample_size: Option<usize>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export these collections (comma-separated)
        #[arg(long, value_delimiter = ',')]
        collections: Vec<String>,

        /// Skip live sampling; use only field metadata
        #[arg(long)]
        no_sampling: bool,

        /// Also print the schema to stdout
        #[arg(long)]
        print: bool,
    },

    /// List exportable collections
    Collections,

    /// Show field classification for a collection
    Fields {
        /// Collection name
        collection: String,
    },

    /// Test connection to the backend
    Check,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Export {
            sample_size: None,
            output: None,
            collections: Vec::new(),
            no_sampling: false,
            print: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from([
            "directus-schema-export",
            "--url",
            "http://localhost:8055",
            "export",
            "-n",
            "3",
            "--collections",
            "vehicles,brands",
            "--print",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://localhost:8055"));
        assert_eq!(
            cli.command,
            Some(Commands::Export {
                sample_size: Some(3),
                output: None,
                collections: vec!["vehicles".to_string(), "brands".to_string()],
                no_sampling: false,
                print: true,
            })
        );
    }

    #[test]
    fn test_parse_without_subcommand() {
        let cli = Cli::try_parse_from(["directus-schema-export", "--snapshot", "snap.yaml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.snapshot, Some(PathBuf::from("snap.yaml")));
    }

    #[test]
    fn test_parse_fields() {
        let cli = Cli::try_parse_from(["directus-schema-export", "fields", "vehicles"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Fields {
                collection: "vehicles".to_string()
            })
        );
    }
}
