//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ExporterConfig;
use crate::error::{Result, ResultExt};
use crate::export::{to_json_pretty, write_schema, ExportSummary, SchemaExporter};
use crate::http::HttpClient;
use crate::schema::classify;
use crate::source::{DataSource, DirectusSource, InMemorySource};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match self.cli.command.clone().unwrap_or_default() {
            Commands::Export {
                sample_size,
                output,
                collections,
                no_sampling,
                print,
            } => {
                let mut config = self.load_config()?;
                if let Some(sample_size) = sample_size {
                    config.sample_size = sample_size;
                }
                if let Some(output) = output {
                    config.output = output;
                }
                if !collections.is_empty() {
                    config.collections = collections;
                }
                if no_sampling {
                    config.live_sampling = false;
                }
                self.export(&config, print).await
            }
            Commands::Collections => self.collections().await,
            Commands::Fields { collection } => self.fields(&collection).await,
            Commands::Check => self.check().await,
        }
    }

    /// Load configuration: file first, then flags and environment
    fn load_config(&self) -> Result<ExporterConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };

        if let Some(url) = &self.cli.url {
            config.base_url = Some(url.clone());
        }
        if let Some(token) = &self.cli.token {
            config.token = Some(token.clone());
        }
        if let Some(email) = &self.cli.email {
            config.email = Some(email.clone());
        }
        if let Some(password) = &self.cli.password {
            config.password = Some(password.clone());
        }

        debug!("Effective config: {:?}", config);
        Ok(config)
    }

    /// Snapshot source when `--snapshot` is given, live backend otherwise
    fn build_source(&self, config: &ExporterConfig) -> Result<Box<dyn DataSource>> {
        if let Some(path) = &self.cli.snapshot {
            return Ok(Box::new(InMemorySource::from_file(path)?));
        }
        Ok(Box::new(Self::directus(config)?))
    }

    fn directus(config: &ExporterConfig) -> Result<DirectusSource> {
        config.validate()?;
        let client = HttpClient::with_auth(config.http(), config.auth())?;
        Ok(DirectusSource::new(client))
    }

    /// Export the schema to a file
    async fn export(&self, config: &ExporterConfig, print: bool) -> Result<()> {
        config.validate_sampling()?;
        self.print_banner(config);

        let source = self.build_source(config)?;
        let mut exporter = SchemaExporter::new(source, config.export());
        let schema = exporter.export().await?;

        write_schema(&config.output, &schema).await?;

        print_summary(exporter.summary());
        println!(
            "\nSchema successfully exported to {}",
            config.output.display()
        );

        if print {
            println!("{}", to_json_pretty(&schema)?);
        }

        Ok(())
    }

    /// List exportable collections
    async fn collections(&self) -> Result<()> {
        let config = self.load_config()?;
        let source = self.build_source(&config)?;
        for collection in source.list_collections().await? {
            println!("{collection}");
        }
        Ok(())
    }

    /// Print the classification of each field in a collection
    async fn fields(&self, collection: &str) -> Result<()> {
        let config = self.load_config()?;
        let source = self.build_source(&config)?;
        let fields = source.list_fields(collection).await?;

        println!(
            "{:<28} {:<12} {:<24} {:<14} RELATED",
            "FIELD", "STORAGE", "INTERFACE", "TYPE"
        );
        for field in fields.iter().filter(|f| f.is_exported()) {
            println!(
                "{:<28} {:<12} {:<24} {:<14} {}",
                field.name,
                field.storage_type,
                field.interface.as_deref().unwrap_or("-"),
                classify(field).as_str(),
                field.related_collection.as_deref().unwrap_or("-"),
            );
        }
        Ok(())
    }

    /// Check connection and credentials
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;

        if let Some(path) = &self.cli.snapshot {
            let source = InMemorySource::from_file(path)?;
            let count = source.list_collections().await?.len();
            println!("Snapshot OK: {count} collection(s) in {}", path.display());
            return Ok(());
        }

        let source = Self::directus(&config)?;
        source.ping().await.with_context(|| {
            format!(
                "Backend at {} is not reachable",
                config.base_url.as_deref().unwrap_or_default()
            )
        })?;
        let count = source.list_collections().await?.len();

        println!(
            "Connection OK: {count} collection(s) visible with {}",
            config.auth().describe()
        );
        Ok(())
    }

    fn print_banner(&self, config: &ExporterConfig) {
        println!("\nDirectus Simplified Schema Export Tool");
        println!("=====================================");
        match &self.cli.snapshot {
            Some(path) => println!("Snapshot: {}", path.display()),
            None => {
                println!(
                    "Base URL: {}",
                    config.base_url.as_deref().unwrap_or("(not set)")
                );
                println!("Auth: {}", config.auth().describe());
            }
        }
        println!("Sample size: {}", config.sample_size);
        println!("=====================================\n");
    }
}

fn print_summary(summary: &ExportSummary) {
    println!(
        "\nExported {} collection(s), {} field(s) in {:.2?}",
        summary.collections, summary.fields, summary.duration
    );
    for (source, count) in &summary.by_source {
        println!("  {source:<16} {count}");
    }
}
