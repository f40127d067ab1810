//! Exporter configuration
//!
//! Settings come from an optional YAML/JSON file, then CLI flags and
//! environment variables override them.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::export::ExportConfig;
use crate::http::HttpClientConfig;
use crate::schema::SynthesizerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Complete exporter configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Backend base URL
    pub base_url: Option<String>,

    /// Static access token
    pub token: Option<String>,

    /// Login email (used when no token is set)
    pub email: Option<String>,

    /// Login password
    pub password: Option<String>,

    /// Examples requested per field
    pub sample_size: usize,

    /// Output file
    pub output: PathBuf,

    /// Only export these collections (empty = all)
    pub collections: Vec<String>,

    /// Sample live records and relations
    pub live_sampling: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for failed requests
    pub max_retries: u32,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            email: None,
            password: None,
            sample_size: default_sample_size(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            collections: Vec::new(),
            live_sampling: true,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "simplified_schema.json";

fn default_sample_size() -> usize {
    5
}

impl std::fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth())
            .field("sample_size", &self.sample_size)
            .field("output", &self.output)
            .field("collections", &self.collections)
            .field("live_sampling", &self.live_sampling)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ExporterConfig {
    /// Load a config file (YAML or JSON)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_str(&content)
    }

    /// Parse a config from YAML or JSON text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the settings needed to talk to a live backend
    pub fn validate(&self) -> Result<()> {
        self.validate_sampling()?;

        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::missing_field("base_url"))?;

        let url = Url::parse(base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.token.is_none() && self.email.is_some() && self.password.is_none() {
            return Err(Error::missing_field("password"));
        }

        Ok(())
    }

    /// Check the settings that apply to every export
    pub fn validate_sampling(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::invalid_value("sample_size", "must be at least 1"));
        }
        Ok(())
    }

    /// Credential to use: token first, then email/password, else none
    pub fn auth(&self) -> AuthConfig {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return AuthConfig::Bearer {
                token: token.clone(),
            };
        }

        match (&self.email, &self.password) {
            (Some(email), Some(password)) => AuthConfig::Login {
                login_url: self.endpoint("auth/login"),
                email: email.clone(),
                password: password.clone(),
            },
            _ => AuthConfig::None,
        }
    }

    /// HTTP client settings
    pub fn http(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries);
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Export settings
    pub fn export(&self) -> ExportConfig {
        ExportConfig {
            synthesizer: SynthesizerConfig {
                sample_size: self.sample_size,
                live_sampling: self.live_sampling,
            },
            collections: self.collections.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or_default();
        format!("{}/{}", base.trim_end_matches('/'), path)
    }
}
