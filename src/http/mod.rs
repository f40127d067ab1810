//! HTTP client module
//!
//! Provides the HTTP client used to talk to the backend.
//!
//! # Features
//!
//! - **Base URL Joining**: Relative paths resolve against the configured backend URL
//! - **Authentication**: Integration with the auth module
//! - **Optional Retries**: Off by default, configurable with backoff
//! - **Error Classification**: Non-2xx responses surface as `Error::HttpStatus`

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
