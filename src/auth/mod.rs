//! Authentication module
//!
//! Supports: no auth, a static access token, and email/password login
//! against the backend's `/auth/login` endpoint.
//!
//! The `Authenticator` applies the credential to outgoing requests and
//! caches the session token obtained from a login until it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken};
