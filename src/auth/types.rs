//! Auth configuration types

use chrono::{DateTime, Utc};

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication (public role)
    #[default]
    None,

    /// Static access token sent as a bearer token
    Bearer {
        /// The access token
        token: String,
    },

    /// Email/password login; the returned access token is cached
    Login {
        /// Login endpoint URL
        login_url: String,
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
}

impl AuthConfig {
    /// Short, masked description of the credential for console output
    pub fn describe(&self) -> String {
        match self {
            AuthConfig::None => "none".to_string(),
            AuthConfig::Bearer { token } => format!("token {}", mask(token)),
            AuthConfig::Login { email, .. } => format!("login as {email}"),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Bearer { token } => f
                .debug_struct("Bearer")
                .field("token", &mask(token))
                .finish(),
            AuthConfig::Login {
                login_url, email, ..
            } => f
                .debug_struct("Login")
                .field("login_url", login_url)
                .field("email", email)
                .finish_non_exhaustive(),
        }
    }
}

/// Keep the first five characters of a secret
fn mask(secret: &str) -> String {
    if secret.chars().count() > 5 {
        let head: String = secret.chars().take(5).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N milliseconds from now
    pub fn expires_in_millis(token: String, millis: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::milliseconds(millis);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
