//! Client configuration

use std::time::Duration;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://platform.quip.com";

/// Environment variable holding the access token
pub const ACCESS_TOKEN_VAR: &str = "QUIP_ACCESS_TOKEN";

/// Environment variable overriding the base URL
pub const BASE_URL_VAR: &str = "QUIP_BASE_URL";

/// Configuration for `RemoteClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer token sent with every request
    pub access_token: Option<String>,
    /// Service root, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts made when a request times out
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: u32,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            backoff_factor: 2,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Create a config with the given access token.
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: Some(access_token.to_string()),
            ..Default::default()
        }
    }

    /// Build a config from the process environment.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first;
    /// variables already set in the environment take precedence over it.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self {
            access_token: get(ACCESS_TOKEN_VAR).filter(|t| !t.is_empty()),
            ..Default::default()
        };
        if let Some(base_url) = get(BASE_URL_VAR).filter(|u| !u.is_empty()) {
            config = config.with_base_url(&base_url);
        }
        config
    }

    /// Set the access token.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of attempts for timed-out requests (at least one).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the retry delay and its growth factor.
    pub fn with_backoff(mut self, initial: Duration, factor: u32) -> Self {
        self.initial_backoff = initial;
        self.backoff_factor = factor;
        self
    }

    /// Disable TLS certificate verification for this client only.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
