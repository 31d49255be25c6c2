//! Client configuration options.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::cache::CacheBackend;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "api.github.com";

/// Versioned media type sent in the `Accept` header.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

/// Page size applied to GET requests that do not set `per_page`.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Environment variable holding the default OAuth client id.
pub const CLIENT_ID_ENV: &str = "GHCLIENT";

/// Environment variable holding the default OAuth client secret.
pub const CLIENT_SECRET_ENV: &str = "GHSECRET";

/// Source of environment-style variables.
///
/// [`ProcessEnv`] reads the process environment. Tests and embedders can
/// supply a `HashMap<String, String>` instead.
pub trait EnvSource {
    /// Read a variable. Unset and empty values are both `None`.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Configuration for the libhub client.
///
/// Settings are fixed once the client is built.
///
/// # Example
///
/// ```
/// use libhub::{ClientConfig, InMemoryCache};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_token("ghp_example")
///     .with_cache(Arc::new(InMemoryCache::new()))
///     .with_timeout(Duration::from_secs(10))
///     .with_page_concurrency(4);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// API host, or a full base URL when it contains `://`
    pub host: String,
    /// Token sent in the `Authorization` header
    pub token: Option<SecretString>,
    /// OAuth client id, used only without a token
    pub client_id: Option<String>,
    /// OAuth client secret, used only without a token
    pub client_secret: Option<SecretString>,
    /// Backend for conditional GET caching
    pub cache: Option<Arc<dyn CacheBackend>>,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Accept header value
    pub accept: String,
    /// Default `per_page` for GET requests
    pub per_page: u32,
    /// Maximum number of pages fetched at once while aggregating.
    /// `None` fetches every remaining page concurrently.
    pub page_concurrency: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token: None,
            client_id: None,
            client_secret: None,
            cache: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("libhub-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            accept: DEFAULT_ACCEPT.to_string(),
            per_page: DEFAULT_PER_PAGE,
            page_concurrency: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration whose client credentials default to the
    /// `GHCLIENT` and `GHSECRET` process environment variables.
    pub fn from_env() -> Self {
        Self::from_env_source(&ProcessEnv)
    }

    /// Create a configuration whose client credentials default to values
    /// read from `env`.
    ///
    /// Builder calls made afterwards override these defaults.
    pub fn from_env_source(env: &impl EnvSource) -> Self {
        Self {
            client_id: env.var(CLIENT_ID_ENV),
            client_secret: env.var(CLIENT_SECRET_ENV).map(SecretString::from),
            ..Self::default()
        }
    }

    /// Set the API host (`api.github.com`) or base URL (`http://localhost:8080`).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Authenticate with a token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Authenticate with OAuth application credentials when no token is set.
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(SecretString::from(client_secret.into()));
        self
    }

    /// Enable conditional GET caching with the given backend.
    pub fn with_cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the Accept header.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Set the default page size for GET requests.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Cap the number of pages fetched at once during aggregation.
    ///
    /// A limit of zero is treated as one.
    pub fn with_page_concurrency(mut self, limit: usize) -> Self {
        self.page_concurrency = Some(limit.max(1));
        self
    }

    /// The base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache", &self.cache.is_some())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("accept", &self.accept)
            .field("per_page", &self.per_page)
            .field("page_concurrency", &self.page_concurrency)
            .finish()
    }
}
