//! HTTP client implementation.

use std::sync::Arc;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::config::ClientConfig;
use super::options::OptionsBuilder;
use super::paginated;
use crate::auth::Credentials;
use crate::cache::CacheBackend;
use crate::models::{CacheKey, CachedResponse, Query};
use crate::transport::{ReqwestTransport, Transport};
use crate::{Error, Result};

/// The main client for the GitHub REST API.
///
/// GET requests go through the conditional cache (when one is configured)
/// and can aggregate every page of a collection. POST, PUT, PATCH and
/// DELETE are sent once and return the response body.
///
/// # Example
///
/// ```no_run
/// use libhub::{HubClient, Query};
/// use serde_json::Value;
///
/// # async fn example() -> libhub::Result<()> {
/// let client = HubClient::with_token("ghp_your_token")?;
///
/// // One page
/// let gist: Value = client.get("/gists/aa5a315d61ae9438b18d", Query::new()).await?;
///
/// // Every page, flattened into one array
/// let events: Vec<Value> = client
///     .get("/events", Query::new().with_all_pages(true))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct HubClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) options: OptionsBuilder,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) config: ClientConfig,
}

impl HubClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client authenticated with a token and otherwise default settings.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new().with_token(token))
    }

    /// Create a client whose client credentials come from `GHCLIENT` and `GHSECRET`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Create a client that sends requests through a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let options = OptionsBuilder::new(&config)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                options,
                transport,
                config,
            }),
        })
    }

    /// GET a resource and deserialize its body.
    ///
    /// When `query.is_all_pages()` is set and the response links to further
    /// pages, every page is fetched and the bodies are concatenated into
    /// one array in page order.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T> {
        let body = if query.is_all_pages() {
            paginated::fetch_all_pages(&self.inner, path, query).await?
        } else {
            self.inner.fetch(path, query).await?.body
        };

        Ok(serde_json::from_value(body)?)
    }

    /// GET a single page, keeping its headers.
    pub async fn get_response(&self, path: &str, query: Query) -> Result<CachedResponse> {
        self.inner.fetch(path, query).await
    }

    /// Send a POST request and return the response body.
    pub async fn post<T, B>(&self, path: &str, query: Query, body: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.inner.dispatch(Method::POST, path, query, body).await
    }

    /// Send a PUT request and return the response body.
    pub async fn put<T, B>(&self, path: &str, query: Query, body: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.inner.dispatch(Method::PUT, path, query, body).await
    }

    /// Send a PATCH request and return the response body.
    pub async fn patch<T, B>(&self, path: &str, query: Query, body: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.inner.dispatch(Method::PATCH, path, query, body).await
    }

    /// Send a DELETE request and return the response body.
    pub async fn delete<T, B>(&self, path: &str, query: Query, body: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.inner.dispatch(Method::DELETE, path, query, body).await
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the authentication mode requests are sent with.
    pub fn credentials(&self) -> &Credentials {
        self.inner.options.credentials()
    }
}

impl ClientInner {
    /// GET one page, going through the conditional cache when configured.
    pub(crate) async fn fetch(&self, path: &str, mut query: Query) -> Result<CachedResponse> {
        query.apply_page_defaults(self.config.per_page);

        let Some(cache) = self.config.cache.as_deref() else {
            let request = self.options.build(Method::GET, path, query, None)?;
            return Ok(self.transport.send(request).await?.into_cached());
        };

        let identity = self.options.credentials().cache_identity();
        let key = CacheKey::compose(&identity, path, &query)?;
        let mut request = self.options.build(Method::GET, path, query, None)?;

        match lookup(cache, &key).await? {
            Some(cached) => match cached.etag() {
                Some(etag) => {
                    tracing::debug!(path, etag, "Cache hit; sending conditional request");
                    request.set_if_none_match(etag)?;
                }
                None => tracing::debug!(path, "Cache hit without validator"),
            },
            None => tracing::debug!(path, "Cache miss"),
        }

        match self.transport.send(request).await {
            Ok(response) => {
                let response = response.into_cached();
                cache.set(key.as_str(), response.to_cache_value()?).await?;
                tracing::debug!(path, "Cached fresh response");
                Ok(response)
            }
            Err(err) if err.is_not_modified() => {
                tracing::debug!(path, "Not modified; serving cached response");
                self.cached_response(cache, &key).await
            }
            Err(err) => Err(err),
        }
    }

    async fn cached_response(&self, cache: &dyn CacheBackend, key: &CacheKey) -> Result<CachedResponse> {
        lookup(cache, key).await?.ok_or_else(|| Error::StaleCache {
            key: key.to_string(),
        })
    }

    /// Send a write request once and return its body.
    pub(crate) async fn dispatch<T, B>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = match serde_json::to_value(body)? {
            Value::Null => None,
            value => Some(value),
        };

        let request = self.options.build(method, path, query, body)?;
        let response = self.transport.send(request).await?;

        Ok(serde_json::from_value(response.body)?)
    }
}

/// Read and decode a cache entry. An empty stored value counts as no entry.
async fn lookup(cache: &dyn CacheBackend, key: &CacheKey) -> Result<Option<CachedResponse>> {
    match cache.get(key.as_str()).await? {
        Some(stored) if !stored.is_empty() => CachedResponse::from_cache_value(&stored).map(Some),
        _ => Ok(None),
    }
}

impl Clone for HubClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
