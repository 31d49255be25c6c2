//! The HTTP transport seam.
//!
//! The client never talks to the network directly: it hands a
//! [`RequestOptions`] to a [`Transport`] and gets back a [`RawResponse`] or
//! an error carrying the status code. [`ReqwestTransport`] is the default;
//! tests and embedders can substitute their own.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::client::{ClientConfig, RequestOptions};
use crate::models::CachedResponse;
use crate::{Error, Result};

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body; `null` for an empty body
    pub body: Value,
}

impl RawResponse {
    /// Keep the headers and body, dropping the status.
    pub fn into_cached(self) -> CachedResponse {
        CachedResponse::new(&self.headers, self.body)
    }
}

/// Sends requests.
///
/// Implementations must return `Err(Error::Api { status, .. })` for every
/// non-2xx status, `304 Not Modified` included, so the caller can tell a
/// cache hit from a failure by the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: RequestOptions) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestOptions) -> Result<RawResponse> {
        tracing::debug!(method = %request.method, path = %request.path(), "Sending request");

        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers)
            .query(&request.query.to_pairs());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if status.is_success() {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            Ok(RawResponse {
                status: status.as_u16(),
                headers,
                body,
            })
        } else {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };
            Err(Error::from_api_response(status.as_u16(), body))
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(err)
    }
}
