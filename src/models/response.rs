//! Response envelopes persisted by the cache-aware fetcher.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, ETAG, LINK};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// A response as stored in (and restored from) a cache backend.
///
/// Header names are lowercase. Repeated headers are joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Response headers
    pub headers: BTreeMap<String, String>,
    /// Decoded JSON body; `null` when the response had no body
    pub body: Value,
}

impl CachedResponse {
    /// Wrap a header map and body.
    pub fn new(headers: &HeaderMap, body: Value) -> Self {
        Self {
            headers: flatten_headers(headers),
            body,
        }
    }

    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The validator token (`ETag`) of this response.
    pub fn etag(&self) -> Option<&str> {
        self.header(ETAG.as_str())
    }

    /// The raw `Link` header of this response.
    pub fn link(&self) -> Option<&str> {
        self.header(LINK.as_str())
    }

    /// Serialize for storage in a cache backend.
    pub fn to_cache_value(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from a cache backend value.
    pub fn from_cache_value(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        // Non-UTF-8 values cannot be represented in the JSON envelope
        let Ok(value) = value.to_str() else {
            continue;
        };
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_headers_are_flattened() {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("\"abc\""));
        headers.append("x-thing", HeaderValue::from_static("one"));
        headers.append("x-thing", HeaderValue::from_static("two"));

        let response = CachedResponse::new(&headers, json!({"id": 1}));
        assert_eq!(response.etag(), Some("\"abc\""));
        assert_eq!(response.header("X-Thing"), Some("one, two"));
        assert_eq!(response.link(), None);
    }

    #[test]
    fn test_cache_value_shape() {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("W/\"1\""));
        let response = CachedResponse::new(&headers, json!([1, 2]));

        let stored: Value = serde_json::from_str(&response.to_cache_value().unwrap()).unwrap();
        assert_eq!(
            stored,
            json!({"headers": {"etag": "W/\"1\""}, "body": [1, 2]})
        );
        assert_eq!(
            CachedResponse::from_cache_value(&stored.to_string()).unwrap(),
            response
        );
    }

    #[test]
    fn test_corrupt_cache_value() {
        assert!(matches!(
            CachedResponse::from_cache_value("not json"),
            Err(crate::Error::Json(_))
        ));
    }
}
