//! # libhub-rs
//!
//! An async client for the GitHub REST API that adds three behaviours on top
//! of plain HTTP calls:
//!
//! - **Conditional caching**: GET responses are stored in a pluggable
//!   [`CacheBackend`](cache::CacheBackend) and revalidated with
//!   `If-None-Match`. A `304 Not Modified` answer is served from the cache.
//! - **Transparent pagination**: `Query::with_all_pages(true)` follows the
//!   `Link: rel="last"` header and concatenates every page in order.
//! - **Authentication modes**: a token in the `Authorization` header, or
//!   OAuth `client_id`/`client_secret` query parameters when no token is set.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use libhub::{ClientConfig, HubClient, InMemoryCache, Query};
//! use serde_json::Value;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> libhub::Result<()> {
//!     let client = HubClient::new(
//!         ClientConfig::new()
//!             .with_token("ghp_your_token")
//!             .with_cache(Arc::new(InMemoryCache::new())),
//!     )?;
//!
//!     // Revalidated against the cache on every call
//!     let user: Value = client.get("/user", Query::new()).await?;
//!     println!("Logged in as {}", user["login"]);
//!
//!     // Every page of the collection in one array
//!     let events: Vec<Value> = client
//!         .get("/events", Query::new().with_all_pages(true))
//!         .await?;
//!     println!("Fetched {} events", events.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

// Re-export primary types at crate root for convenience
pub use cache::{CacheBackend, InMemoryCache};
pub use client::{ClientConfig, HubClient, PageLinks, RequestOptions};
pub use error::{Error, Result};
pub use models::{CacheKey, CachedResponse, Query};
pub use transport::{RawResponse, ReqwestTransport, Transport};

/// Prelude module for convenient imports.
///
/// ```rust
/// use libhub::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::Credentials;
    pub use crate::cache::{CacheBackend, InMemoryCache};
    pub use crate::client::{ClientConfig, EnvSource, HubClient, ProcessEnv};
    pub use crate::error::{Error, Result};
    pub use crate::models::{CacheKey, CachedResponse, Query};
    pub use crate::transport::{RawResponse, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_builds() {
        let client = HubClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.config().base_url(), "https://api.github.com");
        assert!(client.credentials().is_anonymous());
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let client = HubClient::with_token("super-secret-token").unwrap();
        let debug_str = format!("{:?}", client);

        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        assert!(HubClient::new(ClientConfig::new().with_host("http://")).is_err());
    }
}
