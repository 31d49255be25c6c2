//! HTTP client and request pipeline.
//!
//! This module provides the main entry point [`HubClient`] together with its
//! configuration and the pieces every request flows through:
//!
//! 1. [`OptionsBuilder`] turns a path, query and body into [`RequestOptions`].
//! 2. The cache-aware fetcher sends GET requests conditionally.
//! 3. [`paginated`] aggregates multi-page collections.
//!
//! # Example
//!
//! ```no_run
//! use libhub::{ClientConfig, HubClient, InMemoryCache, Query};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! # async fn example() -> libhub::Result<()> {
//! let client = HubClient::new(
//!     ClientConfig::new()
//!         .with_token("ghp_your_token")
//!         .with_cache(Arc::new(InMemoryCache::new())),
//! )?;
//!
//! let gist: Value = client
//!     .post("/gists", Query::new(), json!({
//!         "public": false,
//!         "files": { "file1.txt": { "content": "String file contents" } }
//!     }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod options;
pub mod paginated;

pub use config::{
    ClientConfig, EnvSource, ProcessEnv, CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_ACCEPT,
    DEFAULT_HOST, DEFAULT_PER_PAGE,
};
pub use http::HubClient;
pub use options::{OptionsBuilder, RequestOptions};
pub use paginated::PageLinks;
pub(crate) use http::ClientInner;
