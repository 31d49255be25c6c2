//! Pluggable cache backends for conditional GET requests.
//!
//! The client stores each successful GET response as a JSON-encoded
//! [`CachedResponse`](crate::CachedResponse) and replays it when the server
//! answers `304 Not Modified`. Any key/value store can serve as the backend
//! by implementing [`CacheBackend`]:
//!
//! ```
//! use async_trait::async_trait;
//! use libhub::cache::CacheBackend;
//!
//! struct NullCache;
//!
//! #[async_trait]
//! impl CacheBackend for NullCache {
//!     async fn get(&self, _key: &str) -> libhub::Result<Option<String>> {
//!         Ok(None)
//!     }
//!
//!     async fn set(&self, _key: &str, _value: String) -> libhub::Result<()> {
//!         Ok(())
//!     }
//! }
//! ```

mod memory;

pub use memory::InMemoryCache;

use async_trait::async_trait;

use crate::Result;

/// An asynchronous string key/value store.
///
/// Backends are shared between concurrent requests and must do their own
/// synchronisation. Failures should be reported as
/// [`Error::Cache`](crate::Error::Cache); they abort the request that hit them.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Read the value stored under `key`. `None` means no entry.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
