//! Data models shared by the request pipeline.
//!
//! - [`primitives`] - Newtypes such as [`CacheKey`]
//! - [`query`] - The [`Query`] parameter map and its pagination helpers
//! - [`response`] - [`CachedResponse`], the `{headers, body}` pair persisted in the cache

pub mod primitives;
pub mod query;
pub mod response;

pub use primitives::*;
pub use query::*;
pub use response::*;
