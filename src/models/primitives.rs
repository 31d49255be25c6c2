//! Primitive types and newtypes used across the client.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Query;
use crate::Result;

/// Prefix shared by every response entry written to a cache backend.
const RESPONSE_KEY_PREFIX: &str = "res";

/// Key under which a cacheable GET response is stored.
///
/// A key is the composite of the credential identity, the request path and
/// the serialized query. Two requests that produce the same key are treated
/// as cache-equivalent.
///
/// # Example
///
/// ```
/// use libhub::{CacheKey, Query};
///
/// let query = Query::new().param("page", 1).param("per_page", 100);
/// let key = CacheKey::compose("anonymous", "/events", &query).unwrap();
/// assert_eq!(key.as_str(), r#"res:anonymous:/events:{"page":1,"per_page":100}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wrap an already-formatted key.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build the key for a request.
    ///
    /// `identity` names the credential the request is sent with; `query`
    /// is serialized with sorted keys so parameter order never matters.
    pub fn compose(identity: &str, path: &str, query: &Query) -> Result<Self> {
        Ok(Self(format!(
            "{}:{}:{}:{}",
            RESPONSE_KEY_PREFIX,
            identity,
            path,
            query.to_cache_string()?
        )))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;

    #[test]
    fn test_key_ignores_insertion_order() {
        let a = Query::new().param("per_page", 100).param("page", 2);
        let b = Query::new().param("page", 2).param("per_page", 100);

        assert_eq!(
            CacheKey::compose("tok", "/events", &a).unwrap(),
            CacheKey::compose("tok", "/events", &b).unwrap()
        );
    }

    #[test]
    fn test_key_distinguishes_credentials_and_paths() {
        let query = Query::new().param("page", 1);
        let base = CacheKey::compose("tok", "/events", &query).unwrap();

        assert_ne!(base, CacheKey::compose("other", "/events", &query).unwrap());
        assert_ne!(base, CacheKey::compose("tok", "/gists", &query).unwrap());
        assert_ne!(
            base,
            CacheKey::compose("tok", "/events", &Query::new().param("page", 2)).unwrap()
        );

        let user = Query::new().param("page", 1);
        let anonymous = Credentials::Anonymous.cache_identity();
        let token = Credentials::Token("anonymous".to_string().into()).cache_identity();
        let app = Credentials::ClientSecret {
            client_id: "anonymous".to_string(),
            client_secret: "secret".to_string().into(),
        }
        .cache_identity();

        let anonymous_key = CacheKey::compose(&anonymous, "/user", &user).unwrap();
        assert_ne!(anonymous_key, CacheKey::compose(&token, "/user", &user).unwrap());
        assert_ne!(anonymous_key, CacheKey::compose(&app, "/user", &user).unwrap());
        assert_ne!(
            CacheKey::compose(&token, "/user", &user).unwrap(),
            CacheKey::compose(&app, "/user", &user).unwrap()
        );
    }

    #[test]
    fn test_key_excludes_all_pages_flag() {
        let plain = Query::new().param("page", 1);
        let flagged = Query::new().param("page", 1).with_all_pages(true);

        assert_eq!(
            CacheKey::compose("tok", "/events", &plain).unwrap(),
            CacheKey::compose("tok", "/events", &flagged).unwrap()
        );
    }

    #[test]
    fn test_display() {
        let key: CacheKey = "res:a:/b:{}".into();
        assert_eq!(key.to_string(), "res:a:/b:{}");
    }
}
