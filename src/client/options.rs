//! Request descriptors and the builder that produces them.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, IF_NONE_MATCH, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::ClientConfig;
use crate::auth::Credentials;
use crate::models::Query;
use crate::{Error, Result};

/// A transport-ready request.
///
/// Built fresh for every attempt and never shared between requests.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Fully-qualified URL, without the query string
    pub url: Url,
    /// Query parameters, including any injected credentials
    pub query: Query,
    /// Request headers
    pub headers: HeaderMap,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl RequestOptions {
    /// The percent-encoded request path.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Make this a conditional request against a cached validator.
    pub fn set_if_none_match(&mut self, etag: &str) -> Result<()> {
        let value = HeaderValue::from_str(etag)
            .map_err(|_| Error::InvalidInput(format!("Invalid ETag: {}", etag)))?;
        self.headers.insert(IF_NONE_MATCH, value);
        Ok(())
    }
}

/// Turns logical requests into [`RequestOptions`].
///
/// Holds the parsed base URL, the fixed headers and the resolved
/// credentials of a client, all validated once at construction.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    base_url: Url,
    headers: HeaderMap,
    credentials: Credentials,
}

impl OptionsBuilder {
    /// Validate a configuration and prepare a builder for it.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid host: {}", config.host)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| Error::InvalidInput("Invalid user agent".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|_| Error::InvalidInput("Invalid accept header".to_string()))?,
        );

        Ok(Self {
            base_url,
            headers,
            credentials: Credentials::resolve(config),
        })
    }

    /// The credentials attached to every request.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the descriptor for one request.
    ///
    /// `path` is percent-encoded with `/` kept as the segment separator. A
    /// `?` suffix in `path` becomes the URL's query, with `query` appended
    /// after it on send; a `#` fragment is dropped. The query is used as
    /// given; in client-secret mode `client_id` and `client_secret` are
    /// added to it.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        mut query: Query,
        body: Option<Value>,
    ) -> Result<RequestOptions> {
        let path = path.split('#').next().unwrap_or_default();
        let (path, inline_query) = match path.split_once('?') {
            Some((path, inline)) => (path, Some(inline)),
            None => (path, None),
        };

        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        if path.starts_with('/') {
            url.set_path(&format!("{}{}", prefix, path));
        } else {
            url.set_path(&format!("{}/{}", prefix, path));
        }
        url.set_query(inline_query.filter(|q| !q.is_empty()));
        url.set_fragment(None);

        let mut headers = self.headers.clone();
        self.credentials.apply(&mut headers, &mut query)?;

        Ok(RequestOptions {
            method,
            url,
            query,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    fn builder(config: ClientConfig) -> OptionsBuilder {
        OptionsBuilder::new(&config).unwrap()
    }

    #[test]
    fn test_fixed_headers() {
        let request = builder(ClientConfig::new().with_user_agent("LibHub"))
            .build(Method::GET, "/events", Query::new(), None)
            .unwrap();

        assert_eq!(request.url.as_str(), "https://api.github.com/events");
        assert_eq!(request.headers.get(USER_AGENT).unwrap(), "LibHub");
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(
            request.headers.get(ACCEPT).unwrap(),
            "application/vnd.github.v3+json"
        );
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_path_is_percent_encoded() {
        let request = builder(ClientConfig::new())
            .build(Method::GET, "/repos/o/r/contents/my file.txt", Query::new(), None)
            .unwrap();

        assert_eq!(request.path(), "/repos/o/r/contents/my%20file.txt");
    }

    #[test]
    fn test_query_suffix_in_path_is_kept() {
        let request = builder(ClientConfig::new())
            .build(Method::GET, "/search/code?q=addClass#top", Query::new(), None)
            .unwrap();

        assert_eq!(request.path(), "/search/code");
        assert_eq!(request.url.query(), Some("q=addClass"));
        assert_eq!(
            request.url.as_str(),
            "https://api.github.com/search/code?q=addClass"
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let request = builder(ClientConfig::new().with_host("ghe.example.com/api/v3"))
            .build(Method::GET, "user", Query::new(), None)
            .unwrap();

        assert_eq!(request.url.as_str(), "https://ghe.example.com/api/v3/user");
    }

    #[test]
    fn test_query_is_passed_through() {
        let request = builder(ClientConfig::new())
            .build(Method::GET, "/events", Query::new().param("page", 4), None)
            .unwrap();

        assert_eq!(request.query.page(), Some(4));
        assert!(request.query.per_page().is_none());
    }

    #[test]
    fn test_token_header() {
        let request = builder(ClientConfig::new().with_token("abc"))
            .build(Method::DELETE, "/gists/1", Query::new(), None)
            .unwrap();

        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "token abc");
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_client_credentials_in_query() {
        let request = builder(ClientConfig::new().with_client_credentials("id", "secret"))
            .build(Method::GET, "/events", Query::new(), None)
            .unwrap();

        assert_eq!(request.query.get("client_id").unwrap(), "id");
        assert_eq!(request.query.get("client_secret").unwrap(), "secret");
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_body_attached_verbatim() {
        let body = json!({"files": {"a.txt": {"content": "X"}}});
        let request = builder(ClientConfig::new())
            .build(Method::PATCH, "/gists/1", Query::new(), Some(body.clone()))
            .unwrap();

        assert_eq!(request.body, Some(body));
    }

    #[test]
    fn test_if_none_match() {
        let mut request = builder(ClientConfig::new())
            .build(Method::GET, "/events", Query::new(), None)
            .unwrap();
        request.set_if_none_match("\"abc\"").unwrap();

        assert_eq!(request.headers.get(IF_NONE_MATCH).unwrap(), "\"abc\"");
        assert!(request.set_if_none_match("bad\nvalue").is_err());
    }

    #[test]
    fn test_invalid_host() {
        let config = ClientConfig::new().with_host("http://");
        assert!(OptionsBuilder::new(&config).is_err());
    }
}
