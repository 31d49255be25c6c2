//! Resolved credentials and how they are attached to requests.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use crate::client::ClientConfig;
use crate::models::Query;
use crate::{Error, Result};

const CLIENT_ID_PARAM: &str = "client_id";
const CLIENT_SECRET_PARAM: &str = "client_secret";
const ANONYMOUS_IDENTITY: &str = "anonymous";

/// The authentication mode used for every request of a client.
#[derive(Clone)]
pub enum Credentials {
    /// Personal access or OAuth token sent in the `Authorization` header
    Token(SecretString),
    /// OAuth application credentials sent as query parameters
    ClientSecret {
        /// Application client id
        client_id: String,
        /// Application client secret
        client_secret: SecretString,
    },
    /// No credentials
    Anonymous,
}

impl Credentials {
    /// Pick the authentication mode for a configuration.
    ///
    /// A token wins over client credentials. Client credentials are only
    /// used when both the id and the secret are present.
    pub fn resolve(config: &ClientConfig) -> Self {
        if let Some(token) = &config.token {
            return Credentials::Token(token.clone());
        }

        match (&config.client_id, &config.client_secret) {
            (Some(client_id), Some(client_secret)) => Credentials::ClientSecret {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            },
            (None, None) => Credentials::Anonymous,
            _ => {
                tracing::warn!(
                    "Incomplete client credentials configured; sending requests unauthenticated"
                );
                Credentials::Anonymous
            }
        }
    }

    /// Attach these credentials to an outgoing request.
    ///
    /// Token mode writes the `Authorization` header; client-secret mode
    /// inserts `client_id` and `client_secret` into `query`.
    pub fn apply(&self, headers: &mut HeaderMap, query: &mut Query) -> Result<()> {
        match self {
            Credentials::Token(token) => {
                let mut value =
                    HeaderValue::from_str(&format!("token {}", token.expose_secret()))
                        .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Credentials::ClientSecret {
                client_id,
                client_secret,
            } => {
                query.set(CLIENT_ID_PARAM, client_id.as_str());
                query.set(CLIENT_SECRET_PARAM, client_secret.expose_secret());
            }
            Credentials::Anonymous => {}
        }
        Ok(())
    }

    /// The credential component of a cache key.
    ///
    /// The identity is tagged with the mode, so a token and a client id
    /// with the same text never share entries. Client secrets never appear
    /// in the identity.
    pub fn cache_identity(&self) -> String {
        match self {
            Credentials::Token(token) => format!("token:{}", token.expose_secret()),
            Credentials::ClientSecret { client_id, .. } => format!("client:{}", client_id),
            Credentials::Anonymous => ANONYMOUS_IDENTITY.to_string(),
        }
    }

    /// Returns `true` if requests carry no credentials.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credentials::Anonymous)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
            Credentials::ClientSecret { client_id, .. } => f
                .debug_struct("ClientSecret")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .finish(),
            Credentials::Anonymous => f.write_str("Anonymous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_takes_precedence() {
        let config = ClientConfig::new()
            .with_token("tok")
            .with_client_credentials("id", "secret");

        let credentials = Credentials::resolve(&config);
        let mut headers = HeaderMap::new();
        let mut query = Query::new();
        credentials.apply(&mut headers, &mut query).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "token tok");
        assert!(!query.contains_key("client_id"));
        assert!(!query.contains_key("client_secret"));
    }

    #[test]
    fn test_client_secret_mode() {
        let config = ClientConfig::new().with_client_credentials("id", "secret");

        let credentials = Credentials::resolve(&config);
        let mut headers = HeaderMap::new();
        let mut query = Query::new().param("page", 1);
        credentials.apply(&mut headers, &mut query).unwrap();

        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(query.get("client_id").unwrap(), "id");
        assert_eq!(query.get("client_secret").unwrap(), "secret");
        assert_eq!(credentials.cache_identity(), "client:id");
    }

    #[test]
    fn test_partial_client_credentials_are_ignored() {
        let mut config = ClientConfig::new();
        config.client_id = Some("id".to_string());

        assert!(Credentials::resolve(&config).is_anonymous());
    }

    #[test]
    fn test_anonymous() {
        let credentials = Credentials::resolve(&ClientConfig::new());
        let mut headers = HeaderMap::new();
        let mut query = Query::new();
        credentials.apply(&mut headers, &mut query).unwrap();

        assert!(headers.is_empty());
        assert!(query.is_empty());
        assert_eq!(credentials.cache_identity(), "anonymous");
    }

    #[test]
    fn test_cache_identity_is_tagged_by_mode() {
        let token = Credentials::resolve(&ClientConfig::new().with_token("anonymous"));
        let app = Credentials::resolve(
            &ClientConfig::new().with_client_credentials("anonymous", "secret"),
        );
        let anonymous = Credentials::resolve(&ClientConfig::new());

        assert_eq!(token.cache_identity(), "token:anonymous");
        assert_eq!(app.cache_identity(), "client:anonymous");
        assert_ne!(token.cache_identity(), anonymous.cache_identity());
        assert_ne!(app.cache_identity(), anonymous.cache_identity());

        let token = Credentials::resolve(&ClientConfig::new().with_token("x"));
        let app = Credentials::resolve(&ClientConfig::new().with_client_credentials("x", "s"));
        assert_ne!(token.cache_identity(), app.cache_identity());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let token = Credentials::Token(SecretString::from("super-secret-token".to_string()));
        let app = Credentials::ClientSecret {
            client_id: "visible-id".to_string(),
            client_secret: SecretString::from("super-secret-value".to_string()),
        };

        let debug_str = format!("{:?} {:?}", token, app);
        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("visible-id"));
        assert!(debug_str.contains("REDACTED"));
    }
}
