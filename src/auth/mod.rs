//! Authentication mode selection.
//!
//! Requests are authenticated in exactly one of three ways:
//!
//! 1. **Token** - an `Authorization: token <token>` header. Takes
//!    precedence whenever a token is configured.
//! 2. **Client secret** - `client_id` and `client_secret` query parameters,
//!    used only when no token is configured.
//! 3. **Anonymous** - nothing is attached.
//!
//! ```
//! use libhub::{ClientConfig, auth::Credentials};
//!
//! let config = ClientConfig::new()
//!     .with_token("ghp_example")
//!     .with_client_credentials("id", "secret");
//!
//! assert!(matches!(Credentials::resolve(&config), Credentials::Token(_)));
//! ```

mod credentials;

pub use credentials::Credentials;
