//! Credentials, authentication state and the credential provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// A completed OAuth grant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// OAuth access token sent as `Authorization: OAuth <token>`.
    pub access_token: String,
    /// Scopes granted to the token.
    #[serde(default)]
    pub scope: Vec<String>,
}

impl Credentials {
    /// Create credentials from a token and its granted scopes.
    pub fn new<I, S>(access_token: impl Into<String>, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            access_token: access_token.into(),
            scope: scope.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether `scope` was granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Whether the client currently holds credentials.
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Credentials),
}

impl AuthState {
    /// Returns true when credentials with a non-empty token are held.
    pub fn is_authenticated(&self) -> bool {
        self.credentials().is_some()
    }

    /// Credentials, if authenticated.
    ///
    /// An empty access token does not count.
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Authenticated(creds) if !creds.access_token.is_empty() => Some(creds),
            _ => None,
        }
    }

    /// Value for the `Authorization` header of a call that needs auth.
    pub(crate) fn authorization(&self) -> Option<String> {
        self.credentials().map(|c| format!("OAuth {}", c.access_token))
    }
}

/// Performs the interactive OAuth login on behalf of the client.
///
/// Implementations typically drive a browser through Twitch's authorization
/// page and capture the resulting token. The client binds its own client ID
/// to every call.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use twitchapi::{BoxError, CredentialProvider, Credentials};
///
/// struct FixedToken;
///
/// #[async_trait]
/// impl CredentialProvider for FixedToken {
///     async fn automate_login(
///         &self,
///         _client_id: &str,
///         _user: &str,
///         _password: &str,
///         _show_browser: bool,
///     ) -> Result<Credentials, BoxError> {
///         Ok(Credentials::new("token", ["user_read"]))
///     }
/// }
/// ```
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Log in as `user` and return the granted credentials.
    async fn automate_login(
        &self,
        client_id: &str,
        user: &str,
        password: &str,
        show_browser: bool,
    ) -> Result<Credentials, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_unauthenticated() {
        let state = AuthState::default();
        assert!(!state.is_authenticated());
        assert!(state.credentials().is_none());
        assert!(state.authorization().is_none());
    }

    #[test]
    fn test_authorization_header_value() {
        let state = AuthState::Authenticated(Credentials::new("tok", ["channel_read"]));
        assert_eq!(state.authorization().as_deref(), Some("OAuth tok"));
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let state = AuthState::Authenticated(Credentials::new("", ["channel_read"]));
        assert!(!state.is_authenticated());
        assert!(state.credentials().is_none());
        assert!(state.authorization().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::new("secret-token", ["user_read"]);
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("user_read"));
    }
}
