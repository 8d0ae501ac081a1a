//! Twitch API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Endpoint-specific operations are implemented via traits on model types.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::{AuthState, CredentialProvider, Credentials};
use crate::config::{AutomatedLogin, ClientConfig, RetryPolicy};
use crate::error::{ApiErrorBody, Result, TwitchError};
use crate::query::{self, RequestOptions};

const ACCEPT_V5: &str = "application/vnd.twitchtv.v5+json";
const CLIENT_ID_HEADER: &str = "Client-ID";
const USER_AGENT: &str = concat!("twitchapi/", env!("CARGO_PKG_VERSION"));

/// Low-level Twitch API client.
///
/// Holds the client identity and the authentication state, builds request
/// URLs and headers, and classifies responses. Endpoint operations are
/// implemented via the `Get` and `List` traits on model types.
///
/// This struct is cheaply cloneable; clones share the connection pool and
/// the authentication state.
///
/// # Example
///
/// ```no_run
/// use twitchapi::{ClientConfig, Credentials, TwitchClient};
///
/// # async fn example() -> twitchapi::Result<()> {
/// let client = TwitchClient::new(ClientConfig::new("my-client-id"))?;
/// client.set_credentials(Credentials::new("token", ["channel_read"]));
///
/// let channel = client.call_api("/channel", true).await?;
/// println!("{}", channel["display_name"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TwitchClient {
    http: Client,
    base_url: Arc<str>,
    client_id: Arc<str>,
    retry: RetryPolicy,
    auth: Arc<RwLock<AuthState>>,
    automation: Option<Arc<Automation>>,
}

/// Provider bound at construction together with the login settings.
struct Automation {
    provider: Arc<dyn CredentialProvider>,
    login: Option<AutomatedLogin>,
}

/// Everything a call needs, captured before the first await.
#[derive(Debug)]
struct PreparedRequest {
    url: Url,
    authorization: HeaderValue,
}

impl std::fmt::Debug for TwitchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl TwitchClient {
    /// Create a client without a credential provider.
    ///
    /// # Errors
    ///
    /// Returns [`TwitchError::Configuration`] if no client ID is configured,
    /// and [`TwitchError::InvalidUrl`] if the base URL does not parse.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a client that can log in through `provider`.
    ///
    /// The provider is only bound when `config.oauth` is set; without OAuth
    /// options `auto_authenticate` stays unavailable.
    ///
    /// # Errors
    ///
    /// Same as [`TwitchClient::new`].
    pub fn with_credential_provider<P>(config: ClientConfig, provider: P) -> Result<Self>
    where
        P: CredentialProvider + 'static,
    {
        Self::build(config, Some(Arc::new(provider)))
    }

    fn build(config: ClientConfig, provider: Option<Arc<dyn CredentialProvider>>) -> Result<Self> {
        let client_id = config
            .client_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| TwitchError::Configuration("client ID is not set".to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V5));
        headers.insert(
            CLIENT_ID_HEADER,
            HeaderValue::from_str(&client_id).map_err(|_| {
                TwitchError::Configuration("client ID is not a valid header value".to_string())
            })?,
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout)
            .build()
            .map_err(TwitchError::Transport)?;

        let automation = match (config.oauth, provider) {
            (Some(oauth), Some(provider)) => Some(Arc::new(Automation {
                provider,
                login: oauth.automated,
            })),
            _ => None,
        };

        Ok(Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            retry: config.retry,
            auth: Arc::new(RwLock::new(AuthState::Unauthenticated)),
            automation,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the client ID sent with every request.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Whether credentials with a non-empty token are held.
    pub fn is_authenticated(&self) -> bool {
        self.auth.read().is_authenticated()
    }

    /// Whether the current credentials were granted `scope`.
    ///
    /// Always false when unauthenticated.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.auth
            .read()
            .credentials()
            .is_some_and(|c| c.has_scope(scope))
    }

    /// Store caller-supplied credentials.
    ///
    /// The token is not validated. Replaces any previous credentials.
    pub fn set_credentials(&self, credentials: Credentials) {
        tracing::debug!(scopes = ?credentials.scope, "Credentials set");
        *self.auth.write() = AuthState::Authenticated(credentials);
    }

    /// Snapshot of the current credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        self.auth.read().credentials().cloned()
    }

    /// Drop the current credentials.
    pub fn clear_credentials(&self) {
        *self.auth.write() = AuthState::Unauthenticated;
    }

    /// Log in through the bound credential provider.
    ///
    /// The configuration check runs when this method is called, before the
    /// returned future is first polled.
    ///
    /// # Errors
    ///
    /// - [`TwitchError::Configuration`] if no provider is bound or the
    ///   automated login settings are incomplete.
    /// - [`TwitchError::CredentialProvider`] wrapping whatever the provider
    ///   returned.
    pub fn auto_authenticate(&self) -> impl Future<Output = Result<Credentials>> + Send + '_ {
        let prepared = self.automation_login();

        async move {
            let (provider, login) = prepared?;
            tracing::debug!(user = %login.user, "Starting automated login");

            let credentials = provider
                .automate_login(&self.client_id, &login.user, &login.password, login.show)
                .await
                .map_err(TwitchError::CredentialProvider)?;

            self.set_credentials(credentials.clone());
            Ok(credentials)
        }
    }

    fn automation_login(&self) -> Result<(Arc<dyn CredentialProvider>, AutomatedLogin)> {
        let automation = self.automation.as_ref().ok_or_else(|| {
            TwitchError::Configuration("no credential provider is configured".to_string())
        })?;

        match &automation.login {
            Some(login) if login.is_complete() => {
                Ok((Arc::clone(&automation.provider), login.clone()))
            }
            _ => Err(TwitchError::Configuration(
                "options don't allow automation: user and password are required".to_string(),
            )),
        }
    }

    /// Serialize options into a query string. See [`query::construct_options`].
    pub fn construct_options(&self, options: Option<&RequestOptions>) -> String {
        query::construct_options(options)
    }

    /// Join values with `,`. See [`query::construct_comma_list`].
    pub fn construct_comma_list<I>(&self, items: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        query::construct_comma_list(items)
    }

    /// Call any endpoint with optional query parameters.
    #[tracing::instrument(skip(self, options))]
    pub async fn raw_api(
        &self,
        path: &str,
        options: Option<&RequestOptions>,
        requires_auth: bool,
    ) -> Result<Value> {
        let path = format!("{path}{}", query::construct_options(options));
        tracing::debug!(%path, "Raw API request");
        self.call_api(&path, requires_auth).await
    }

    /// [`raw_api`](Self::raw_api) that stops when `cancel` fires.
    pub async fn raw_api_cancellable(
        &self,
        path: &str,
        options: Option<&RequestOptions>,
        requires_auth: bool,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let path = format!("{path}{}", query::construct_options(options));
        self.call_api_cancellable(&path, requires_auth, cancel).await
    }

    /// GET `base_url + path` and return the JSON body.
    ///
    /// # Errors
    ///
    /// - [`TwitchError::NotAuthenticated`] if `requires_auth` is set and no
    ///   credentials are held. No request is made.
    /// - [`TwitchError::Api`] for any status other than 200.
    /// - [`TwitchError::Protocol`] if the body is not JSON.
    /// - [`TwitchError::Transport`] once retries are exhausted.
    #[tracing::instrument(skip(self))]
    pub async fn call_api(&self, path: &str, requires_auth: bool) -> Result<Value> {
        let request = self.prepare(path, requires_auth)?;
        self.send_with_retry(&request).await
    }

    /// [`call_api`](Self::call_api) that stops when `cancel` fires.
    ///
    /// The in-flight request and any retry back-off are dropped on
    /// cancellation.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn call_api_cancellable(
        &self,
        path: &str,
        requires_auth: bool,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let request = self.prepare(path, requires_auth)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Request cancelled");
                Err(TwitchError::Cancelled)
            }
            result = self.send_with_retry(&request) => result,
        }
    }

    /// Typed variant of [`raw_api`](Self::raw_api).
    ///
    /// # Errors
    ///
    /// Returns [`TwitchError::Protocol`] if the JSON does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<&RequestOptions>,
        requires_auth: bool,
    ) -> Result<T> {
        let value = self.raw_api(path, options, requires_auth).await?;
        serde_json::from_value(value).map_err(|source| TwitchError::Protocol {
            status: StatusCode::OK.as_u16(),
            source,
        })
    }

    fn prepare(&self, path: &str, requires_auth: bool) -> Result<PreparedRequest> {
        let authorization = if requires_auth {
            tracing::debug!("Calling an authenticated endpoint");
            let value = self
                .auth
                .read()
                .authorization()
                .ok_or(TwitchError::NotAuthenticated)?;
            HeaderValue::from_str(&value).map_err(|_| {
                TwitchError::Configuration(
                    "access token is not a valid header value".to_string(),
                )
            })?
        } else {
            HeaderValue::from_static("")
        };

        let url = Url::parse(&self.join(path))?;
        tracing::debug!(%url, "Calling API");

        Ok(PreparedRequest { url, authorization })
    }

    fn join(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') || path.starts_with('?') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn send_with_retry(&self, request: &PreparedRequest) -> Result<Value> {
        let mut attempt = 0;
        loop {
            match self.send(request).await {
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        ?delay,
                        error = %e,
                        "Transport error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn send(&self, request: &PreparedRequest) -> Result<Value> {
        let response = self
            .http
            .get(request.url.clone())
            .header(AUTHORIZATION, request.authorization.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            return Err(Self::api_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|source| TwitchError::Protocol {
            status: status.as_u16(),
            source,
        })
    }

    /// Classify a non-200 response.
    fn api_error(status: StatusCode, body: &[u8]) -> TwitchError {
        let value: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(source) => {
                tracing::warn!(status = status.as_u16(), "Error response is not JSON");
                return TwitchError::Protocol {
                    status: status.as_u16(),
                    source,
                };
            }
        };

        let body = serde_json::from_value::<ApiErrorBody>(value.clone())
            .unwrap_or_else(|_| ApiErrorBody {
                message: value.to_string(),
                ..Default::default()
            })
            .normalize(status);

        tracing::warn!(
            status = status.as_u16(),
            error = %body.error,
            message = %body.message,
            "Twitch API error"
        );

        TwitchError::Api {
            status: status.as_u16(),
            body,
        }
    }
}
