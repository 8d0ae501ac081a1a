//! Client configuration.
//!
//! The engine itself never reads the process environment. Applications that
//! want the legacy behaviour call [`ClientConfig::from_env`] or
//! [`ClientConfig::with_env_overrides`] before constructing the client.

use std::env;
use std::time::Duration;

use serde::Deserialize;

/// Default kraken base URL.
pub const DEFAULT_API_URL: &str = "https://api.twitch.tv/kraken";

/// Environment variable holding the client ID.
pub const CLIENT_ID_ENV: &str = "TWITCH_TOKEN";

/// Environment variable overriding the base URL.
pub const API_URL_ENV: &str = "TWITCH_API_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Inputs for [`TwitchClient::new`](crate::TwitchClient::new).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Application client ID sent as `Client-ID`.
    pub client_id: Option<String>,
    /// Base URL every path is appended to.
    pub base_url: String,
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry policy for transport failures.
    pub retry: RetryPolicy,
    /// OAuth automation settings. Required for `auto_authenticate`.
    pub oauth: Option<OAuthOptions>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            oauth: None,
        }
    }
}

impl ClientConfig {
    /// Config with an explicit client ID and defaults for everything else.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            ..Self::default()
        }
    }

    /// Build a config from environment variables.
    ///
    /// Reads `TWITCH_TOKEN` for the client ID and optionally `TWITCH_API_URL`
    /// for the base URL (defaults to `https://api.twitch.tv/kraken`).
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of this config.
    ///
    /// A non-empty `TWITCH_TOKEN` takes precedence over an explicit
    /// `client_id`, which is only kept when the variable is unset.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(id) = non_empty_var(CLIENT_ID_ENV) {
            self.client_id = Some(id);
        }
        if let Some(url) = non_empty_var(API_URL_ENV) {
            self.base_url = url;
        }
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_oauth(mut self, oauth: OAuthOptions) -> Self {
        self.oauth = Some(oauth);
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// OAuth settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthOptions {
    /// Credentials for automated login.
    #[serde(default)]
    pub automated: Option<AutomatedLogin>,
}

impl OAuthOptions {
    /// Options that enable automated login as `user`.
    pub fn automated(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            automated: Some(AutomatedLogin {
                user: user.into(),
                password: password.into(),
                show: false,
            }),
        }
    }
}

/// Account used by the credential provider.
#[derive(Clone, Default, Deserialize)]
pub struct AutomatedLogin {
    pub user: String,
    pub password: String,
    /// Show the browser window while logging in.
    #[serde(default)]
    pub show: bool,
}

impl AutomatedLogin {
    /// Both user and password are filled in.
    pub fn is_complete(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for AutomatedLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomatedLogin")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("show", &self.show)
            .finish()
    }
}

/// Bounded retry for transport failures.
///
/// Attempt `n` (1-based) waits `backoff * n` before retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    #[serde(with = "duration_millis")]
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.client_id.is_none());
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.retry.max_retries, 2);
        assert!(config.oauth.is_none());
    }

    #[test]
    fn test_retry_delay_is_linear() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(3), Duration::from_millis(300));
        assert_eq!(RetryPolicy::none().delay_for(5), Duration::ZERO);
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "client_id": "abc123",
            "timeout": 5,
            "retry": { "max_retries": 1, "backoff": 50 },
            "oauth": { "automated": { "user": "bot", "password": "hunter2", "show": true } }
        }))
        .unwrap();

        assert_eq!(config.client_id.as_deref(), Some("abc123"));
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.backoff, Duration::from_millis(50));
        let login = config.oauth.unwrap().automated.unwrap();
        assert!(login.is_complete());
        assert!(login.show);
    }

    #[test]
    fn test_automated_login_debug_hides_password() {
        let login = OAuthOptions::automated("bot", "hunter2").automated.unwrap();
        let debug = format!("{login:?}");
        assert!(debug.contains("bot"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_incomplete_login() {
        let login = AutomatedLogin {
            user: "bot".into(),
            ..Default::default()
        };
        assert!(!login.is_complete());
    }
}
