//! Error types for Twitch API operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error returned by external collaborators such as a
/// [`CredentialProvider`](crate::CredentialProvider).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during Twitch API operations.
#[derive(Debug, Error)]
pub enum TwitchError {
    /// Configuration is missing or incomplete.
    #[error("Twitch configuration error: {0}")]
    Configuration(String),

    /// An authenticated endpoint was called without credentials.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The API answered with a non-200 status and a JSON error body.
    #[error("Twitch API error ({status}): {}", body.message)]
    Api { status: u16, body: ApiErrorBody },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("Failed to parse response (HTTP {status}): {source}")]
    Protocol {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The credential provider failed during automated login.
    #[error("Credential provider failed: {0}")]
    CredentialProvider(#[source] BoxError),

    /// The call was cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,
}

impl TwitchError {
    /// Whether a retry could succeed.
    ///
    /// Only transport failures qualify. Authentication, configuration and
    /// application-level errors from the API are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// HTTP status associated with this error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Protocol { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The remote error body, for [`TwitchError::Api`].
    pub fn api_body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// JSON error body returned by the kraken API.
///
/// ```json
/// {"error": "Not Found", "status": 404, "message": "Channel does not exist"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Short error name (e.g. "Not Found").
    #[serde(default)]
    pub error: String,
    /// Status code echoed by the API.
    #[serde(default)]
    pub status: Option<u16>,
    /// Human-readable description.
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// Fill in whatever the API left out so the error always reads well.
    pub(crate) fn normalize(mut self, status: reqwest::StatusCode) -> Self {
        if self.status.is_none() {
            self.status = Some(status.as_u16());
        }
        if self.error.is_empty() {
            self.error = status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string();
        }
        if self.message.is_empty() {
            self.message = format!("HTTP {status}");
        }
        self
    }
}

/// Result type alias for Twitch operations.
pub type Result<T> = core::result::Result<T, TwitchError>;
