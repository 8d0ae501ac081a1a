//! Twitch kraken API client library.
//!
//! A Rust library for the Twitch v5 ("kraken") REST API. The core is
//! [`TwitchClient`], which tracks authentication state, attaches the
//! identity and credential headers, builds query strings and classifies
//! responses. Endpoint helpers are defined as traits that model types
//! implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use twitchapi::{Channel, ClientConfig, Get, TwitchClient};
//!
//! #[tokio::main]
//! async fn main() -> twitchapi::Result<()> {
//!     // Client ID from TWITCH_TOKEN
//!     let client = TwitchClient::new(ClientConfig::from_env())?;
//!
//!     // Look a channel up by ID
//!     let channel = Channel::get(&client, 23161357).await?;
//!     println!("Channel: {}", channel.display_name);
//!
//!     // Users by login name
//!     let users = twitchapi::get_users_by_login(&client, &["lirik", "monstercat"]).await?;
//!     println!("Found {} users", users.total);
//!
//!     // Any endpoint, untyped
//!     let raw = client.raw_api("/channels/23161357/teams", None, false).await?;
//!     println!("{raw}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Calls made with `requires_auth = true` need credentials, either set
//! directly with [`TwitchClient::set_credentials`] or obtained from a
//! [`CredentialProvider`] through [`TwitchClient::auto_authenticate`].
//! Without them the call fails with [`TwitchError::NotAuthenticated`]
//! before anything is sent.
//!
//! # Configuration
//!
//! [`ClientConfig::from_env`] reads:
//!
//! - `TWITCH_TOKEN` (required) - Your application's client ID
//! - `TWITCH_API_URL` (optional) - Base URL (defaults to `https://api.twitch.tv/kraken`)

mod auth;
mod client;
mod config;
mod error;
mod models;
mod pagination;
mod query;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{AuthState, CredentialProvider, Credentials};
pub use client::TwitchClient;
pub use config::{
    AutomatedLogin, ClientConfig, OAuthOptions, RetryPolicy, API_URL_ENV, CLIENT_ID_ENV,
    DEFAULT_API_URL,
};
pub use error::{ApiErrorBody, BoxError, Result, TwitchError};
pub use pagination::{Page, PaginationParams, MAX_LIMIT};
pub use query::{construct_comma_list, construct_options, RequestOptions};

// Re-export traits
pub use traits::{Get, List, DEFAULT_LIMIT};

// Re-export models
pub use models::{
    // Channel types
    Channel,
    // Follow types
    Direction,
    Follow,
    FollowListQuery,
    FollowQuery,
    // Team types
    Team,
    // User types
    User,
    UserList,
    // Video types
    BroadcastType,
    Preview,
    Thumbnail,
    Thumbnails,
    Video,
    VideoChannel,
    VideoListQuery,
    VideoQuery,
    VideoSort,
};

// Re-export convenience functions
pub use models::{get_channel, get_channel_followers, get_channel_teams, get_channel_videos};
pub use models::get_users_by_login;

// Re-export so callers can build cancellation tokens without a direct dependency.
pub use tokio_util::sync::CancellationToken;
