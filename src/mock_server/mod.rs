//! Mock kraken API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Twitch
//! v5 API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests, checks `Client-ID` and OAuth tokens, and answers with
//! kraken-shaped error bodies.
//!
//! # Example
//!
//! ```ignore
//! use twitchapi::mock_server::{MockServer, DEFAULT_CLIENT_ID};
//! use twitchapi::{Channel, ClientConfig, Get, TwitchClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let config = ClientConfig::new(DEFAULT_CLIENT_ID).with_base_url(server.api_url());
//!     let client = TwitchClient::new(config).unwrap();
//!
//!     // Server comes with default fixtures
//!     let channel = Channel::get(&client, 23161357).await.unwrap();
//!     assert_eq!(channel.name, "lirik");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, DEFAULT_CLIENT_ID, DEFAULT_TOKEN};
pub use server::MockServer;
pub use state::{MockState, TokenGrant};
