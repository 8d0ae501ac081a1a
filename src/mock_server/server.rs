//! Mock kraken API server.
//!
//! Provides an axum-based HTTP server that simulates the Twitch v5 API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures, DEFAULT_CLIENT_ID, DEFAULT_TOKEN};
use super::handlers;
use super::state::MockState;

/// Path the API routes are mounted under.
const API_PREFIX: &str = "/kraken";

/// A mock kraken server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `api_url()` as the client's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the root URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Base URL to configure a `TwitchClient` with.
    pub fn api_url(&self) -> String {
        format!("{}{}", self.url, API_PREFIX)
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
            .with_required_client_id(DEFAULT_CLIENT_ID)
            .with_token(DEFAULT_TOKEN, "23161357", &["channel_read", "user_read"])
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for user in scenario.users {
            state.users.insert(user.id.clone(), user);
        }

        for channel in scenario.channels {
            state.channels.insert(channel.id.clone(), channel);
        }

        for (channel_id, follows) in scenario.follows {
            state.follows.insert(channel_id, follows);
        }

        for (channel_id, teams) in scenario.teams {
            state.teams.insert(channel_id, teams);
        }

        for (channel_id, videos) in scenario.videos {
            state.videos.insert(channel_id, videos);
        }

        state
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            // User routes
            .route("/users", get(handlers::get_users))
            .route("/users/:id", get(handlers::get_user))
            // Channel routes
            .route("/channel", get(handlers::get_authenticated_channel))
            .route("/channels/:id", get(handlers::get_channel))
            .route("/channels/:id/follows", get(handlers::list_follows))
            .route("/channels/:id/teams", get(handlers::list_teams))
            .route("/channels/:id/videos", get(handlers::list_videos));

        Router::new()
            .nest(API_PREFIX, api)
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
