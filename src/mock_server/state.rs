//! Mock server state management.
//!
//! Provides the in-memory data store for the mock kraken server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{BroadcastType, Channel, Direction, Follow, Team, User, Video, VideoSort};

/// An access token the mock server accepts.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// User (and channel) the token belongs to.
    pub user_id: String,
    /// Scopes granted to the token.
    pub scopes: Vec<String>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Users indexed by ID.
    pub users: HashMap<String, User>,

    /// Channels indexed by ID.
    pub channels: HashMap<String, Channel>,

    /// Followers indexed by channel ID.
    pub follows: HashMap<String, Vec<Follow>>,

    /// Teams indexed by channel ID.
    pub teams: HashMap<String, Vec<Team>>,

    /// Videos indexed by channel ID.
    pub videos: HashMap<String, Vec<Video>>,

    /// Access tokens accepted on authenticated routes.
    pub tokens: HashMap<String, TokenGrant>,

    /// Optional client ID. If set, requests must send this `Client-ID`.
    pub required_client_id: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    /// Add a channel to the state.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.id.clone(), channel);
        self
    }

    /// Set the followers of a channel.
    pub fn with_follows(mut self, channel_id: &str, follows: Vec<Follow>) -> Self {
        self.follows.insert(channel_id.to_string(), follows);
        self
    }

    /// Set the teams of a channel.
    pub fn with_teams(mut self, channel_id: &str, teams: Vec<Team>) -> Self {
        self.teams.insert(channel_id.to_string(), teams);
        self
    }

    /// Set the videos of a channel.
    pub fn with_videos(mut self, channel_id: &str, videos: Vec<Video>) -> Self {
        self.videos.insert(channel_id.to_string(), videos);
        self
    }

    /// Accept `token` as belonging to `user_id` with the given scopes.
    pub fn with_token(mut self, token: &str, user_id: &str, scopes: &[&str]) -> Self {
        self.tokens.insert(
            token.to_string(),
            TokenGrant {
                user_id: user_id.to_string(),
                scopes: scopes.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    /// Set the required client ID.
    pub fn with_required_client_id(mut self, client_id: &str) -> Self {
        self.required_client_id = Some(client_id.to_string());
        self
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Get a channel by ID.
    pub fn get_channel(&self, id: &str) -> Option<&Channel> {
        self.channels.get(id)
    }

    /// Users whose login matches one of `logins`, in request order.
    pub fn users_by_login(&self, logins: &[&str]) -> Vec<&User> {
        logins
            .iter()
            .filter_map(|login| {
                self.users
                    .values()
                    .find(|u| u.name.eq_ignore_ascii_case(login))
            })
            .collect()
    }

    /// Followers of a channel sorted by follow date.
    pub fn list_follows(&self, channel_id: &str, direction: Direction) -> Vec<&Follow> {
        let mut follows: Vec<&Follow> = self
            .follows
            .get(channel_id)
            .map(|f| f.iter().collect())
            .unwrap_or_default();

        follows.sort_by(|a, b| match direction {
            Direction::Asc => a.created_at.cmp(&b.created_at),
            Direction::Desc => b.created_at.cmp(&a.created_at),
        });
        follows
    }

    /// Teams of a channel.
    pub fn list_teams(&self, channel_id: &str) -> Vec<&Team> {
        self.teams
            .get(channel_id)
            .map(|t| t.iter().collect())
            .unwrap_or_default()
    }

    /// Videos of a channel, filtered by type and sorted.
    pub fn list_videos(
        &self,
        channel_id: &str,
        types: &[BroadcastType],
        sort: VideoSort,
    ) -> Vec<&Video> {
        let mut videos: Vec<&Video> = self
            .videos
            .get(channel_id)
            .map(|v| v.iter().collect())
            .unwrap_or_default();

        if !types.is_empty() {
            videos.retain(|v| types.iter().any(|t| t.to_string() == v.broadcast_type));
        }

        match sort {
            VideoSort::Time => videos.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            VideoSort::Views => videos.sort_by(|a, b| b.views.cmp(&a.views)),
        }
        videos
    }

    /// Resolve an `Authorization` header value to a token grant.
    pub fn grant_for(&self, authorization: &str) -> Option<&TokenGrant> {
        let token = authorization.strip_prefix("OAuth ")?;
        self.tokens.get(token)
    }
}
