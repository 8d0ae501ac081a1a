//! Channel model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::TwitchClient;
use crate::error::Result;
use crate::pagination::{Page, PaginationParams};
use crate::traits::{Get, List};

use super::{Follow, FollowListQuery, Team, Video, VideoListQuery};

/// A Twitch channel.
///
/// A channel belongs to exactly one user and shares that user's ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Channel ID, as a string.
    #[serde(rename = "_id", deserialize_with = "super::id::deserialize")]
    pub id: String,

    /// Login name of the owner.
    pub name: String,

    pub display_name: String,

    /// Current stream title.
    #[serde(default)]
    pub status: Option<String>,

    /// Game being played.
    #[serde(default)]
    pub game: Option<String>,

    #[serde(default)]
    pub mature: Option<bool>,

    #[serde(default)]
    pub broadcaster_language: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub video_banner: Option<String>,

    #[serde(default)]
    pub profile_banner: Option<String>,

    #[serde(default)]
    pub profile_banner_background_color: Option<String>,

    #[serde(default)]
    pub partner: bool,

    /// Channel page URL.
    pub url: String,

    #[serde(default)]
    pub views: u64,

    #[serde(default)]
    pub followers: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Owner's e-mail; only present on `GET /channel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Stream key; only present on `GET /channel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_key: Option<String>,
}

impl Channel {
    /// Numeric channel ID.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    /// Fetch the channel of the authenticated user (`GET /channel`).
    ///
    /// Needs the `channel_read` scope.
    #[tracing::instrument(skip(client))]
    pub async fn authenticated(client: &TwitchClient) -> Result<Self> {
        if client.is_authenticated() && !client.has_scope("channel_read") {
            tracing::warn!("Credentials lack the channel_read scope");
        }
        client.get_json("/channel", None, true).await
    }

    /// One page of this channel's followers.
    pub async fn followers(
        &self,
        client: &TwitchClient,
        query: FollowListQuery,
        params: &PaginationParams,
    ) -> Result<Page<Follow>> {
        Follow::list_page(client, &(self.id.clone(), query), params).await
    }

    /// Teams this channel belongs to.
    pub async fn teams(&self, client: &TwitchClient) -> Result<Vec<Team>> {
        super::get_channel_teams(client, &self.id).await
    }

    /// One page of this channel's videos.
    pub async fn videos(
        &self,
        client: &TwitchClient,
        query: VideoListQuery,
        params: &PaginationParams,
    ) -> Result<Page<Video>> {
        Video::list_page(client, &(self.id.clone(), query), params).await
    }
}

#[async_trait]
impl Get for Channel {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &TwitchClient, id: u64) -> Result<Self> {
        client.get_json(&format!("/channels/{id}"), None, false).await
    }
}

/// Get a single channel by ID.
pub async fn get_channel(client: &TwitchClient, id: u64) -> Result<Channel> {
    Channel::get(client, id).await
}
